use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SWEDESPOT_ENV"));
}

#[test]
fn build_app_config_uses_defaults_on_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.dataset_url, DEFAULT_DATASET_URL);
    assert_eq!(cfg.cache_dir.to_str(), Some("./.swedespot-cache"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "swedespot/0.1 (parking-discovery)");
    assert!((cfg.default_radius_meters - 1000.0).abs() < f64::EPSILON);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SWEDESPOT_ENV", "production");
    map.insert("SWEDESPOT_DATASET_URL", "http://localhost:9000/json");
    map.insert("SWEDESPOT_CACHE_DIR", "/tmp/swedespot");
    map.insert("SWEDESPOT_LOG_LEVEL", "debug");
    map.insert("SWEDESPOT_REQUEST_TIMEOUT_SECS", "5");
    map.insert("SWEDESPOT_USER_AGENT", "custom-agent/2.0");
    map.insert("SWEDESPOT_DEFAULT_RADIUS_METERS", "250.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.dataset_url, "http://localhost:9000/json");
    assert_eq!(cfg.cache_dir.to_str(), Some("/tmp/swedespot"));
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
    assert!((cfg.default_radius_meters - 250.5).abs() < f64::EPSILON);
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("SWEDESPOT_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SWEDESPOT_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SWEDESPOT_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_positive_radius() {
    for bad in ["0", "-10", "NaN", "inf", "wide"] {
        let mut map = HashMap::new();
        map.insert("SWEDESPOT_DEFAULT_RADIUS_METERS", bad);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SWEDESPOT_DEFAULT_RADIUS_METERS"),
            "expected InvalidEnvVar for radius {bad:?}, got: {result:?}"
        );
    }
}

#[test]
fn build_app_config_rejects_blank_dataset_url() {
    let mut map = HashMap::new();
    map.insert("SWEDESPOT_DATASET_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SWEDESPOT_DATASET_URL"),
        "expected InvalidEnvVar(SWEDESPOT_DATASET_URL), got: {result:?}"
    );
}
