use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Södertälje municipality parking dataset, JSON rendering of the rowstore.
pub const DEFAULT_DATASET_URL: &str =
    "https://catalog.sodertalje.se/rowstore/dataset/2c98130b-9e88-4cda-bd06-fcbc8d41039b/json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_radius = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(var, format!("radius must be a positive number, got {raw}")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("SWEDESPOT_ENV", "development"))?;

    let dataset_url = or_default("SWEDESPOT_DATASET_URL", DEFAULT_DATASET_URL);
    if dataset_url.trim().is_empty() {
        return Err(invalid("SWEDESPOT_DATASET_URL", "must not be empty".to_string()));
    }

    let cache_dir = PathBuf::from(or_default("SWEDESPOT_CACHE_DIR", "./.swedespot-cache"));
    let log_level = or_default("SWEDESPOT_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SWEDESPOT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SWEDESPOT_USER_AGENT", "swedespot/0.1 (parking-discovery)");
    let default_radius_meters = parse_radius("SWEDESPOT_DEFAULT_RADIUS_METERS", "1000")?;

    Ok(AppConfig {
        env,
        dataset_url,
        cache_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        default_radius_meters,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SWEDESPOT_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
