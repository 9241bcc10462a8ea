pub mod app_config;
pub mod config;
pub mod spots;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_DATASET_URL};
pub use spots::{CleaningSchedule, Coordinates, ParkingSpot, VehicleType, DEFAULT_PAYMENT_METHOD};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid vehicle type: {0} (expected one of car, electric, bike, scooter)")]
    InvalidVehicleType(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
