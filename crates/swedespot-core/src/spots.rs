use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Payment channel assumed when the source record lists none.
pub const DEFAULT_PAYMENT_METHOD: &str = "app";

/// Vehicle category a parking spot is intended for.
///
/// The set is closed: every normalized spot carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Electric,
    Bike,
    Scooter,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Car,
        VehicleType::Electric,
        VehicleType::Bike,
        VehicleType::Scooter,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Electric => "electric",
            VehicleType::Bike => "bike",
            VehicleType::Scooter => "scooter",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Strict parse over the canonical English names, case-insensitive.
///
/// Localized source values (`"elbil"`, `"cykel"`, ...) are not accepted here;
/// they are mapped during record normalization.
impl FromStr for VehicleType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        VehicleType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidVehicleType(s.to_string()))
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Street-cleaning window parsed from a compact string such as
/// `"Onsdag 10:00-12:00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningSchedule {
    /// Day token exactly as it appeared in the source, e.g. `"Onsdag"`.
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// `true` when no usable time range was given or the source says "all day".
    pub full_day: bool,
}

/// A normalized parking location.
///
/// Serialized with camelCase keys; this is also the on-disk shape of the
/// cached snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free text, unit not normalized (e.g. `"2 tim"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
    /// Currency per hour. Never negative.
    pub cost: f64,
    pub payment_method: Vec<String>,
    pub restrictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_schedule: Option<CleaningSchedule>,
    /// Estimated likelihood that the spot is vacant, in `[0, 1)`.
    pub probability_empty: f64,
}

impl ParkingSpot {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Returns `true` if the spot is free to park in.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.cost <= 0.0
    }
}
