//! Normalization from raw open-data records to [`ParkingSpot`].
//!
//! Only coordinates are mandatory. Every other field has a named fallback:
//! unknown vehicle types become [`FALLBACK_VEHICLE_TYPE`], unparsable costs
//! become 0, missing payment methods become [`DEFAULT_PAYMENT_METHOD`].

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use swedespot_core::{ParkingSpot, VehicleType, DEFAULT_PAYMENT_METHOD};

use crate::error::NormalizeError;
use crate::estimator::EmptinessEstimator;
use crate::schedule::parse_cleaning_schedule;
use crate::types::RawRecord;

/// Vehicle type assigned when the source value is missing or unrecognized.
///
/// This is lossy: an unknown category silently becomes a car spot, which the
/// proximity filter then shows to every vehicle type.
pub const FALLBACK_VEHICLE_TYPE: VehicleType = VehicleType::Car;

/// Maps a raw type string (Swedish or English, any case) to a [`VehicleType`].
///
/// Returns `None` for unrecognized values; the caller decides the fallback.
#[must_use]
pub fn map_vehicle_type(raw: &str) -> Option<VehicleType> {
    match raw.trim().to_lowercase().as_str() {
        "bil" | "car" => Some(VehicleType::Car),
        "elbil" | "electric" => Some(VehicleType::Electric),
        "cykel" | "bike" => Some(VehicleType::Bike),
        "elsparkcykel" | "scooter" => Some(VehicleType::Scooter),
        _ => None,
    }
}

/// Converts one [`RawRecord`] into a [`ParkingSpot`].
///
/// # Errors
///
/// Returns [`NormalizeError::RecordRejected`] if `lat` or `lng` is missing,
/// not a number, not finite, or out of range. No other field can fail.
pub fn normalize(
    raw: &RawRecord,
    estimator: &dyn EmptinessEstimator,
) -> Result<ParkingSpot, NormalizeError> {
    let record_id = non_empty(raw.id.as_deref()).map(str::to_owned);
    let reject = |reason: String| NormalizeError::RecordRejected {
        record_id: record_id.clone().unwrap_or_else(|| "<no id>".to_string()),
        reason,
    };

    let latitude = parse_coordinate(raw.lat.as_deref(), 90.0)
        .map_err(|reason| reject(format!("latitude {reason}")))?;
    let longitude = parse_coordinate(raw.lng.as_deref(), 180.0)
        .map_err(|reason| reject(format!("longitude {reason}")))?;

    let vehicle_type = resolve_vehicle_type(raw.vehicle_type.as_deref(), record_id.as_deref());
    let address = non_empty(raw.address.as_deref()).map(str::to_owned);

    let id = record_id.clone().unwrap_or_else(|| {
        generated_id(latitude, longitude, vehicle_type, address.as_deref())
    });

    let mut payment_method = split_list(raw.payment_method.as_deref());
    if payment_method.is_empty() {
        payment_method.push(DEFAULT_PAYMENT_METHOD.to_string());
    }

    Ok(ParkingSpot {
        id,
        vehicle_type,
        latitude,
        longitude,
        address,
        max_duration: non_empty(raw.max_duration.as_deref()).map(str::to_owned),
        cost: parse_cost(raw.cost.as_deref()),
        payment_method,
        restrictions: split_list(raw.restrictions.as_deref()),
        cleaning_schedule: raw
            .cleaning_schedule
            .as_deref()
            .and_then(parse_cleaning_schedule),
        probability_empty: estimator.estimate(raw),
    })
}

/// Normalizes a batch, dropping (and logging) every rejected record.
///
/// Ids are unique in the result: a repeated id gets a `-2`, `-3`, ... suffix
/// in input order, so identical id-less rows stay distinguishable.
#[must_use]
pub fn normalize_all(raw: &[RawRecord], estimator: &dyn EmptinessEstimator) -> Vec<ParkingSpot> {
    let mut rejected = 0usize;
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut spots: Vec<ParkingSpot> = Vec::with_capacity(raw.len());

    for record in raw {
        match normalize(record, estimator) {
            Ok(mut spot) => {
                if !seen.insert(spot.id.clone()) {
                    let unique = next_free_id(&spot.id, &seen);
                    tracing::debug!(id = %spot.id, renamed = %unique, "duplicate parking spot id");
                    seen.insert(unique.clone());
                    spot.id = unique;
                }
                spots.push(spot);
            }
            Err(err) => {
                rejected += 1;
                tracing::warn!(error = %err, "skipping parking record");
            }
        }
    }

    tracing::info!(
        accepted = spots.len(),
        rejected,
        "normalized parking records"
    );
    spots
}

fn next_free_id(base: &str, seen: &HashSet<String>) -> String {
    (2usize..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| base.to_owned())
}

fn resolve_vehicle_type(raw: Option<&str>, record_id: Option<&str>) -> VehicleType {
    let Some(raw) = non_empty(raw) else {
        tracing::debug!(record_id, fallback = %FALLBACK_VEHICLE_TYPE, "record has no vehicle type");
        return FALLBACK_VEHICLE_TYPE;
    };
    map_vehicle_type(raw).unwrap_or_else(|| {
        tracing::warn!(
            record_id,
            raw_type = raw,
            fallback = %FALLBACK_VEHICLE_TYPE,
            "unrecognized vehicle type, falling back (lossy)"
        );
        FALLBACK_VEHICLE_TYPE
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a decimal degree, accepting a Swedish decimal comma.
fn parse_coordinate(raw: Option<&str>, limit: f64) -> Result<f64, String> {
    let raw = non_empty(raw).ok_or_else(|| "is missing".to_string())?;
    let value = raw
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("{raw:?} is not a number"))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{raw:?} is out of range"));
    }
    Ok(value)
}

/// Reads the leading number of a cost string (`"15 kr/h"` -> 15).
///
/// Anything unparsable, non-finite, or negative is 0.
fn parse_cost(raw: Option<&str>) -> f64 {
    let Some(raw) = non_empty(raw) else {
        return 0.0;
    };
    let normalized = raw.replace(',', ".");
    let end = normalized
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(normalized.len(), |(i, _)| i);

    normalized[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Deterministic id for records without one, so a spot keeps its id across
/// refreshes.
fn generated_id(
    latitude: f64,
    longitude: f64,
    vehicle_type: VehicleType,
    address: Option<&str>,
) -> String {
    let input = format!(
        "{latitude}|{longitude}|{vehicle_type}|{}",
        address.unwrap_or_default()
    );
    let digest = format!("{:x}", Sha256::digest(input.as_bytes()));
    format!("spot-{}", &digest[..9])
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
