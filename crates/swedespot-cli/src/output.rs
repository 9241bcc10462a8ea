//! Table and JSON rendering for CLI results.

use swedespot_core::{ParkingSpot, VehicleType};
use swedespot_parking::{CacheStatus, CACHE_EXPIRATION_MS};

const ADDRESS_WIDTH: usize = 40;

pub(crate) fn print_json(spots: &[ParkingSpot]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(spots)?);
    Ok(())
}

/// Prints spots with their distance, closest first.
pub(crate) fn print_nearby_table(ranked: &[(ParkingSpot, f64)], vehicle: VehicleType, radius: f64) {
    if ranked.is_empty() {
        println!("no {vehicle} parking within {radius:.0} m");
        return;
    }

    let header = format!(
        "{:<9}{:<10}{:<10}{:<8}{:<8}ADDRESS",
        "DIST", "TYPE", "COST", "EMPTY", "MAX"
    );
    println!("{header}");
    for (spot, meters) in ranked {
        println!(
            "{:<9}{:<10}{:<10}{:<8}{:<8}{}",
            format!("{meters:.0} m"),
            spot.vehicle_type,
            fmt_cost(spot),
            fmt_probability(spot.probability_empty),
            spot.max_duration.as_deref().unwrap_or("-"),
            fmt_address(spot),
        );
    }
    println!();
    println!("{} spots within {radius:.0} m", ranked.len());
}

pub(crate) fn print_spots_table(spots: &[ParkingSpot]) {
    if spots.is_empty() {
        println!("no parking spots in dataset");
        return;
    }

    let header = format!(
        "{:<16}{:<10}{:<10}{:<22}ADDRESS",
        "ID", "TYPE", "COST", "POSITION"
    );
    println!("{header}");
    for spot in spots {
        println!(
            "{:<16}{:<10}{:<10}{:<22}{}",
            spot.id,
            spot.vehicle_type,
            fmt_cost(spot),
            format!("{:.5}, {:.5}", spot.latitude, spot.longitude),
            fmt_address(spot),
        );
    }
    println!();
    println!("{} spots", spots.len());
}

pub(crate) fn print_cache_status(status: CacheStatus) {
    let age_min = status.age_ms / 60_000;
    let state = if status.fresh { "fresh" } else { "stale" };
    println!(
        "cached snapshot: {} spots, {age_min} min old ({state}, expires after {} min)",
        status.spots,
        CACHE_EXPIRATION_MS / 60_000
    );
}

fn fmt_cost(spot: &ParkingSpot) -> String {
    if spot.is_free() {
        "free".to_string()
    } else {
        format!("{:.0} kr/h", spot.cost)
    }
}

fn fmt_probability(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

fn fmt_address(spot: &ParkingSpot) -> String {
    let address = spot.address.as_deref().unwrap_or("-");
    if address.chars().count() > ADDRESS_WIDTH {
        format!("{}...", address.chars().take(ADDRESS_WIDTH).collect::<String>())
    } else {
        address.to_string()
    }
}
