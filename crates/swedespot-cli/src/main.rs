mod output;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use swedespot_core::{AppConfig, Coordinates, VehicleType};
use swedespot_parking::{
    sort_by_distance, FileStore, OpenDataClient, ParkingService, RandomPlaceholder, SnapshotCache,
};
use tracing_subscriber::EnvFilter;

/// Central Stockholm, used when no location is given.
const FALLBACK_LATITUDE: f64 = 59.3293;
const FALLBACK_LONGITUDE: f64 = 18.0686;

#[derive(Debug, Parser)]
#[command(name = "swedespot")]
#[command(about = "Find parking near you in Swedish open data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List parking spots near a location
    Nearby {
        /// Latitude in decimal degrees (defaults to central Stockholm)
        #[arg(long, default_value_t = FALLBACK_LATITUDE, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees (defaults to central Stockholm)
        #[arg(long, default_value_t = FALLBACK_LONGITUDE, allow_negative_numbers = true)]
        lon: f64,
        /// Vehicle type; `car` includes every spot
        #[arg(long, default_value = "car")]
        vehicle: VehicleType,
        /// Search radius in metres (defaults to SWEDESPOT_DEFAULT_RADIUS_METERS)
        #[arg(long)]
        radius: Option<f64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List every spot in the dataset
    Spots {
        /// Only show spots of this exact type
        #[arg(long)]
        vehicle: Option<VehicleType>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch the dataset now and rewrite the cache
    Refresh,
    /// Show the age and size of the cached snapshot
    Cache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = swedespot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("swedespot: no command given; try `swedespot nearby` or `swedespot --help`");
        return Ok(());
    };

    let service = build_service(&config)?;
    tracing::debug!(env = %config.env, dataset_url = %config.dataset_url, "swedespot starting");

    match command {
        Commands::Nearby {
            lat,
            lon,
            vehicle,
            radius,
            json,
        } => {
            let radius = radius.unwrap_or(config.default_radius_meters);
            validate_nearby_query(lat, lon, radius)?;
            let spots = service
                .get_nearby_parking_spots(lat, lon, vehicle, Some(radius))
                .await?;
            let ranked = sort_by_distance(spots, Coordinates::new(lat, lon));
            if json {
                output::print_json(&ranked.into_iter().map(|(s, _)| s).collect::<Vec<_>>())?;
            } else {
                output::print_nearby_table(&ranked, vehicle, radius);
            }
        }
        Commands::Spots { vehicle, json } => {
            let mut spots = service.fetch_all_spots().await?;
            if let Some(vehicle) = vehicle {
                spots.retain(|s| s.vehicle_type == vehicle);
            }
            if json {
                output::print_json(&spots)?;
            } else {
                output::print_spots_table(&spots);
            }
        }
        Commands::Refresh => {
            let spots = service.refresh().await?;
            println!("refreshed: {} spots cached", spots.len());
        }
        Commands::Cache => match service.cache_status().await {
            Some(status) => output::print_cache_status(status),
            None => println!("no cached snapshot"),
        },
    }

    Ok(())
}

/// Rejects a location or radius that cannot describe a point on Earth.
fn validate_nearby_query(lat: f64, lon: f64, radius: f64) -> anyhow::Result<()> {
    if !lat.is_finite() || lat.abs() > 90.0 {
        anyhow::bail!("--lat must be between -90 and 90 degrees, got {lat}");
    }
    if !lon.is_finite() || lon.abs() > 180.0 {
        anyhow::bail!("--lon must be between -180 and 180 degrees, got {lon}");
    }
    if !radius.is_finite() || radius < 0.0 {
        anyhow::bail!("--radius must be a non-negative number of metres, got {radius}");
    }
    Ok(())
}

fn build_service(config: &AppConfig) -> anyhow::Result<ParkingService> {
    let client = OpenDataClient::with_dataset_url(
        &config.dataset_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let cache = SnapshotCache::new(Arc::new(FileStore::new(&config.cache_dir)));
    Ok(ParkingService::new(client, cache, Arc::new(RandomPlaceholder)))
}
