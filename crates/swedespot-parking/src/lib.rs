//! Parking data acquisition and proximity search.
//!
//! The pipeline is: [`OpenDataClient`] fetches raw records, [`normalize`]
//! turns each into a [`ParkingSpot`](swedespot_core::ParkingSpot),
//! [`SnapshotCache`] keeps the last normalized list for 30 minutes, and
//! [`nearby`] filters by vehicle type and haversine distance.
//! [`ParkingService`] composes all of it.

pub mod cache;
pub mod client;
pub mod error;
pub mod estimator;
pub mod normalize;
pub mod proximity;
pub mod schedule;
pub mod service;
pub mod types;

pub use cache::{
    CacheSnapshot, FileStore, KeyValueStore, MemoryStore, SnapshotCache, CACHE_EXPIRATION_MS,
};
pub use client::OpenDataClient;
pub use error::{CacheError, FetchError, NormalizeError, ParkingError};
pub use estimator::{ConstantEstimator, EmptinessEstimator, RandomPlaceholder};
pub use normalize::{map_vehicle_type, normalize, normalize_all, FALLBACK_VEHICLE_TYPE};
pub use proximity::{haversine_km, nearby, sort_by_distance, DEFAULT_RADIUS_METERS};
pub use schedule::parse_cleaning_schedule;
pub use service::{CacheStatus, ParkingService};
pub use types::{RawRecord, RawResponse};
