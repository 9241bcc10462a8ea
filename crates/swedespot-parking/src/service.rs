//! Cache-or-fetch orchestration and the nearby-spots query.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use swedespot_core::{Coordinates, ParkingSpot, VehicleType};

use crate::cache::SnapshotCache;
use crate::client::OpenDataClient;
use crate::error::{FetchError, ParkingError};
use crate::estimator::EmptinessEstimator;
use crate::normalize::normalize_all;
use crate::proximity::{nearby, DEFAULT_RADIUS_METERS};

type RefreshResult = Result<Arc<Vec<ParkingSpot>>, Arc<FetchError>>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshResult>>;

/// Age and size of the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    pub spots: usize,
    pub age_ms: i64,
    pub fresh: bool,
}

struct Pipeline {
    client: OpenDataClient,
    cache: SnapshotCache,
    estimator: Arc<dyn EmptinessEstimator>,
}

impl Pipeline {
    async fn refresh(&self) -> Result<Vec<ParkingSpot>, FetchError> {
        let raw = self.client.fetch_raw().await?;
        let spots = normalize_all(&raw, self.estimator.as_ref());
        self.cache.write(&spots).await;
        Ok(spots)
    }
}

/// Entry point for parking queries.
///
/// Concurrent cache misses are coalesced: while one refresh is in flight,
/// every other caller awaits it and gets the same spots or the same error.
pub struct ParkingService {
    pipeline: Arc<Pipeline>,
    in_flight: Mutex<Option<(u64, SharedRefresh)>>,
    next_flight: AtomicU64,
}

impl ParkingService {
    pub fn new(
        client: OpenDataClient,
        cache: SnapshotCache,
        estimator: Arc<dyn EmptinessEstimator>,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                client,
                cache,
                estimator,
            }),
            in_flight: Mutex::new(None),
            next_flight: AtomicU64::new(0),
        }
    }

    /// All normalized spots, from a fresh snapshot if there is one.
    ///
    /// On a miss the dataset is fetched, normalized, and written back to
    /// the cache. A failed cache write does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::FetchFailed`] if the cache has no fresh
    /// snapshot and the remote fetch fails.
    pub async fn fetch_all_spots(&self) -> Result<Vec<ParkingSpot>, ParkingError> {
        if let Some(spots) = self.pipeline.cache.read_fresh().await {
            return Ok(spots);
        }
        tracing::debug!("no fresh parking snapshot, fetching");
        self.refresh().await
    }

    /// Fetches and caches the dataset regardless of cache state.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::FetchFailed`] if the remote fetch fails.
    pub async fn refresh(&self) -> Result<Vec<ParkingSpot>, ParkingError> {
        let (flight_id, flight) = self.join_or_start_refresh();
        let result = flight.await;
        self.finish_refresh(flight_id);

        match result {
            Ok(spots) => Ok(spots.as_ref().clone()),
            Err(err) => {
                tracing::error!(error = %err, "parking data fetch failed");
                Err(ParkingError::FetchFailed(err))
            }
        }
    }

    /// Spots usable by `vehicle` within `radius_m` (default 1000 m) of the
    /// given point, in dataset order.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::FetchFailed`] if no fresh snapshot exists and
    /// the remote fetch fails.
    pub async fn get_nearby_parking_spots(
        &self,
        latitude: f64,
        longitude: f64,
        vehicle: VehicleType,
        radius_m: Option<f64>,
    ) -> Result<Vec<ParkingSpot>, ParkingError> {
        let all = self.fetch_all_spots().await?;
        let radius_m = radius_m.unwrap_or(DEFAULT_RADIUS_METERS);
        let found = nearby(&all, Coordinates::new(latitude, longitude), vehicle, radius_m);
        tracing::debug!(
            latitude,
            longitude,
            %vehicle,
            radius_m,
            total = all.len(),
            found = found.len(),
            "nearby parking query"
        );
        Ok(found)
    }

    /// Current snapshot status, or `None` when nothing usable is cached.
    pub async fn cache_status(&self) -> Option<CacheStatus> {
        self.pipeline.cache.read().await.map(|snapshot| CacheStatus {
            spots: snapshot.spots.len(),
            age_ms: snapshot.age_ms,
            fresh: snapshot.is_fresh(),
        })
    }

    fn join_or_start_refresh(&self) -> (u64, SharedRefresh) {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // A completed flight left behind by a cancelled caller is not reused.
        if let Some((id, flight)) = slot.as_ref().filter(|(_, f)| f.peek().is_none()) {
            tracing::debug!(flight_id = id, "joining in-flight parking fetch");
            return (*id, flight.clone());
        }

        let id = self.next_flight.fetch_add(1, Ordering::Relaxed) + 1;
        let pipeline = Arc::clone(&self.pipeline);
        let flight = async move { pipeline.refresh().await.map(Arc::new).map_err(Arc::new) }
            .boxed()
            .shared();
        *slot = Some((id, flight.clone()));
        (id, flight)
    }

    fn finish_refresh(&self, flight_id: u64) {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(id, _)| *id == flight_id) {
            *slot = None;
        }
    }
}
