//! Time-bounded persistence of the last normalized parking snapshot.
//!
//! The snapshot is two keys in a [`KeyValueStore`]: the JSON-encoded spot
//! list and the epoch-millisecond timestamp of the write. A snapshot younger
//! than [`CACHE_EXPIRATION_MS`] is fresh; older ones are bypassed but never
//! deleted. Every storage failure is logged and reported as a miss.

mod store;

use std::sync::Arc;

use swedespot_core::ParkingSpot;

use crate::error::CacheError;

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Key holding the serialized spot list.
pub const PARKING_DATA_KEY: &str = "swedespot_parking_data";
/// Key holding the last write time, epoch milliseconds as a decimal string.
pub const LAST_UPDATED_KEY: &str = "swedespot_last_updated";
/// A snapshot is fresh while its age is strictly below 30 minutes.
pub const CACHE_EXPIRATION_MS: i64 = 30 * 60 * 1000;

/// A stored snapshot and how old it is.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub spots: Vec<ParkingSpot>,
    pub age_ms: i64,
}

impl CacheSnapshot {
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.age_ms < CACHE_EXPIRATION_MS
    }
}

/// Owns the snapshot slot in a key-value store.
///
/// Callers always receive deserialized copies, never a view into the store.
#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn KeyValueStore>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// In-memory cache, mainly for tests and one-shot runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Returns the last stored snapshot with its age, fresh or not.
    ///
    /// `None` when nothing is stored or the store cannot be read.
    pub async fn read(&self) -> Option<CacheSnapshot> {
        match self.try_read().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "parking cache read failed, treating as miss");
                None
            }
        }
    }

    /// Returns the stored spots only if the snapshot is fresh.
    pub async fn read_fresh(&self) -> Option<Vec<ParkingSpot>> {
        let snapshot = self.read().await?;
        if snapshot.is_fresh() {
            tracing::debug!(
                age_ms = snapshot.age_ms,
                spots = snapshot.spots.len(),
                "parking cache hit"
            );
            Some(snapshot.spots)
        } else {
            tracing::debug!(age_ms = snapshot.age_ms, "parking cache stale");
            None
        }
    }

    /// Replaces the stored snapshot with `spots`, stamped with the current time.
    ///
    /// Returns `false` (after logging) if the store rejected the write.
    pub async fn write(&self, spots: &[ParkingSpot]) -> bool {
        match self.try_write(spots).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "parking cache write failed, continuing uncached");
                false
            }
        }
    }

    async fn try_read(&self) -> Result<Option<CacheSnapshot>, CacheError> {
        let Some(stamp) = self.store.get(LAST_UPDATED_KEY).await? else {
            return Ok(None);
        };
        let written_at = stamp
            .trim()
            .parse::<i64>()
            .map_err(|_| CacheError::InvalidTimestamp(stamp.clone()))?;

        let Some(data) = self.store.get(PARKING_DATA_KEY).await? else {
            return Ok(None);
        };
        let spots: Vec<ParkingSpot> = serde_json::from_str(&data)?;

        // A timestamp from the future (clock skew) counts as just written.
        let age_ms = (now_ms() - written_at).max(0);
        Ok(Some(CacheSnapshot { spots, age_ms }))
    }

    async fn try_write(&self, spots: &[ParkingSpot]) -> Result<(), CacheError> {
        let data = serde_json::to_string(spots)?;
        self.store.set(PARKING_DATA_KEY, data).await?;
        self.store
            .set(LAST_UPDATED_KEY, now_ms().to_string())
            .await?;
        Ok(())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
