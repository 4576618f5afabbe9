//! In-memory TTL cache for derived payloads
//!
//! One slot each for the task and ammunition datasets plus one entry per
//! canonical map label. Entries are replaced wholesale and handed out as
//! `Arc` views; readers never observe a half-written entry and must not
//! mutate what they receive. Stale entries are superseded, never evicted.

use crate::model::{AmmoSheet, MapDetail, Task};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A cached payload and the moment it was stored
#[derive(Debug)]
struct Entry<T> {
    payload: Arc<T>,
    fetched_at: Instant,
}

impl<T> Entry<T> {
    fn new(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
            fetched_at: Instant::now(),
        }
    }

    fn fresh(&self, ttl: Duration) -> Option<Arc<T>> {
        if self.fetched_at.elapsed() < ttl {
            Some(Arc::clone(&self.payload))
        } else {
            None
        }
    }
}

/// Process-local cache store
///
/// The only shared mutable state in the system; constructed once at startup
/// and handed to request handlers behind an `Arc`.
#[derive(Debug)]
pub struct Store {
    ttl: Duration,
    tasks: RwLock<Option<Entry<Vec<Task>>>>,
    ammo: RwLock<Option<Entry<AmmoSheet>>>,
    maps: RwLock<HashMap<String, Entry<MapDetail>>>,
}

/// Snapshot of the cache state, for the health endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub tasks_cached: bool,
    pub ammo_cached: bool,
    pub maps_cached: usize,
}

impl Store {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tasks: RwLock::new(None),
            ammo: RwLock::new(None),
            maps: RwLock::new(HashMap::new()),
        }
    }

    /// Cached task dataset, only while fresh
    pub async fn tasks(&self) -> Option<Arc<Vec<Task>>> {
        self.tasks.read().await.as_ref().and_then(|e| e.fresh(self.ttl))
    }

    /// Replace the task dataset and stamp the current time
    pub async fn put_tasks(&self, tasks: Vec<Task>) -> Arc<Vec<Task>> {
        let entry = Entry::new(tasks);
        let payload = Arc::clone(&entry.payload);
        *self.tasks.write().await = Some(entry);
        payload
    }

    /// Cached ammunition sheet, only while fresh
    pub async fn ammo(&self) -> Option<Arc<AmmoSheet>> {
        self.ammo.read().await.as_ref().and_then(|e| e.fresh(self.ttl))
    }

    /// Replace the ammunition sheet and stamp the current time
    pub async fn put_ammo(&self, sheet: AmmoSheet) -> Arc<AmmoSheet> {
        let entry = Entry::new(sheet);
        let payload = Arc::clone(&entry.payload);
        *self.ammo.write().await = Some(entry);
        payload
    }

    /// Cached detail for a canonical map label, only while fresh
    pub async fn map(&self, label: &str) -> Option<Arc<MapDetail>> {
        self.maps
            .read()
            .await
            .get(label)
            .and_then(|e| e.fresh(self.ttl))
    }

    /// Replace the detail entry for a canonical map label
    pub async fn put_map(&self, label: &str, detail: MapDetail) -> Arc<MapDetail> {
        let entry = Entry::new(detail);
        let payload = Arc::clone(&entry.payload);
        self.maps.write().await.insert(label.to_string(), entry);
        payload
    }

    /// Reset every entry to empty in one atomic step
    pub async fn clear(&self) {
        tracing::info!("Clearing cache");

        // Hold all three write guards before touching anything so no reader
        // can observe a partially cleared store. Acquired in a fixed order
        // (tasks, ammo, maps); every multi-lock path must use this order or
        // two clears can each hold a lock the other needs.
        let mut tasks = self.tasks.write().await;
        let mut ammo = self.ammo.write().await;
        let mut maps = self.maps.write().await;
        *tasks = None;
        *ammo = None;
        maps.clear();
    }

    /// Current occupancy, ignoring freshness
    pub async fn stats(&self) -> CacheStats {
        // One lock at a time: each guard drops before the next is taken, so
        // this never contends with clear() holding the full lock set.
        let tasks_cached = self.tasks.read().await.is_some();
        let ammo_cached = self.ammo.read().await.is_some();
        let maps_cached = self.maps.read().await.len();

        CacheStats {
            tasks_cached,
            ammo_cached,
            maps_cached,
        }
    }
}
