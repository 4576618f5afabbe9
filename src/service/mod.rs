//! The cache-and-derive pipeline
//!
//! [`Planner`] owns the cache store and the upstream client and exposes the
//! four core operations: list tasks, get map detail, list ammunition, clear
//! cache. Every read goes cache-first; a miss triggers one upstream fetch,
//! one derivation pass and one cache write. Concurrent misses may each fetch
//! independently; the fetch is idempotent and the last writer wins.

use crate::cache::{CacheStats, Store};
use crate::config::PlannerConfig;
use crate::model::{AmmoSheet, MapDetail, Task};
use crate::upstream::{GraphQlClient, Upstream};
use crate::{derive, query, Result};
use std::sync::Arc;
use std::time::Duration;

/// Core service: upstream client + cache store + derivation
pub struct Planner<U: Upstream = GraphQlClient> {
    upstream: U,
    store: Store,
}

impl Planner<GraphQlClient> {
    /// Build the production planner from configuration
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        Ok(Self {
            upstream: GraphQlClient::new(config)?,
            store: Store::new(config.cache_ttl),
        })
    }
}

impl<U: Upstream> Planner<U> {
    /// Build a planner around any upstream implementation
    pub fn with_upstream(upstream: U, cache_ttl: Duration) -> Self {
        Self {
            upstream,
            store: Store::new(cache_ttl),
        }
    }

    /// Fresh derived task dataset, fetching and deriving on a cache miss
    async fn derived_tasks(&self) -> Result<Arc<Vec<Task>>> {
        if let Some(tasks) = self.store.tasks().await {
            return Ok(tasks);
        }

        tracing::info!("Task cache miss, fetching from upstream");
        let mut tasks = self.upstream.fetch_tasks().await?;
        derive::attach_unlocks(&mut tasks);
        Ok(self.store.put_tasks(tasks).await)
    }

    /// Tasks for a map identifier (synonym or the `ALL` sentinel),
    /// sorted by name ascending.
    ///
    /// Upstream failures propagate: an empty result always means the
    /// upstream genuinely has no matching data.
    pub async fn list_tasks(&self, map_identifier: &str) -> Result<Vec<Task>> {
        let selector = query::resolve(map_identifier);
        let tasks = self.derived_tasks().await?;
        Ok(query::select_by_map(&tasks, &selector))
    }

    /// The full ammunition sheet, enriched and grouped
    pub async fn list_ammo(&self) -> Result<Arc<AmmoSheet>> {
        if let Some(sheet) = self.store.ammo().await {
            return Ok(sheet);
        }

        tracing::info!("Ammo cache miss, fetching from upstream");
        let raw = self.upstream.fetch_ammo().await?;
        let sheet = derive::enrich_ammo(raw);
        Ok(self.store.put_ammo(sheet).await)
    }

    /// Detail for a map identifier. Never fails: unknown maps and upstream
    /// failures both yield the canonical empty detail so map visualization
    /// degrades instead of breaking the caller. Only successful non-empty
    /// results are cached.
    pub async fn map_detail(&self, map_identifier: &str) -> Arc<MapDetail> {
        let canonical = query::canonical_label(map_identifier);

        if let Some(detail) = self.store.map(&canonical).await {
            return detail;
        }

        match self
            .upstream
            .fetch_maps(std::slice::from_ref(&canonical))
            .await
        {
            Ok(mut maps) if !maps.is_empty() => {
                self.store.put_map(&canonical, maps.swap_remove(0)).await
            }
            Ok(_) => {
                tracing::warn!(map = %canonical, "Upstream returned no rows for map");
                Arc::new(MapDetail::empty(canonical))
            }
            Err(e) => {
                tracing::warn!(map = %canonical, error = %e, "Map fetch failed, serving empty detail");
                Arc::new(MapDetail::empty(canonical))
            }
        }
    }

    /// Reset every cache entry in one step
    pub async fn clear_cache(&self) {
        self.store.clear().await;
    }

    /// Cache occupancy snapshot, for the health endpoint
    pub async fn cache_stats(&self) -> CacheStats {
        self.store.stats().await
    }

    /// Reference to the upstream implementation (for testing)
    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}
