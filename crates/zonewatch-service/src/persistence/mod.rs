//! Persistence collaborator interface and adapters.
//!
//! The orchestrator depends only on [`ZoneRepository`]; production hosts use
//! the SQLite adapter, tests use the in-memory one.

mod memory;
mod sqlite;

pub use memory::InMemoryZoneRepository;
pub use sqlite::SqliteZoneRepository;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use zonewatch_core::{Zone, ZoneFilter};

/// Aggregated per-zone metrics, merged by `analytics_update` tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneAnalytics {
    pub zone_id: String,
    pub visits_today: u64,
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
}

impl ZoneAnalytics {
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            visits_today: 0,
            metrics: HashMap::new(),
        }
    }

    /// Additively merge a metrics delta into this bucket.
    pub fn merge(&mut self, delta: &HashMap<String, f64>) {
        for (key, value) in delta {
            *self.metrics.entry(key.clone()).or_insert(0.0) += value;
        }
    }
}

/// Storage collaborator for zones and their analytics.
///
/// Failures propagate to the caller as persistence errors; the orchestrator
/// never retries these calls itself.
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn fetch_zones(&self, filter: Option<ZoneFilter>) -> Result<Vec<Zone>>;
    async fn fetch_zone(&self, id: &str) -> Result<Option<Zone>>;
    async fn create_zone(&self, zone: &Zone) -> Result<()>;
    async fn update_zone(&self, zone: &Zone) -> Result<()>;
    /// Returns false when no zone with that id existed.
    async fn delete_zone(&self, id: &str) -> Result<bool>;
    async fn fetch_analytics(&self, zone_id: &str) -> Result<Option<ZoneAnalytics>>;
    async fn upsert_analytics(&self, analytics: &ZoneAnalytics) -> Result<()>;
}
