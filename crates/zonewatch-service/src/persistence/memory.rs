//! In-memory repository adapter for tests and embedded hosts.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use zonewatch_core::{Zone, ZoneFilter};

use super::{ZoneAnalytics, ZoneRepository};

#[derive(Default)]
pub struct InMemoryZoneRepository {
    zones: DashMap<String, Zone>,
    analytics: DashMap<String, ZoneAnalytics>,
    failing: AtomicBool,
    listing_failing: AtomicBool,
}

impl InMemoryZoneRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, for exercising error paths.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only `fetch_zones`, leaving single-record operations working.
    pub fn set_listing_failing(&self, failing: bool) {
        self.listing_failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ZoneRepository for InMemoryZoneRepository {
    async fn fetch_zones(&self, filter: Option<ZoneFilter>) -> Result<Vec<Zone>> {
        self.check_available()?;
        if self.listing_failing.load(Ordering::SeqCst) {
            anyhow::bail!("zone listing unavailable");
        }
        let mut zones: Vec<Zone> = self
            .zones
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|zone| filter.as_ref().map_or(true, |f| f.matches(zone)))
            .collect();
        // Deterministic order for callers and tests.
        zones.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(zones)
    }

    async fn fetch_zone(&self, id: &str) -> Result<Option<Zone>> {
        self.check_available()?;
        Ok(self.zones.get(id).map(|entry| entry.value().clone()))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<()> {
        self.check_available()?;
        self.zones.insert(zone.id.clone(), zone.clone());
        Ok(())
    }

    async fn update_zone(&self, zone: &Zone) -> Result<()> {
        self.check_available()?;
        if !self.zones.contains_key(&zone.id) {
            anyhow::bail!("zone {} does not exist", zone.id);
        }
        self.zones.insert(zone.id.clone(), zone.clone());
        Ok(())
    }

    async fn delete_zone(&self, id: &str) -> Result<bool> {
        self.check_available()?;
        self.analytics.remove(id);
        Ok(self.zones.remove(id).is_some())
    }

    async fn fetch_analytics(&self, zone_id: &str) -> Result<Option<ZoneAnalytics>> {
        self.check_available()?;
        Ok(self.analytics.get(zone_id).map(|entry| entry.value().clone()))
    }

    async fn upsert_analytics(&self, analytics: &ZoneAnalytics) -> Result<()> {
        self.check_available()?;
        self.analytics
            .insert(analytics.zone_id.clone(), analytics.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewatch_core::{Coordinates, CreateZoneRequest, ZoneGeometry, ZoneType};

    fn sample_zone(name: &str) -> Zone {
        Zone::from_request(CreateZoneRequest {
            name: name.to_string(),
            zone_type: ZoneType::TouristAttraction,
            geometry: ZoneGeometry::Circle {
                center: Coordinates::new(28.6, 77.2),
                radius_m: 500.0,
            },
            access_restrictions: None,
            alert_settings: None,
        })
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let repo = InMemoryZoneRepository::new();
        let zone = sample_zone("a");

        repo.create_zone(&zone).await.unwrap();
        assert!(repo.fetch_zone(&zone.id).await.unwrap().is_some());
        assert_eq!(repo.fetch_zones(None).await.unwrap().len(), 1);

        assert!(repo.delete_zone(&zone.id).await.unwrap());
        assert!(!repo.delete_zone(&zone.id).await.unwrap());
    }

    #[tokio::test]
    async fn failing_mode_surfaces_errors() {
        let repo = InMemoryZoneRepository::new();
        repo.set_failing(true);
        assert!(repo.fetch_zones(None).await.is_err());
    }

    #[tokio::test]
    async fn listing_failure_leaves_single_record_ops_working() {
        let repo = InMemoryZoneRepository::new();
        let zone = sample_zone("a");
        repo.create_zone(&zone).await.unwrap();

        repo.set_listing_failing(true);
        assert!(repo.fetch_zones(None).await.is_err());
        assert!(repo.fetch_zone(&zone.id).await.unwrap().is_some());
        assert!(repo.create_zone(&sample_zone("b")).await.is_ok());
    }

    #[tokio::test]
    async fn filter_is_applied() {
        let repo = InMemoryZoneRepository::new();
        repo.create_zone(&sample_zone("a")).await.unwrap();

        let filter = ZoneFilter {
            zone_type: Some(ZoneType::Restricted),
            min_risk_level: None,
        };
        assert!(repo.fetch_zones(Some(filter)).await.unwrap().is_empty());
    }
}
