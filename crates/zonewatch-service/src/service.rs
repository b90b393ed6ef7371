//! Zone service orchestrator.
//!
//! The public surface of the system: zone CRUD, containment queries, overlap
//! detection, geofence entry/exit handling, and risk-level mutation. Composes
//! the cache, the task queue, the persistence collaborator, and the event
//! publisher; none of those are reachable from outside except through this
//! service.

use dashmap::DashMap;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};
use zonewatch_core::{
    compute_overlap, geo, risk, Coordinates, CreateZoneRequest, RiskLevel, RiskSignals,
    UpdateZoneRequest, Zone, ZoneFilter, ZoneGeometry, ZoneOverlap,
};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::environment::{TerrainProvider, WeatherProvider};
use crate::error::{Result, ZoneError};
use crate::events::{AlertType, EventPublisher, ZoneEvent};
use crate::persistence::{ZoneAnalytics, ZoneRepository};
use crate::queue::{Task, TaskPayload, TaskQueue};

/// Everything the orchestrator caches, matched exhaustively on read.
#[derive(Clone)]
enum CacheValue {
    ZoneList(Vec<Zone>),
    Zone(Box<Zone>),
    Analytics(ZoneAnalytics),
}

pub struct ZoneService {
    repo: Arc<dyn ZoneRepository>,
    publisher: Arc<dyn EventPublisher>,
    weather: Arc<dyn WeatherProvider>,
    terrain: Arc<dyn TerrainProvider>,
    cache: TtlCache<CacheValue>,
    queue: Arc<TaskQueue>,
    /// tourist id -> set of zone ids the tourist is currently inside.
    memberships: DashMap<String, HashSet<String>>,
    /// Per-zone locks serializing occupancy mutation. Required: concurrent
    /// entry/exit for the same zone must not lose updates.
    zone_locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    list_pattern: Regex,
    config: Config,
}

impl ZoneService {
    pub fn new(
        repo: Arc<dyn ZoneRepository>,
        publisher: Arc<dyn EventPublisher>,
        weather: Arc<dyn WeatherProvider>,
        terrain: Arc<dyn TerrainProvider>,
        config: Config,
    ) -> Self {
        Self {
            repo,
            publisher,
            weather,
            terrain,
            cache: TtlCache::new(config.default_cache_ttl),
            queue: Arc::new(TaskQueue::new(config.queue_max_attempts)),
            memberships: DashMap::new(),
            zone_locks: DashMap::new(),
            list_pattern: Regex::new("^zones:list").expect("static pattern"),
            config,
        }
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    // ========== ZONE CRUD ==========

    /// List zones, cache-first, falling back to the persistence collaborator.
    pub async fn fetch_zones(&self, filter: Option<ZoneFilter>) -> Result<Vec<Zone>> {
        let key = list_key(filter);
        if let Some(CacheValue::ZoneList(zones)) = self.cache.get(&key) {
            debug!(key, "zone list cache hit");
            return Ok(zones);
        }

        let zones = self
            .repo
            .fetch_zones(filter)
            .await
            .map_err(ZoneError::persistence)?;
        self.cache.set(
            key,
            CacheValue::ZoneList(zones.clone()),
            Some(self.config.list_cache_ttl),
        );
        Ok(zones)
    }

    /// Fetch one zone, cache-first.
    pub async fn fetch_zone(&self, id: &str) -> Result<Zone> {
        let key = zone_key(id);
        if let Some(CacheValue::Zone(zone)) = self.cache.get(&key) {
            return Ok(*zone);
        }

        let zone = self
            .repo
            .fetch_zone(id)
            .await
            .map_err(ZoneError::persistence)?
            .ok_or_else(|| ZoneError::NotFound(id.to_string()))?;
        self.cache.set(
            key,
            CacheValue::Zone(Box::new(zone.clone())),
            Some(self.config.zone_cache_ttl),
        );
        Ok(zone)
    }

    /// Create a zone from a request. Geometry is validated; overlaps with
    /// existing zones are reported as warnings but never block creation.
    pub async fn create_zone(&self, request: CreateZoneRequest) -> Result<Zone> {
        let errors = request.geometry.validate();
        if !errors.is_empty() {
            return Err(ZoneError::Validation(errors.join("; ")));
        }

        let zone = Zone::from_request(request);

        // Overlap detection is a warning, never a gate; a listing outage
        // must not block creation.
        match self.repo.fetch_zones(None).await {
            Ok(existing) => {
                for other in &existing {
                    if let Some(overlap) = compute_overlap(&zone, other) {
                        warn!(
                            zone_id = %zone.id,
                            other_id = %other.id,
                            overlap_pct = overlap.overlap_pct,
                            severity = ?overlap.conflict_severity,
                            "new zone overlaps an existing zone"
                        );
                    }
                }
            }
            Err(err) => warn!(zone_id = %zone.id, "overlap check skipped: {err}"),
        }

        self.repo
            .create_zone(&zone)
            .await
            .map_err(ZoneError::persistence)?;
        info!(zone_id = %zone.id, name = %zone.name, "zone created");

        self.queue.enqueue(TaskPayload::AnalyticsUpdate {
            zone_id: zone.id.clone(),
            metrics: HashMap::from([("zones_created".to_string(), 1.0)]),
        });
        self.cache.invalidate_pattern(&self.list_pattern);

        Ok(zone)
    }

    /// Apply a partial update. Geometry changes re-validate and recompute the
    /// bounding box. Holds the zone lock across the read-modify-write so a
    /// concurrent entry/exit cannot be overwritten by a stale snapshot.
    pub async fn update_zone(&self, id: &str, request: UpdateZoneRequest) -> Result<Zone> {
        let lock = self.zone_lock(id);
        let _guard = lock.lock().await;

        let mut zone = self
            .repo
            .fetch_zone(id)
            .await
            .map_err(ZoneError::persistence)?
            .ok_or_else(|| ZoneError::NotFound(id.to_string()))?;

        if let Some(geometry) = request.geometry {
            let errors = geometry.validate();
            if !errors.is_empty() {
                return Err(ZoneError::Validation(errors.join("; ")));
            }
            zone.bounding_box = geometry.bounding_box();
            zone.geometry = geometry;
        }
        if let Some(name) = request.name {
            zone.name = name;
        }
        if let Some(zone_type) = request.zone_type {
            zone.zone_type = zone_type;
        }
        if let Some(restrictions) = request.access_restrictions {
            zone.access_restrictions = restrictions;
        }
        if let Some(alerts) = request.alert_settings {
            zone.alert_settings = alerts;
        }
        zone.updated_at = chrono::Utc::now();

        self.repo
            .update_zone(&zone)
            .await
            .map_err(ZoneError::persistence)?;

        self.queue.enqueue(TaskPayload::ZoneUpdate {
            zone_id: zone.id.clone(),
        });
        self.invalidate_zone_keys(id);

        Ok(zone)
    }

    /// Delete a zone and purge every cached derivative keyed by its id.
    pub async fn delete_zone(&self, id: &str) -> Result<()> {
        let deleted = self
            .repo
            .delete_zone(id)
            .await
            .map_err(ZoneError::persistence)?;
        if !deleted {
            return Err(ZoneError::NotFound(id.to_string()));
        }

        self.invalidate_zone_keys(id);
        self.zone_locks.remove(id);
        for mut entry in self.memberships.iter_mut() {
            entry.value_mut().remove(id);
        }
        self.memberships.retain(|_, zones| !zones.is_empty());
        info!(zone_id = %id, "zone deleted");
        Ok(())
    }

    // ========== CONTAINMENT & OVERLAP QUERIES ==========

    /// Containment test, dispatched on the geometry tag.
    pub fn is_point_in_zone(&self, point: Coordinates, zone: &Zone) -> bool {
        match &zone.geometry {
            ZoneGeometry::Circle { center, radius_m } => {
                geo::point_in_circle(point, *center, *radius_m)
            }
            ZoneGeometry::Polygon { points } => geo::point_in_polygon(point, points),
        }
    }

    /// All zones containing the point. Linear in zone count, which stays
    /// small relative to tourist counts; the bounding box rejects most zones
    /// cheaply.
    pub async fn find_zones_containing_point(
        &self,
        point: Coordinates,
        filter: Option<ZoneFilter>,
    ) -> Result<Vec<Zone>> {
        let zones = self.fetch_zones(filter).await?;
        Ok(zones
            .into_iter()
            .filter(|zone| zone.bounding_box.contains(point) && self.is_point_in_zone(point, zone))
            .collect())
    }

    /// Overlaps between the given zone and every other known zone.
    pub async fn check_zone_overlaps(&self, zone: &Zone) -> Result<Vec<ZoneOverlap>> {
        let zones = self.fetch_zones(None).await?;
        Ok(zones
            .iter()
            .filter(|other| other.id != zone.id)
            .filter_map(|other| compute_overlap(zone, other))
            .collect())
    }

    // ========== GEOFENCE TRACKING ==========

    /// Accept a tourist location update. Candidate zones are resolved now;
    /// containment evaluation runs asynchronously on the queue. Returns the
    /// queued task id.
    pub async fn submit_location(&self, tourist_id: &str, location: Coordinates) -> Result<String> {
        let candidates = self.fetch_zones(None).await?;
        let zone_ids = candidates.into_iter().map(|zone| zone.id).collect();

        Ok(self.queue.enqueue(TaskPayload::GeofenceCheck {
            tourist_id: tourist_id.to_string(),
            location,
            zone_ids,
        }))
    }

    /// Zone ids a tourist is currently inside.
    pub fn current_memberships(&self, tourist_id: &str) -> HashSet<String> {
        self.memberships
            .get(tourist_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of tourists currently inside at least one zone.
    pub fn tracked_tourists(&self) -> usize {
        self.memberships.len()
    }

    /// Handle a confirmed OUTSIDE -> INSIDE transition: bump occupancy,
    /// raise the entry alert if enabled, and schedule a risk recalculation.
    pub async fn handle_zone_entry(
        &self,
        tourist_id: &str,
        zone_id: &str,
        location: Coordinates,
    ) -> Result<()> {
        let lock = self.zone_lock(zone_id);
        let _guard = lock.lock().await;

        let mut zone = self
            .repo
            .fetch_zone(zone_id)
            .await
            .map_err(ZoneError::persistence)?
            .ok_or_else(|| ZoneError::NotFound(zone_id.to_string()))?;

        zone.statistics.current_occupancy += 1;
        let alert = zone.alert_settings.enable_entry_alerts;
        if alert {
            zone.statistics.alerts_triggered_today += 1;
        }
        zone.updated_at = chrono::Utc::now();
        self.repo
            .update_zone(&zone)
            .await
            .map_err(ZoneError::persistence)?;
        self.invalidate_zone_keys(zone_id);

        if alert {
            self.publish_best_effort(ZoneEvent::GeofenceAlert {
                alert_type: AlertType::Entry,
                tourist_id: tourist_id.to_string(),
                zone_id: zone.id.clone(),
                zone_name: zone.name.clone(),
                location,
                timestamp: chrono::Utc::now(),
                risk_level: zone.risk_level,
            })
            .await;
        }

        self.queue.enqueue(TaskPayload::RiskCalculation {
            zone_id: zone_id.to_string(),
        });
        self.queue.enqueue(TaskPayload::AnalyticsUpdate {
            zone_id: zone_id.to_string(),
            metrics: HashMap::from([("entries".to_string(), 1.0)]),
        });

        debug!(tourist_id, zone_id, "zone entry handled");
        Ok(())
    }

    /// Handle a confirmed INSIDE -> OUTSIDE transition. Occupancy floors at
    /// zero; an exit alert fires only when enabled for the zone.
    pub async fn handle_zone_exit(
        &self,
        tourist_id: &str,
        zone_id: &str,
        location: Coordinates,
    ) -> Result<()> {
        let lock = self.zone_lock(zone_id);
        let _guard = lock.lock().await;

        let mut zone = self
            .repo
            .fetch_zone(zone_id)
            .await
            .map_err(ZoneError::persistence)?
            .ok_or_else(|| ZoneError::NotFound(zone_id.to_string()))?;

        zone.statistics.current_occupancy = zone.statistics.current_occupancy.saturating_sub(1);
        let alert = zone.alert_settings.enable_exit_alerts;
        if alert {
            zone.statistics.alerts_triggered_today += 1;
        }
        zone.updated_at = chrono::Utc::now();
        self.repo
            .update_zone(&zone)
            .await
            .map_err(ZoneError::persistence)?;
        self.invalidate_zone_keys(zone_id);

        if alert {
            self.publish_best_effort(ZoneEvent::GeofenceAlert {
                alert_type: AlertType::Exit,
                tourist_id: tourist_id.to_string(),
                zone_id: zone.id.clone(),
                zone_name: zone.name.clone(),
                location,
                timestamp: chrono::Utc::now(),
                risk_level: zone.risk_level,
            })
            .await;
        }

        self.queue.enqueue(TaskPayload::RiskCalculation {
            zone_id: zone_id.to_string(),
        });

        debug!(tourist_id, zone_id, "zone exit handled");
        Ok(())
    }

    // ========== RISK ==========

    /// Compute the current risk score for a zone without mutating anything.
    pub async fn calculate_zone_risk(&self, id: &str) -> Result<f64> {
        let zone = self
            .repo
            .fetch_zone(id)
            .await
            .map_err(ZoneError::persistence)?
            .ok_or_else(|| ZoneError::NotFound(id.to_string()))?;
        let signals = self.gather_signals(&zone).await;
        Ok(risk::calculate_risk(&zone, &signals))
    }

    /// Force a zone's stored risk level and announce the change.
    pub async fn update_zone_risk_level(&self, id: &str, level: RiskLevel) -> Result<()> {
        let lock = self.zone_lock(id);
        let _guard = lock.lock().await;

        let mut zone = self
            .repo
            .fetch_zone(id)
            .await
            .map_err(ZoneError::persistence)?
            .ok_or_else(|| ZoneError::NotFound(id.to_string()))?;

        zone.risk_level = level;
        zone.updated_at = chrono::Utc::now();
        self.repo
            .update_zone(&zone)
            .await
            .map_err(ZoneError::persistence)?;
        self.invalidate_zone_keys(id);

        self.publish_best_effort(ZoneEvent::RiskLevelChanged {
            zone_id: id.to_string(),
            risk_level: level,
        })
        .await;
        Ok(())
    }

    // ========== MAINTENANCE ==========

    /// Daily rollover: clear per-day alert counters on every zone. Each zone
    /// is re-read under its lock so live occupancy updates are not clobbered
    /// by the listing snapshot.
    pub async fn reset_daily_statistics(&self) -> Result<()> {
        let zones = self
            .repo
            .fetch_zones(None)
            .await
            .map_err(ZoneError::persistence)?;
        for zone in zones {
            let lock = self.zone_lock(&zone.id);
            let _guard = lock.lock().await;

            let Some(mut zone) = self
                .repo
                .fetch_zone(&zone.id)
                .await
                .map_err(ZoneError::persistence)?
            else {
                continue;
            };
            zone.statistics.alerts_triggered_today = 0;
            zone.updated_at = chrono::Utc::now();
            self.repo
                .update_zone(&zone)
                .await
                .map_err(ZoneError::persistence)?;
        }
        self.cache.clear();
        Ok(())
    }

    /// Inbound control message from another instance: drop local cache
    /// entries derived from the named zone.
    pub fn apply_remote_event(&self, event: &ZoneEvent) {
        debug!(zone_id = event.zone_id(), "remote event, invalidating cache");
        self.invalidate_zone_keys(event.zone_id());
    }

    /// Periodic cache sweep; hosts call this from a timer if they care.
    pub fn prune_cache(&self) {
        self.cache.prune(self.config.cache_max_entries);
    }

    // ========== TASK EXECUTION ==========

    pub(crate) async fn handle_task(&self, task: &Task) -> anyhow::Result<()> {
        match &task.payload {
            TaskPayload::ZoneUpdate { zone_id } => {
                self.invalidate_zone_keys(zone_id);
                self.publish_best_effort(ZoneEvent::ZoneUpdated {
                    zone_id: zone_id.clone(),
                })
                .await;
                Ok(())
            }
            TaskPayload::GeofenceCheck {
                tourist_id,
                location,
                zone_ids,
            } => self.run_geofence_check(tourist_id, *location, zone_ids).await,
            TaskPayload::RiskCalculation { zone_id } => self.run_risk_calculation(zone_id).await,
            TaskPayload::AnalyticsUpdate { zone_id, metrics } => {
                self.run_analytics_update(zone_id, metrics).await
            }
        }
    }

    /// Recompute containment for each candidate zone and fire entry/exit
    /// side effects only on actual transitions. Repeated checks with no
    /// transition are no-ops.
    async fn run_geofence_check(
        &self,
        tourist_id: &str,
        location: Coordinates,
        zone_ids: &[String],
    ) -> anyhow::Result<()> {
        let mut failures = 0usize;

        for zone_id in zone_ids {
            let zone = match self.repo.fetch_zone(zone_id).await {
                Ok(Some(zone)) => zone,
                // Deleted since the task was enqueued; nothing to evaluate.
                Ok(None) => continue,
                Err(err) => {
                    warn!(zone_id, "geofence check fetch failed: {err}");
                    failures += 1;
                    continue;
                }
            };

            let inside = self.is_point_in_zone(location, &zone);
            let was_inside = self
                .memberships
                .get(tourist_id)
                .map(|entry| entry.value().contains(zone_id))
                .unwrap_or(false);

            let result = if inside && !was_inside {
                let handled = self.handle_zone_entry(tourist_id, zone_id, location).await;
                if handled.is_ok() {
                    self.memberships
                        .entry(tourist_id.to_string())
                        .or_default()
                        .insert(zone_id.clone());
                }
                handled
            } else if !inside && was_inside {
                let handled = self.handle_zone_exit(tourist_id, zone_id, location).await;
                if handled.is_ok() {
                    let now_empty = match self.memberships.get_mut(tourist_id) {
                        Some(mut entry) => {
                            entry.value_mut().remove(zone_id);
                            entry.value().is_empty()
                        }
                        None => false,
                    };
                    // Tourists outside every zone are not tracked at all.
                    if now_empty {
                        self.memberships.remove_if(tourist_id, |_, set| set.is_empty());
                    }
                }
                handled
            } else {
                Ok(())
            };

            if let Err(err) = result {
                warn!(tourist_id, zone_id, "geofence transition failed: {err}");
                failures += 1;
            }
        }

        if failures > 0 {
            anyhow::bail!("{failures} zone(s) failed during geofence check");
        }
        Ok(())
    }

    /// Recompute the risk score and, when it moves past the hysteresis band,
    /// persist the new level and announce it. Runs under the zone lock; the
    /// persisted record carries occupancy counters that entry/exit mutate.
    async fn run_risk_calculation(&self, zone_id: &str) -> anyhow::Result<()> {
        let lock = self.zone_lock(zone_id);
        let _guard = lock.lock().await;

        let Some(mut zone) = self.repo.fetch_zone(zone_id).await? else {
            return Ok(());
        };

        let signals = self.gather_signals(&zone).await;
        let new_score = risk::calculate_risk(&zone, &signals);

        if !risk::qualifies_for_level_update(zone.risk_score, new_score) {
            debug!(
                zone_id,
                previous = zone.risk_score,
                new = new_score,
                "risk change within hysteresis band, keeping level"
            );
            return Ok(());
        }

        zone.risk_score = new_score;
        zone.risk_level = risk::risk_level_from_score(new_score);
        zone.updated_at = chrono::Utc::now();
        self.repo.update_zone(&zone).await?;
        self.invalidate_zone_keys(zone_id);

        info!(zone_id, score = new_score, level = ?zone.risk_level, "risk level updated");
        self.publish_best_effort(ZoneEvent::RiskLevelChanged {
            zone_id: zone_id.to_string(),
            risk_level: zone.risk_level,
        })
        .await;
        Ok(())
    }

    /// Merge a metrics delta into the zone's analytics bucket.
    async fn run_analytics_update(
        &self,
        zone_id: &str,
        metrics: &HashMap<String, f64>,
    ) -> anyhow::Result<()> {
        let key = analytics_key(zone_id);
        let mut analytics = match self.cache.get(&key) {
            Some(CacheValue::Analytics(bucket)) => bucket,
            _ => self
                .repo
                .fetch_analytics(zone_id)
                .await?
                .unwrap_or_else(|| ZoneAnalytics::new(zone_id)),
        };

        analytics.merge(metrics);
        if let Some(entries) = metrics.get("entries") {
            analytics.visits_today += entries.max(0.0) as u64;
        }

        self.repo.upsert_analytics(&analytics).await?;
        self.cache
            .set(key, CacheValue::Analytics(analytics), None);
        Ok(())
    }

    // ========== INTERNALS ==========

    async fn gather_signals(&self, zone: &Zone) -> RiskSignals {
        let analytics = match self.cache.get(&analytics_key(&zone.id)) {
            Some(CacheValue::Analytics(bucket)) => Some(bucket),
            _ => self.repo.fetch_analytics(&zone.id).await.ok().flatten(),
        };

        let (alerts_this_week, historical_incidents) = analytics
            .map(|bucket| {
                (
                    bucket.metrics.get("alerts_this_week").copied().unwrap_or(0.0) as u32,
                    bucket.metrics.get("incidents").copied().unwrap_or(0.0) as u32,
                )
            })
            .unwrap_or((0, 0));

        let reference = zone_reference_point(zone);
        RiskSignals {
            alerts_today: zone.statistics.alerts_triggered_today,
            alerts_this_week,
            historical_incidents,
            weather: self.weather.current_weather(reference),
            terrain: self.terrain.terrain_complexity(reference),
        }
    }

    fn zone_lock(&self, zone_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.zone_locks
            .entry(zone_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn invalidate_zone_keys(&self, zone_id: &str) {
        if let Ok(pattern) = Regex::new(&format!(
            "^(zone|analytics):{}$",
            regex::escape(zone_id)
        )) {
            self.cache.invalidate_pattern(&pattern);
        }
        self.cache.invalidate_pattern(&self.list_pattern);
    }

    /// Publishing is fire-and-forget: a down channel never blocks state
    /// from advancing.
    async fn publish_best_effort(&self, event: ZoneEvent) {
        if let Err(err) = self.publisher.publish(&event).await {
            debug!("event publish skipped: {err}");
        }
    }
}

/// Drain and execute queued tasks until the queue is empty, without the
/// worker's yield delay. Intended for tests and embedded hosts that drive
/// the queue themselves. Returns the number of handler attempts made.
impl ZoneService {
    pub async fn drain_queue(&self) -> usize {
        let mut attempts = 0;
        while let Some(task) = self.queue.pop() {
            attempts += 1;
            if let Err(err) = self.handle_task(&task).await {
                warn!(task_id = %task.id, kind = task.payload.kind(), "task failed: {err}");
                self.queue.requeue_failed(task);
            }
        }
        attempts
    }
}

/// Single queue consumer. Pops the highest-priority task, executes it, and
/// yields on a short fixed delay after each item so the worker never starves
/// other work.
pub async fn run_queue_worker(service: Arc<ZoneService>) {
    let delay = service.config.queue_drain_delay;
    info!("zone task worker started");

    loop {
        match service.queue.pop() {
            Some(task) => {
                if let Err(err) = service.handle_task(&task).await {
                    warn!(
                        task_id = %task.id,
                        kind = task.payload.kind(),
                        attempt = task.retries + 1,
                        "task failed: {err}"
                    );
                    service.queue.requeue_failed(task);
                }
                tokio::time::sleep(delay).await;
            }
            None => service.queue.wait_for_work().await,
        }
    }
}

fn zone_key(id: &str) -> String {
    format!("zone:{id}")
}

fn analytics_key(id: &str) -> String {
    format!("analytics:{id}")
}

fn list_key(filter: Option<ZoneFilter>) -> String {
    match filter {
        None => "zones:list:all".to_string(),
        Some(f) => format!("zones:list:{:?}:{:?}", f.zone_type, f.min_risk_level),
    }
}

/// Representative point for external lookups: circle center, or polygon
/// centroid with a bounding-box-center fallback for degenerate rings.
fn zone_reference_point(zone: &Zone) -> Coordinates {
    match &zone.geometry {
        ZoneGeometry::Circle { center, .. } => *center,
        ZoneGeometry::Polygon { points } => {
            geo::polygon_centroid(points).unwrap_or(Coordinates {
                latitude: (zone.bounding_box.northeast.latitude
                    + zone.bounding_box.southwest.latitude)
                    / 2.0,
                longitude: (zone.bounding_box.northeast.longitude
                    + zone.bounding_box.southwest.longitude)
                    / 2.0,
            })
        }
    }
}
