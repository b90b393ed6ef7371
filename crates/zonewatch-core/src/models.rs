//! Core data models for the zone monitoring system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo;

/// Maximum allowed circle radius in meters.
pub const MAX_CIRCLE_RADIUS_M: f64 = 50_000.0;
/// Maximum allowed polygon vertex count.
pub const MAX_POLYGON_VERTICES: usize = 1_000;

/// An immutable latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Axis-aligned bounding box, derived from zone geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub northeast: Coordinates,
    pub southwest: Coordinates,
}

impl BoundingBox {
    /// Check whether a point falls inside this box (inclusive edges).
    pub fn contains(&self, point: Coordinates) -> bool {
        point.latitude >= self.southwest.latitude
            && point.latitude <= self.northeast.latitude
            && point.longitude >= self.southwest.longitude
            && point.longitude <= self.northeast.longitude
    }
}

/// Zone geometry as a tagged union. Every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneGeometry {
    Circle {
        center: Coordinates,
        radius_m: f64,
    },
    /// Ordered vertex ring; the first/last edge is implicit, the ring need
    /// not be explicitly closed.
    Polygon {
        points: Vec<Coordinates>,
    },
}

impl ZoneGeometry {
    /// Check whether a point lies within this geometry.
    pub fn contains(&self, point: Coordinates) -> bool {
        match self {
            ZoneGeometry::Circle { center, radius_m } => {
                geo::point_in_circle(point, *center, *radius_m)
            }
            ZoneGeometry::Polygon { points } => geo::point_in_polygon(point, points),
        }
    }

    /// Derive the bounding box for this geometry.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            ZoneGeometry::Circle { center, radius_m } => {
                geo::circle_bounding_box(*center, *radius_m)
            }
            ZoneGeometry::Polygon { points } => geo::bounding_box(points),
        }
    }

    /// Approximate ground area covered by this geometry in square meters.
    pub fn area_m2(&self) -> f64 {
        match self {
            ZoneGeometry::Circle { radius_m, .. } => std::f64::consts::PI * radius_m * radius_m,
            ZoneGeometry::Polygon { points } => geo::polygon_area_m2(points),
        }
    }

    /// Validate geometry bounds.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self {
            ZoneGeometry::Circle { radius_m, center } => {
                if *radius_m <= 0.0 {
                    errors.push("Circle radius must be positive".to_string());
                }
                if *radius_m > MAX_CIRCLE_RADIUS_M {
                    errors.push(format!(
                        "Circle radius {}m exceeds maximum ({}m)",
                        radius_m, MAX_CIRCLE_RADIUS_M
                    ));
                }
                if center.latitude.abs() > 90.0 || center.longitude.abs() > 180.0 {
                    errors.push("Circle center is out of range".to_string());
                }
            }
            ZoneGeometry::Polygon { points } => {
                if points.len() < 3 {
                    errors.push("Polygon must have at least 3 vertices".to_string());
                }
                if points.len() > MAX_POLYGON_VERTICES {
                    errors.push(format!(
                        "Polygon has {} vertices, maximum is {}",
                        points.len(),
                        MAX_POLYGON_VERTICES
                    ));
                }
                if points
                    .iter()
                    .any(|p| p.latitude.abs() > 90.0 || p.longitude.abs() > 180.0)
                {
                    errors.push("Polygon vertex is out of range".to_string());
                }
            }
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Category of a monitored zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Safe,
    TouristAttraction,
    Risk,
    Restricted,
    Emergency,
    Accommodation,
    TransportHub,
    Medical,
    Police,
    BorderCheckpoint,
}

/// Discrete risk level derived from a numeric score via fixed thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
    Critical,
}

/// Occupancy and permission constraints on a zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessRestrictions {
    #[serde(default)]
    pub max_occupancy: Option<u32>,
    #[serde(default)]
    pub requires_permission: bool,
    #[serde(default)]
    pub requires_guide: bool,
}

/// Which geofence transitions raise alerts for this zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub enable_entry_alerts: bool,
    pub enable_exit_alerts: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enable_entry_alerts: true,
            enable_exit_alerts: false,
        }
    }
}

/// Live counters, mutated only by the orchestrator's entry/exit handlers
/// and the daily rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub current_occupancy: u32,
    pub alerts_triggered_today: u32,
}

/// A named geographic region with geometry and risk metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub zone_type: ZoneType,
    pub geometry: ZoneGeometry,
    /// Derived from `geometry`; recomputed whenever geometry changes.
    pub bounding_box: BoundingBox,
    pub risk_level: RiskLevel,
    /// Last computed numeric risk score, kept for the hysteresis check.
    pub risk_score: f64,
    #[serde(default)]
    pub access_restrictions: AccessRestrictions,
    #[serde(default)]
    pub alert_settings: AlertSettings,
    #[serde(default)]
    pub statistics: ZoneStatistics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Zone {
    /// Build a new zone from a validated creation request.
    ///
    /// Callers must run `request.geometry.validate()` first; this constructor
    /// only assembles the record.
    pub fn from_request(request: CreateZoneRequest) -> Self {
        let now = Utc::now();
        let bounding_box = request.geometry.bounding_box();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name,
            zone_type: request.zone_type,
            geometry: request.geometry,
            bounding_box,
            risk_level: RiskLevel::VeryLow,
            risk_score: 0.0,
            access_restrictions: request.access_restrictions.unwrap_or_default(),
            alert_settings: request.alert_settings.unwrap_or_default(),
            statistics: ZoneStatistics::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a point lies within this zone's geometry.
    pub fn contains_point(&self, point: Coordinates) -> bool {
        self.geometry.contains(point)
    }
}

// ========== REQUEST / FILTER TYPES ==========

/// Request to create a new zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateZoneRequest {
    pub name: String,
    pub zone_type: ZoneType,
    pub geometry: ZoneGeometry,
    #[serde(default)]
    pub access_restrictions: Option<AccessRestrictions>,
    #[serde(default)]
    pub alert_settings: Option<AlertSettings>,
}

/// Partial update to an existing zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateZoneRequest {
    pub name: Option<String>,
    pub zone_type: Option<ZoneType>,
    pub geometry: Option<ZoneGeometry>,
    pub access_restrictions: Option<AccessRestrictions>,
    pub alert_settings: Option<AlertSettings>,
}

/// Filter applied when listing zones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneFilter {
    pub zone_type: Option<ZoneType>,
    pub min_risk_level: Option<RiskLevel>,
}

impl ZoneFilter {
    pub fn matches(&self, zone: &Zone) -> bool {
        if let Some(zone_type) = self.zone_type {
            if zone.zone_type != zone_type {
                return false;
            }
        }
        if let Some(min) = self.min_risk_level {
            if zone.risk_level < min {
                return false;
            }
        }
        true
    }
}
