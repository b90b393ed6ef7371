//! Geometry, models, overlap detection, and risk scoring for tourist zones.
//! Pure computation; no I/O or async.

pub mod geo;
pub mod models;
pub mod overlap;
pub mod risk;

pub use geo::haversine_distance;
pub use models::{
    AccessRestrictions, AlertSettings, BoundingBox, Coordinates, CreateZoneRequest, RiskLevel,
    UpdateZoneRequest, Zone, ZoneFilter, ZoneGeometry, ZoneStatistics, ZoneType,
};
pub use overlap::{compute_overlap, ConflictSeverity, OverlapType, ZoneOverlap};
pub use risk::{
    calculate_risk, risk_level_from_score, RiskSignals, TerrainComplexity, WeatherConditions,
};
