//! Risk assessment engine.
//!
//! Produces a 0-100 score per zone from five weighted signals. Each sub-score
//! is clamped to [0, 100] before weighting, so extreme inputs (occupancy far
//! past capacity, storm plus zero visibility) can never push the final score
//! out of range.

use serde::{Deserialize, Serialize};

use crate::models::{RiskLevel, Zone, ZoneType};

const WEIGHT_ALERT_FREQUENCY: f64 = 0.30;
const WEIGHT_OCCUPANCY: f64 = 0.25;
const WEIGHT_INCIDENT_HISTORY: f64 = 0.20;
const WEIGHT_ENVIRONMENT: f64 = 0.15;
const WEIGHT_ACCESS_COMPLEXITY: f64 = 0.10;

/// A recomputed score must move more than this before the stored risk level
/// changes, to avoid oscillation around a threshold.
pub const RISK_HYSTERESIS: f64 = 10.0;

/// Default capacity assumed when a zone has no occupancy limit.
const DEFAULT_CAPACITY: u32 = 100;

/// Weather snapshot from the external environmental provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub is_storm: bool,
    /// Visibility in meters.
    pub visibility_m: f64,
    pub temperature_c: f64,
}

/// Terrain complexity tier from the external classification provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainComplexity {
    #[default]
    Low,
    Moderate,
    High,
    Extreme,
}

/// Input signals for one risk evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskSignals {
    pub alerts_today: u32,
    pub alerts_this_week: u32,
    pub historical_incidents: u32,
    pub weather: WeatherConditions,
    pub terrain: TerrainComplexity,
}

/// Compute the weighted risk score for a zone. Always in [0, 100].
pub fn calculate_risk(zone: &Zone, signals: &RiskSignals) -> f64 {
    let score = WEIGHT_ALERT_FREQUENCY * alert_frequency_score(zone, signals)
        + WEIGHT_OCCUPANCY * occupancy_score(zone)
        + WEIGHT_INCIDENT_HISTORY * incident_history_score(zone, signals)
        + WEIGHT_ENVIRONMENT * environment_score(signals)
        + WEIGHT_ACCESS_COMPLEXITY * access_complexity_score(zone);

    score.clamp(0.0, 100.0)
}

/// Map a numeric score onto the discrete risk level via fixed thresholds.
pub fn risk_level_from_score(score: f64) -> RiskLevel {
    if score >= 90.0 {
        RiskLevel::Critical
    } else if score >= 75.0 {
        RiskLevel::VeryHigh
    } else if score >= 60.0 {
        RiskLevel::High
    } else if score >= 40.0 {
        RiskLevel::Moderate
    } else if score >= 20.0 {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    }
}

/// Hysteresis gate: only a score change larger than the band qualifies for
/// a stored risk-level update.
pub fn qualifies_for_level_update(previous_score: f64, new_score: f64) -> bool {
    (new_score - previous_score).abs() > RISK_HYSTERESIS
}

/// Alert counts normalized by the zone's capacity.
fn alert_frequency_score(zone: &Zone, signals: &RiskSignals) -> f64 {
    let capacity = zone
        .access_restrictions
        .max_occupancy
        .unwrap_or(DEFAULT_CAPACITY)
        .max(1) as f64;

    let daily_rate = signals.alerts_today as f64 / capacity;
    let weekly_rate = signals.alerts_this_week as f64 / (capacity * 7.0);

    (daily_rate * 400.0 + weekly_rate * 700.0).clamp(0.0, 100.0)
}

/// Occupancy pressure. Linear to 50 points at 80% utilization, then a steeper
/// convex ramp toward 100 as the zone approaches capacity.
fn occupancy_score(zone: &Zone) -> f64 {
    let capacity = zone
        .access_restrictions
        .max_occupancy
        .unwrap_or(DEFAULT_CAPACITY)
        .max(1) as f64;
    let utilization = zone.statistics.current_occupancy as f64 / capacity;

    let score = if utilization <= 0.8 {
        utilization / 0.8 * 50.0
    } else {
        40.0 + (utilization - 0.8) / 0.2 * 60.0
    };

    score.clamp(0.0, 100.0)
}

/// Historical incident count against a per-zone-type baseline.
fn incident_history_score(zone: &Zone, signals: &RiskSignals) -> f64 {
    let baseline = incident_baseline(zone.zone_type);
    (signals.historical_incidents as f64 / baseline * 50.0).clamp(0.0, 100.0)
}

/// Expected incident volume per zone type. Riskier categories tolerate more
/// incidents before the sub-score saturates.
fn incident_baseline(zone_type: ZoneType) -> f64 {
    match zone_type {
        ZoneType::Safe | ZoneType::Accommodation => 5.0,
        ZoneType::TouristAttraction | ZoneType::TransportHub => 15.0,
        ZoneType::Medical | ZoneType::Police => 10.0,
        ZoneType::Risk | ZoneType::Restricted | ZoneType::Emergency
        | ZoneType::BorderCheckpoint => 25.0,
    }
}

/// Weather severity plus terrain complexity.
fn environment_score(signals: &RiskSignals) -> f64 {
    let mut score = 0.0;

    if signals.weather.is_storm {
        score += 40.0;
    }
    if signals.weather.visibility_m < 1_000.0 {
        let deficit = (1_000.0 - signals.weather.visibility_m.max(0.0)) / 1_000.0;
        score += deficit * 30.0;
    }
    if signals.weather.temperature_c < -10.0 || signals.weather.temperature_c > 40.0 {
        score += 15.0;
    }

    score += match signals.terrain {
        TerrainComplexity::Low => 0.0,
        TerrainComplexity::Moderate => 10.0,
        TerrainComplexity::High => 25.0,
        TerrainComplexity::Extreme => 40.0,
    };

    score.clamp(0.0, 100.0)
}

/// Permission/guide flags and inherently restricted zone categories.
fn access_complexity_score(zone: &Zone) -> f64 {
    let mut score: f64 = 0.0;

    if zone.access_restrictions.requires_permission {
        score += 35.0;
    }
    if zone.access_restrictions.requires_guide {
        score += 25.0;
    }
    if matches!(
        zone.zone_type,
        ZoneType::Risk | ZoneType::Restricted | ZoneType::BorderCheckpoint
    ) {
        score += 40.0;
    }

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccessRestrictions, Coordinates, CreateZoneRequest, ZoneGeometry, ZoneStatistics,
    };

    fn test_zone(zone_type: ZoneType) -> Zone {
        Zone::from_request(CreateZoneRequest {
            name: "test".to_string(),
            zone_type,
            geometry: ZoneGeometry::Circle {
                center: Coordinates::new(28.6, 77.2),
                radius_m: 500.0,
            },
            access_restrictions: None,
            alert_settings: None,
        })
    }

    #[test]
    fn score_is_bounded_for_extreme_inputs() {
        let mut zone = test_zone(ZoneType::Restricted);
        zone.access_restrictions = AccessRestrictions {
            max_occupancy: Some(10),
            requires_permission: true,
            requires_guide: true,
        };
        zone.statistics = ZoneStatistics {
            current_occupancy: 10_000,
            alerts_triggered_today: 9_999,
        };

        let signals = RiskSignals {
            alerts_today: 100_000,
            alerts_this_week: 1_000_000,
            historical_incidents: u32::MAX,
            weather: WeatherConditions {
                is_storm: true,
                visibility_m: 0.0,
                temperature_c: 55.0,
            },
            terrain: TerrainComplexity::Extreme,
        };

        let score = calculate_risk(&zone, &signals);
        assert!((0.0..=100.0).contains(&score));
        assert!(score > 80.0, "extreme signals should score high: {score}");
    }

    #[test]
    fn quiet_safe_zone_scores_near_zero() {
        let zone = test_zone(ZoneType::Safe);
        let score = calculate_risk(&zone, &RiskSignals::default());
        assert!(score < 10.0, "quiet zone scored {score}");
    }

    #[test]
    fn occupancy_ramp_steepens_past_80_percent() {
        let mut zone = test_zone(ZoneType::TouristAttraction);
        zone.access_restrictions.max_occupancy = Some(100);

        zone.statistics.current_occupancy = 40;
        let below = occupancy_score(&zone);
        assert!((below - 25.0).abs() < 1e-9);

        zone.statistics.current_occupancy = 90;
        let above = occupancy_score(&zone);
        assert!((above - 70.0).abs() < 1e-9);

        zone.statistics.current_occupancy = 100;
        assert!((occupancy_score(&zone) - 100.0).abs() < 1e-9);

        zone.statistics.current_occupancy = 250;
        assert!((occupancy_score(&zone) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(risk_level_from_score(0.0), RiskLevel::VeryLow);
        assert_eq!(risk_level_from_score(19.9), RiskLevel::VeryLow);
        assert_eq!(risk_level_from_score(20.0), RiskLevel::Low);
        assert_eq!(risk_level_from_score(40.0), RiskLevel::Moderate);
        assert_eq!(risk_level_from_score(60.0), RiskLevel::High);
        assert_eq!(risk_level_from_score(75.0), RiskLevel::VeryHigh);
        assert_eq!(risk_level_from_score(90.0), RiskLevel::Critical);
        assert_eq!(risk_level_from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn hysteresis_band_suppresses_small_moves() {
        assert!(!qualifies_for_level_update(50.0, 55.0));
        assert!(!qualifies_for_level_update(50.0, 60.0));
        assert!(qualifies_for_level_update(50.0, 60.1));
        assert!(qualifies_for_level_update(50.0, 35.0));
    }

    #[test]
    fn restricted_types_score_access_complexity() {
        let restricted = test_zone(ZoneType::Restricted);
        let safe = test_zone(ZoneType::Safe);
        assert!(access_complexity_score(&restricted) > access_complexity_score(&safe));
    }
}
