//! Pairwise zone overlap detection.
//!
//! Overlap area uses the closed-form lens formula for circle/circle pairs and
//! documented vertex-fraction approximations for anything involving a polygon.

use serde::{Deserialize, Serialize};

use crate::geo;
use crate::models::{Zone, ZoneGeometry};

/// Minimum overlap percentage (relative to the smaller zone) that gets reported.
pub const REPORT_THRESHOLD_PCT: f64 = 10.0;

/// How one zone's area relates to another's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapType {
    /// The smaller zone is essentially inside the larger one (>90%).
    Contained,
    /// Meaningful shared area (5-90%).
    Partial,
    /// Boundary contact only.
    Adjacent,
}

/// Severity of a zone overlap conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    None,
    Low,
    Medium,
    High,
}

/// Detected overlap between two zones. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneOverlap {
    pub zone1_id: String,
    pub zone2_id: String,
    pub overlap_type: OverlapType,
    pub overlap_area_m2: f64,
    /// Percentage of the smaller zone's area that is shared.
    pub overlap_pct: f64,
    pub conflict_severity: ConflictSeverity,
}

/// Compute the overlap between two zones, if it clears the report threshold.
///
/// Bounding boxes gate the expensive intersection math. The percentage
/// denominator is always the smaller zone's area, so a tiny zone swallowed by
/// a large one reports as contained.
pub fn compute_overlap(zone1: &Zone, zone2: &Zone) -> Option<ZoneOverlap> {
    if !geo::bounding_boxes_intersect(&zone1.bounding_box, &zone2.bounding_box) {
        return None;
    }

    let area = intersection_area_m2(&zone1.geometry, &zone2.geometry);
    if area <= 0.0 {
        return None;
    }

    let smaller = zone1.geometry.area_m2().min(zone2.geometry.area_m2());
    if smaller <= 0.0 {
        return None;
    }

    let pct = (area / smaller * 100.0).min(100.0);
    if pct <= REPORT_THRESHOLD_PCT {
        return None;
    }

    Some(ZoneOverlap {
        zone1_id: zone1.id.clone(),
        zone2_id: zone2.id.clone(),
        overlap_type: classify_overlap(pct),
        overlap_area_m2: area,
        overlap_pct: pct,
        conflict_severity: classify_severity(pct),
    })
}

/// Intersection area between two geometries in square meters.
pub fn intersection_area_m2(g1: &ZoneGeometry, g2: &ZoneGeometry) -> f64 {
    match (g1, g2) {
        (
            ZoneGeometry::Circle {
                center: c1,
                radius_m: r1,
            },
            ZoneGeometry::Circle {
                center: c2,
                radius_m: r2,
            },
        ) => geo::circle_circle_intersection_area(*c1, *r1, *c2, *r2),
        (
            ZoneGeometry::Circle { center, radius_m },
            ZoneGeometry::Polygon { points },
        )
        | (
            ZoneGeometry::Polygon { points },
            ZoneGeometry::Circle { center, radius_m },
        ) => geo::circle_polygon_intersection_area(*center, *radius_m, points),
        (ZoneGeometry::Polygon { points: p1 }, ZoneGeometry::Polygon { points: p2 }) => {
            geo::polygon_polygon_intersection_area(p1, p2)
        }
    }
}

fn classify_overlap(pct: f64) -> OverlapType {
    if pct > 90.0 {
        OverlapType::Contained
    } else if pct > 5.0 {
        OverlapType::Partial
    } else {
        OverlapType::Adjacent
    }
}

fn classify_severity(pct: f64) -> ConflictSeverity {
    if pct >= 75.0 {
        ConflictSeverity::High
    } else if pct >= 50.0 {
        ConflictSeverity::Medium
    } else if pct >= 25.0 {
        ConflictSeverity::Low
    } else {
        ConflictSeverity::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::meters_to_lat;
    use crate::models::{Coordinates, CreateZoneRequest, ZoneType};

    fn circle_zone(lat: f64, lon: f64, radius_m: f64) -> Zone {
        Zone::from_request(CreateZoneRequest {
            name: "test".to_string(),
            zone_type: ZoneType::TouristAttraction,
            geometry: ZoneGeometry::Circle {
                center: Coordinates::new(lat, lon),
                radius_m,
            },
            access_restrictions: None,
            alert_settings: None,
        })
    }

    #[test]
    fn circles_100m_apart_overlap_at_least_partial() {
        let lat = 28.6;
        let zone1 = circle_zone(lat, 77.2, 80.0);
        let zone2 = circle_zone(lat + meters_to_lat(100.0, lat), 77.2, 60.0);

        let overlap = compute_overlap(&zone1, &zone2).expect("circles overlap");
        assert!(overlap.overlap_area_m2 > 0.0);
        assert!(matches!(
            overlap.overlap_type,
            OverlapType::Partial | OverlapType::Contained
        ));
    }

    #[test]
    fn overlap_is_symmetric_in_reporting() {
        let lat = 28.6;
        let zone1 = circle_zone(lat, 77.2, 80.0);
        let zone2 = circle_zone(lat + meters_to_lat(100.0, lat), 77.2, 60.0);

        let forward = compute_overlap(&zone1, &zone2).expect("overlap");
        let reverse = compute_overlap(&zone2, &zone1).expect("overlap");
        assert!(forward.overlap_area_m2 > 0.0 && reverse.overlap_area_m2 > 0.0);
        assert!((forward.overlap_pct - reverse.overlap_pct).abs() < 1e-6);
    }

    #[test]
    fn contained_circle_classified_contained() {
        let zone1 = circle_zone(28.6, 77.2, 5_000.0);
        let zone2 = circle_zone(28.6, 77.2, 200.0);

        let overlap = compute_overlap(&zone1, &zone2).expect("contained overlap");
        assert_eq!(overlap.overlap_type, OverlapType::Contained);
        assert_eq!(overlap.conflict_severity, ConflictSeverity::High);
    }

    #[test]
    fn distant_zones_report_nothing() {
        let zone1 = circle_zone(28.6, 77.2, 100.0);
        let zone2 = circle_zone(30.0, 78.0, 100.0);
        assert!(compute_overlap(&zone1, &zone2).is_none());
    }

    #[test]
    fn severity_buckets() {
        assert_eq!(classify_severity(10.0), ConflictSeverity::None);
        assert_eq!(classify_severity(30.0), ConflictSeverity::Low);
        assert_eq!(classify_severity(60.0), ConflictSeverity::Medium);
        assert_eq!(classify_severity(80.0), ConflictSeverity::High);
    }
}
