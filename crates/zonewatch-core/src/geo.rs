//! Spatial math for zone containment, overlap, and distance calculations.

use crate::models::{BoundingBox, Coordinates};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using the Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Returns
/// Distance in meters. Symmetric in its arguments.
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Forward azimuth from `a` to `b` in degrees, normalized to [0, 360).
pub fn bearing_deg(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Check whether a point lies within `radius_m` meters of `center`.
pub fn point_in_circle(point: Coordinates, center: Coordinates, radius_m: f64) -> bool {
    haversine_distance(point, center) <= radius_m
}

/// Ray-casting parity test over an implicitly closed vertex sequence.
///
/// Points exactly on an edge may be classified either way; callers must not
/// rely on boundary behavior.
pub fn point_in_polygon(point: Coordinates, vertices: &[Coordinates]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let yi = vertices[i].latitude;
        let xi = vertices[i].longitude;
        let yj = vertices[j].latitude;
        let xj = vertices[j].longitude;

        if ((yi > point.latitude) != (yj > point.latitude))
            && (point.longitude < (xj - xi) * (point.latitude - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Approximate ground area of a polygon in square meters.
///
/// Spherical shoelace over the implicitly closed ring, scaled by the Earth
/// radius squared. Adequate for zone-sized regions; not survey-grade.
pub fn polygon_area_m2(vertices: &[Coordinates]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    let n = vertices.len();
    for i in 0..n {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % n];
        let lambda1 = p1.longitude.to_radians();
        let lambda2 = p2.longitude.to_radians();
        let phi1 = p1.latitude.to_radians();
        let phi2 = p2.latitude.to_radians();
        total += (lambda2 - lambda1) * (2.0 + phi1.sin() + phi2.sin());
    }

    (total * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Perimeter of a polygon in meters, including the implicit closing edge.
pub fn polygon_perimeter_m(vertices: &[Coordinates]) -> f64 {
    let n = vertices.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        total += haversine_distance(vertices[i], vertices[(i + 1) % n]);
    }
    total
}

/// Centroid of a polygon using the standard planar centroid formula.
///
/// Returns `None` for degenerate (zero-area) polygons, where the formula's
/// denominator vanishes.
pub fn polygon_centroid(vertices: &[Coordinates]) -> Option<Coordinates> {
    let n = vertices.len();
    if n < 3 {
        return None;
    }

    let mut signed_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % n];
        let cross = p1.longitude * p2.latitude - p2.longitude * p1.latitude;
        signed_area += cross;
        cx += (p1.longitude + p2.longitude) * cross;
        cy += (p1.latitude + p2.latitude) * cross;
    }
    signed_area /= 2.0;

    if signed_area.abs() < 1e-12 {
        return None;
    }

    Some(Coordinates {
        latitude: cy / (6.0 * signed_area),
        longitude: cx / (6.0 * signed_area),
    })
}

/// Axis-aligned bounding box of a vertex set (min/max per axis).
pub fn bounding_box(vertices: &[Coordinates]) -> BoundingBox {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;

    for v in vertices {
        min_lat = min_lat.min(v.latitude);
        max_lat = max_lat.max(v.latitude);
        min_lon = min_lon.min(v.longitude);
        max_lon = max_lon.max(v.longitude);
    }

    BoundingBox {
        northeast: Coordinates {
            latitude: max_lat,
            longitude: max_lon,
        },
        southwest: Coordinates {
            latitude: min_lat,
            longitude: min_lon,
        },
    }
}

/// Bounding box of a circle, extending the center by the radius on each axis.
pub fn circle_bounding_box(center: Coordinates, radius_m: f64) -> BoundingBox {
    let dlat = meters_to_lat(radius_m, center.latitude);
    let dlon = meters_to_lon(radius_m, center.latitude);

    BoundingBox {
        northeast: Coordinates {
            latitude: center.latitude + dlat,
            longitude: center.longitude + dlon,
        },
        southwest: Coordinates {
            latitude: center.latitude - dlat,
            longitude: center.longitude - dlon,
        },
    }
}

/// Axis-aligned overlap test, used as an O(1) pre-filter before intersection math.
pub fn bounding_boxes_intersect(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.southwest.latitude <= b.northeast.latitude
        && b.southwest.latitude <= a.northeast.latitude
        && a.southwest.longitude <= b.northeast.longitude
        && b.southwest.longitude <= a.northeast.longitude
}

/// Intersection area of two circles in square meters (closed-form lens area).
///
/// Returns 0 when the circles don't touch, and the full smaller-circle area
/// when one circle contains the other.
pub fn circle_circle_intersection_area(
    c1: Coordinates,
    r1: f64,
    c2: Coordinates,
    r2: f64,
) -> f64 {
    let d = haversine_distance(c1, c2);

    if d >= r1 + r2 {
        return 0.0;
    }

    let r_min = r1.min(r2);
    if d <= (r1 - r2).abs() {
        return std::f64::consts::PI * r_min * r_min;
    }

    // Lens area from the two circular segments.
    let a1 = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0);
    let a2 = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0);
    let part1 = r1 * r1 * a1.acos();
    let part2 = r2 * r2 * a2.acos();
    let part3 = 0.5
        * ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2))
            .max(0.0)
            .sqrt();

    part1 + part2 - part3
}

/// Approximate intersection area between a circle and a polygon.
///
/// Uses the fraction of polygon vertices inside the circle, scaled by the
/// smaller of the two areas. An approximation, not exact clipping.
pub fn circle_polygon_intersection_area(
    center: Coordinates,
    radius_m: f64,
    vertices: &[Coordinates],
) -> f64 {
    if vertices.is_empty() {
        return 0.0;
    }

    let inside = vertices
        .iter()
        .filter(|v| point_in_circle(**v, center, radius_m))
        .count();
    if inside == 0 {
        // The circle center may still sit inside the polygon.
        if point_in_polygon(center, vertices) {
            let circle_area = std::f64::consts::PI * radius_m * radius_m;
            return circle_area.min(polygon_area_m2(vertices));
        }
        return 0.0;
    }

    let fraction = inside as f64 / vertices.len() as f64;
    let circle_area = std::f64::consts::PI * radius_m * radius_m;
    fraction * polygon_area_m2(vertices).min(circle_area)
}

/// Approximate intersection area between two polygons.
///
/// Gated by a bounding-box pre-check, then estimated from the fraction of
/// each polygon's vertices contained in the other, scaled by the smaller
/// area. An approximation, not exact clipping.
pub fn polygon_polygon_intersection_area(poly1: &[Coordinates], poly2: &[Coordinates]) -> f64 {
    if poly1.len() < 3 || poly2.len() < 3 {
        return 0.0;
    }

    let bbox1 = bounding_box(poly1);
    let bbox2 = bounding_box(poly2);
    if !bounding_boxes_intersect(&bbox1, &bbox2) {
        return 0.0;
    }

    let in2 = poly1.iter().filter(|v| point_in_polygon(**v, poly2)).count();
    let in1 = poly2.iter().filter(|v| point_in_polygon(**v, poly1)).count();

    let frac1 = in2 as f64 / poly1.len() as f64;
    let frac2 = in1 as f64 / poly2.len() as f64;
    let fraction = frac1.max(frac2);
    if fraction <= 0.0 {
        return 0.0;
    }

    fraction * polygon_area_m2(poly1).min(polygon_area_m2(poly2))
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lat(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert an east/west offset in meters to degrees longitude.
/// Requires the reference latitude for proper scaling.
pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lon(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}
