use shared::{Coordinate, RoutePoint};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude, used when converting a buffer distance to
/// a bounding-box expansion.
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Once a place is this close to the polyline it cannot be filtered out, so
/// the per-point scan stops early.
const CLOSE_ENOUGH_M: f64 = 10.0;

/// Great-circle distance in meters between two coordinates.
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Minimum haversine distance from `point` to any vertex of `path`.
/// Returns infinity for an empty path.
pub fn min_distance_to_path(point: Coordinate, path: &[RoutePoint]) -> f64 {
    let mut min = f64::INFINITY;
    for p in path {
        let d = haversine_m(point, p.coordinate());
        if d < min {
            min = d;
            if min < CLOSE_ENOUGH_M {
                break;
            }
        }
    }
    min
}

/// Axis-aligned bounding box over route geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn of_path(path: &[RoutePoint]) -> Option<Self> {
        let first = path.first()?;
        let mut bbox = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for p in &path[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.min_lng = bbox.min_lng.min(p.lng);
            bbox.max_lng = bbox.max_lng.max(p.lng);
        }
        Some(bbox)
    }

    /// Expand every side by `meters`, converted to degrees with a 20% margin
    /// to absorb longitude compression away from the equator.
    pub fn expanded_by(self, meters: f64) -> Self {
        let degrees = meters / METERS_PER_DEGREE * 1.2;
        Self {
            min_lat: self.min_lat - degrees,
            max_lat: self.max_lat + degrees,
            min_lng: self.min_lng - degrees,
            max_lng: self.max_lng + degrees,
        }
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.lat >= self.min_lat
            && c.lat <= self.max_lat
            && c.lng >= self.min_lng
            && c.lng <= self.max_lng
    }
}
