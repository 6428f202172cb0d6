use shared::{Coordinate, Route, RoutePoint, RouteProfile};

use crate::geo::haversine_m;

use super::{validate_endpoint, ProviderError};

const STEPS: usize = 32;

/// Straight-line road distance is optimistic; scale it up to approximate
/// real road geometry.
const ROAD_FACTOR: f64 = 1.25;

/// Average driving speed in m/s (36 km/h).
const SPEED_MPS: f64 = 10.0;

/// Offline directions and geocoding backend.
///
/// Synthesizes a straight-line route with a fixed road factor and speed, so
/// identical inputs always produce identical routes. Used when no vendor
/// credentials are configured and throughout the test suite. Zones marked
/// unreachable make any route touching them fail with `NoRouteFound`, which
/// lets tests exercise per-candidate failure handling.
#[derive(Clone, Default)]
pub struct SyntheticProvider {
    unreachable: Vec<(Coordinate, f64)>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a circular zone as unroutable.
    pub fn with_unreachable(mut self, center: Coordinate, radius_m: f64) -> Self {
        self.unreachable.push((center, radius_m));
        self
    }

    fn blocked(&self, c: Coordinate) -> bool {
        self.unreachable
            .iter()
            .any(|&(center, radius)| haversine_m(c, center) <= radius)
    }

    pub fn get_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        _profile: RouteProfile,
    ) -> Result<Route, ProviderError> {
        validate_endpoint(start, "start")?;
        validate_endpoint(end, "end")?;

        if self.blocked(start) || self.blocked(end) {
            return Err(ProviderError::NoRouteFound);
        }

        let mut path = Vec::with_capacity(STEPS + 1);
        for i in 0..=STEPS {
            let t = i as f64 / STEPS as f64;
            let c = start.interpolate(end, t);
            path.push(RoutePoint::new(c.lat, c.lng));
        }
        path[0].distance = Some(0.0);
        path[0].duration = Some(0.0);

        let distance = haversine_m(start, end) * ROAD_FACTOR;
        let duration = distance / SPEED_MPS;

        Ok(Route {
            start,
            end,
            distance,
            duration,
            path,
        })
    }

    /// Accepts "lat,lng" strings only; anything else is not found.
    pub fn geocode_address(&self, address: &str) -> Result<Coordinate, ProviderError> {
        let mut parts = address.split(',');
        let coord = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => {
                match (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
                    (Ok(lat), Ok(lng)) => Some(Coordinate { lat, lng }),
                    _ => None,
                }
            }
            _ => None,
        };

        let coord = coord.ok_or_else(|| ProviderError::NoAddressFound(address.to_string()))?;
        if !coord.is_valid() {
            return Err(ProviderError::InvalidCoordinates(format!(
                "geocoded ({}, {}) is out of range",
                coord.lat, coord.lng
            )));
        }
        Ok(coord)
    }

    pub fn reverse_geocode(&self, coord: Coordinate) -> Result<String, ProviderError> {
        validate_endpoint(coord, "coordinate")?;
        Ok(format!("{:.4},{:.4}", coord.lat, coord.lng))
    }
}
