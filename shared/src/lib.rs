use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A point along a route polyline. `distance` and `duration` are cumulative
/// from the route start when the provider (or the sampler) supplies them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl RoutePoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            distance: None,
            duration: None,
        }
    }

    pub fn coordinate(self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

impl From<Coordinate> for RoutePoint {
    fn from(c: Coordinate) -> Self {
        Self::new(c.lat, c.lng)
    }
}

/// A provider-reported route. `distance` (meters) and `duration` (seconds)
/// are the provider's totals; they are not the sum of haversine segment
/// lengths, since roads curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub start: Coordinate,
    pub end: Coordinate,
    pub distance: f64,
    pub duration: f64,
    pub path: Vec<RoutePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteProfile {
    #[default]
    Optimal,
    Fast,
    Comfort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub coordinates: Coordinate,
}

/// Increase over the direct route. Deltas can be slightly negative when the
/// routing engine is nondeterministic between calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetourCost {
    pub distance: f64,
    pub duration: f64,
    pub cost_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetourRoutes {
    pub original: Route,
    pub to_waypoint: Route,
    pub from_waypoint: Route,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetourResult {
    pub place: Place,
    pub detour_cost: DetourCost,
    pub routes: DetourRoutes,
    pub proximity_score: f64,
    pub final_score: f64,
}

/// Either a free-form address (geocoded server-side) or exact coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
}

impl LocationInput {
    pub fn coordinates(c: Coordinate) -> Self {
        Self {
            address: None,
            coordinates: Some(c),
        }
    }

    pub fn address(a: impl Into<String>) -> Self {
        Self {
            address: Some(a.into()),
            coordinates: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_detour_distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub start: LocationInput,
    pub end: LocationInput,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SearchOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub original_route: Route,
    pub results: Vec<DetourResult>,
    pub total_candidates: usize,
    pub api_calls_used: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub profile: RouteProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
