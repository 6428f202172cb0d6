use serde::Deserialize;
use shared::{Coordinate, Route, RoutePoint, RouteProfile};

use super::{validate_endpoint, ProviderError, RetryingClient};

const NAVI_BASE_URL: &str = "https://apis-navi.kakaomobility.com";
const LOCAL_BASE_URL: &str = "https://dapi.kakao.com";

/// Kakao backend (Mobility directions + Local geocoding).
#[derive(Clone)]
pub struct KakaoProvider {
    http: RetryingClient,
    rest_api_key: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RouteData>,
}

#[derive(Debug, Deserialize)]
struct RouteData {
    result_code: i64,
    #[serde(default)]
    result_msg: String,
    summary: Option<RouteSummary>,
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    distance: f64,
    /// Seconds.
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(default)]
    roads: Vec<Road>,
}

#[derive(Debug, Deserialize)]
struct Road {
    /// Flat x1,y1,x2,y2,... vertex list (x is longitude).
    #[serde(default)]
    vertexes: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    #[serde(default)]
    documents: Vec<AddressDocument>,
}

#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: String,
    y: String,
}

#[derive(Debug, Deserialize)]
struct Coord2AddressResponse {
    #[serde(default)]
    documents: Vec<Coord2AddressDocument>,
}

#[derive(Debug, Deserialize)]
struct Coord2AddressDocument {
    address: Option<AddressName>,
    road_address: Option<AddressName>,
}

#[derive(Debug, Deserialize)]
struct AddressName {
    address_name: String,
}

impl KakaoProvider {
    pub fn new(http: RetryingClient, rest_api_key: String) -> Self {
        Self { http, rest_api_key }
    }

    fn auth_headers(&self) -> Vec<(&'static str, String)> {
        vec![("Authorization", format!("KakaoAK {}", self.rest_api_key))]
    }

    pub async fn get_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: RouteProfile,
    ) -> Result<Route, ProviderError> {
        validate_endpoint(start, "start")?;
        validate_endpoint(end, "end")?;

        let priority = match profile {
            RouteProfile::Optimal => "RECOMMEND",
            RouteProfile::Fast => "FAST",
            RouteProfile::Comfort => "COMFORT",
        };

        let response: DirectionsResponse = self
            .http
            .get_json(
                &format!("{NAVI_BASE_URL}/v1/directions"),
                &[
                    ("origin", format!("{},{}", start.lng, start.lat)),
                    ("destination", format!("{},{}", end.lng, end.lat)),
                    ("priority", priority.to_string()),
                ],
                &self.auth_headers(),
            )
            .await?;

        let data = response
            .routes
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRouteFound)?;
        if data.result_code != 0 {
            tracing::debug!(
                "kakao directions result_code {}: {}",
                data.result_code,
                data.result_msg
            );
            return Err(ProviderError::NoRouteFound);
        }
        let summary = data.summary.ok_or(ProviderError::NoRouteFound)?;

        Ok(convert_route(summary, data.sections, start, end))
    }

    pub async fn geocode_address(&self, address: &str) -> Result<Coordinate, ProviderError> {
        let response: AddressSearchResponse = self
            .http
            .get_json(
                &format!("{LOCAL_BASE_URL}/v2/local/search/address.json"),
                &[("query", address.to_string())],
                &self.auth_headers(),
            )
            .await?;

        let first = response
            .documents
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoAddressFound(address.to_string()))?;

        let lng: f64 = first
            .x
            .parse()
            .map_err(|_| ProviderError::Api(format!("unparsable longitude {:?}", first.x)))?;
        let lat: f64 = first
            .y
            .parse()
            .map_err(|_| ProviderError::Api(format!("unparsable latitude {:?}", first.y)))?;

        Ok(Coordinate { lat, lng })
    }

    pub async fn reverse_geocode(&self, coord: Coordinate) -> Result<String, ProviderError> {
        validate_endpoint(coord, "coordinate")?;

        let response: Coord2AddressResponse = self
            .http
            .get_json(
                &format!("{LOCAL_BASE_URL}/v2/local/geo/coord2address.json"),
                &[
                    ("x", coord.lng.to_string()),
                    ("y", coord.lat.to_string()),
                ],
                &self.auth_headers(),
            )
            .await?;

        response
            .documents
            .into_iter()
            .next()
            .and_then(|doc| doc.road_address.or(doc.address))
            .map(|a| a.address_name)
            .ok_or_else(|| ProviderError::NoAddressFound(format!("{},{}", coord.lat, coord.lng)))
    }
}

fn convert_route(
    summary: RouteSummary,
    sections: Vec<Section>,
    start: Coordinate,
    end: Coordinate,
) -> Route {
    let mut path = Vec::new();
    for section in sections {
        for road in section.roads {
            for pair in road.vertexes.chunks_exact(2) {
                path.push(RoutePoint::new(pair[1], pair[0]));
            }
        }
    }
    if let Some(first) = path.first_mut() {
        first.distance = Some(0.0);
        first.duration = Some(0.0);
    }

    Route {
        start,
        end,
        distance: summary.distance,
        duration: summary.duration,
        path,
    }
}
