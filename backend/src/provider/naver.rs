use std::collections::HashMap;

use serde::Deserialize;
use shared::{Coordinate, Route, RoutePoint, RouteProfile};

use super::{validate_endpoint, ProviderError, RetryingClient};

const BASE_URL: &str = "https://naveropenapi.apigw.ntruss.com";

/// Naver Cloud Platform maps backend (Directions 5 + Geocoding).
#[derive(Clone)]
pub struct NaverProvider {
    http: RetryingClient,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    code: i64,
    message: Option<String>,
    #[serde(default)]
    route: Option<HashMap<String, Vec<RouteData>>>,
}

#[derive(Debug, Deserialize)]
struct RouteData {
    summary: RouteSummary,
    path: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    distance: f64,
    /// Milliseconds.
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    addresses: Vec<GeocodeAddress>,
}

#[derive(Debug, Deserialize)]
struct GeocodeAddress {
    /// Longitude, as a decimal string.
    x: String,
    /// Latitude, as a decimal string.
    y: String,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    results: Vec<ReverseGeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResult {
    region: Region,
}

#[derive(Debug, Deserialize)]
struct Region {
    area1: Area,
    area2: Area,
    area3: Area,
    area4: Area,
}

#[derive(Debug, Deserialize)]
struct Area {
    name: String,
}

impl NaverProvider {
    pub fn new(http: RetryingClient, client_id: String, client_secret: String) -> Self {
        Self {
            http,
            client_id,
            client_secret,
        }
    }

    fn auth_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("X-NCP-APIGW-API-KEY-ID", self.client_id.clone()),
            ("X-NCP-APIGW-API-KEY", self.client_secret.clone()),
        ]
    }

    pub async fn get_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: RouteProfile,
    ) -> Result<Route, ProviderError> {
        validate_endpoint(start, "start")?;
        validate_endpoint(end, "end")?;

        let option = match profile {
            RouteProfile::Optimal => "traoptimal",
            RouteProfile::Fast => "trafast",
            RouteProfile::Comfort => "tracomfort",
        };

        // Naver expects lng,lat order.
        let response: DirectionsResponse = self
            .http
            .get_json(
                &format!("{BASE_URL}/map-direction/v1/driving"),
                &[
                    ("start", format!("{},{}", start.lng, start.lat)),
                    ("goal", format!("{},{}", end.lng, end.lat)),
                    ("option", option.to_string()),
                ],
                &self.auth_headers(),
            )
            .await?;

        if response.code != 0 {
            return Err(ProviderError::Api(format!(
                "directions call failed with code {}: {}",
                response.code,
                response.message.unwrap_or_default()
            )));
        }

        let data = response
            .route
            .and_then(|mut routes| routes.remove(option))
            .and_then(|mut list| (!list.is_empty()).then(|| list.remove(0)))
            .ok_or(ProviderError::NoRouteFound)?;

        Ok(convert_route(data, start, end))
    }

    pub async fn geocode_address(&self, address: &str) -> Result<Coordinate, ProviderError> {
        let response: GeocodeResponse = self
            .http
            .get_json(
                &format!("{BASE_URL}/map-geocode/v2/geocode"),
                &[("query", address.to_string())],
                &self.auth_headers(),
            )
            .await?;

        let first = response
            .addresses
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

        let response: ReverseGeocodeResponse = self
            .http
            .get_json(
                &format!("{BASE_URL}/map-reversegeocode/v2/gc"),
                &[
                    ("coords", format!("{},{}", coord.lng, coord.lat)),
                    ("orders", "roadaddr,addr".to_string()),
                    ("output", "json".to_string()),
                ],
                &self.auth_headers(),
            )
            .await?;

        let region = response
            .results
            .into_iter()
            .next()
            .map(|r| r.region)
            .ok_or_else(|| {
                ProviderError::NoAddressFound(format!("{},{}", coord.lat, coord.lng))
            })?;

        let parts: Vec<&str> = [
            region.area1.name.as_str(),
            region.area2.name.as_str(),
            region.area3.name.as_str(),
            region.area4.name.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

        Ok(parts.join(" "))
    }
}

/// Convert a Naver route payload to the internal shape. The first path point
/// is the route origin and gets cumulative distance/duration zero; interior
/// points carry geometry only.
fn convert_route(data: RouteData, start: Coordinate, end: Coordinate) -> Route {
    let mut path: Vec<RoutePoint> = data
        .path
        .into_iter()
        .map(|[lng, lat]| RoutePoint::new(lat, lng))
        .collect();
    if let Some(first) = path.first_mut() {
        first.distance = Some(0.0);
        first.duration = Some(0.0);
    }

    Route {
        start,
        end,
        distance: data.summary.distance,
        duration: (data.summary.duration / 1000.0).round(),
        path,
    }
}
