pub mod config;
pub mod detour;
pub mod error;
pub mod format;
pub mod geo;
pub mod provider;
pub mod proximity;
pub mod sampler;
pub mod spatial;
pub mod store;

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, routing::post, Json, Router};
use tower_http::cors::CorsLayer;

use shared::{
    Coordinate, DirectionsRequest, LocationInput, Route, RouteProfile, SearchRequest,
    SearchResponse,
};

use crate::detour::{calculate_detour_costs, DetourOptions};
use crate::error::SearchError;
use crate::provider::{DirectionsClient, GeocodingClient};
use crate::store::PlaceStore;

const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub directions: Arc<DirectionsClient>,
    pub geocoding: Arc<GeocodingClient>,
    pub places: Arc<PlaceStore>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search_handler))
        .route("/api/directions", post(directions_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Recommend waypoints of a category along the start->end route.
async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, SearchError> {
    let started = Instant::now();

    // Everything checkable locally is checked before the first outbound call.
    validate_search_request(&req)?;

    let start = resolve_location(&state.geocoding, &req.start, "start").await?;
    let end = resolve_location(&state.geocoding, &req.end, "end").await?;

    let original = state
        .directions
        .get_route(start, end, RouteProfile::Optimal)
        .await?;

    let options = req.options.unwrap_or_default();
    let detour_options = DetourOptions {
        buffer_distance: options
            .buffer_distance
            .unwrap_or(DetourOptions::default().buffer_distance),
        max_detour_distance: options
            .max_detour_distance
            .unwrap_or(DetourOptions::default().max_detour_distance),
        sample_interval: None,
    };

    let outcome = calculate_detour_costs(
        &state.directions,
        &state.places,
        &original,
        &req.category,
        &detour_options,
    )
    .await?;

    let mut results = outcome.results;
    results.truncate(options.max_results.unwrap_or(DEFAULT_MAX_RESULTS));

    Ok(Json(SearchResponse {
        original_route: original,
        results,
        total_candidates: outcome.total_candidates,
        api_calls_used: outcome.api_calls_used,
        duration_ms: started.elapsed().as_millis() as u64,
    }))
}

/// Validated passthrough to the directions provider.
async fn directions_handler(
    State(state): State<AppState>,
    Json(req): Json<DirectionsRequest>,
) -> Result<Json<Route>, SearchError> {
    validate_coordinate(req.start, "start")?;
    validate_coordinate(req.end, "end")?;

    let route = state
        .directions
        .get_route(req.start, req.end, req.profile)
        .await?;
    Ok(Json(route))
}

fn validate_search_request(req: &SearchRequest) -> Result<(), SearchError> {
    if req.category.trim().is_empty() {
        return Err(SearchError::Validation("category must not be empty".into()));
    }
    validate_location_input(&req.start, "start")?;
    validate_location_input(&req.end, "end")?;

    if let Some(options) = &req.options {
        if let Some(n) = options.max_results {
            if !(1..=50).contains(&n) {
                return Err(SearchError::Validation(format!(
                    "max_results must be in 1..=50, got {n}"
                )));
            }
        }
        if let Some(d) = options.buffer_distance {
            if !(100.0..=10_000.0).contains(&d) {
                return Err(SearchError::Validation(format!(
                    "buffer_distance must be in 100..=10000 meters, got {d}"
                )));
            }
        }
        if let Some(d) = options.max_detour_distance {
            if !(500.0..=50_000.0).contains(&d) {
                return Err(SearchError::Validation(format!(
                    "max_detour_distance must be in 500..=50000 meters, got {d}"
                )));
            }
        }
    }
    Ok(())
}

fn validate_location_input(location: &LocationInput, name: &str) -> Result<(), SearchError> {
    match (&location.address, location.coordinates) {
        (None, None) => Err(SearchError::Validation(format!(
            "{name} needs either an address or coordinates"
        ))),
        (Some(addr), _) if addr.trim().is_empty() && location.coordinates.is_none() => Err(
            SearchError::Validation(format!("{name} address must not be empty")),
        ),
        (_, Some(c)) => validate_coordinate(c, name),
        _ => Ok(()),
    }
}

fn validate_coordinate(c: Coordinate, name: &str) -> Result<(), SearchError> {
    if !c.is_valid() {
        return Err(SearchError::InvalidCoordinates(format!(
            "{name} must have lat in [-90, 90] and lng in [-180, 180], got ({}, {})",
            c.lat, c.lng
        )));
    }
    Ok(())
}

/// Coordinates pass through; addresses are geocoded. A geocoded result that
/// is somehow out of range is still rejected.
async fn resolve_location(
    geocoding: &GeocodingClient,
    location: &LocationInput,
    name: &str,
) -> Result<Coordinate, SearchError> {
    if let Some(c) = location.coordinates {
        return Ok(c);
    }
    // validate_location_input guarantees an address is present here.
    let address = location.address.as_deref().unwrap_or_default();
    let coord = geocoding.geocode_address(address).await?;
    validate_coordinate(coord, name)?;
    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SearchOptions;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    fn valid_request() -> SearchRequest {
        SearchRequest {
            start: LocationInput::coordinates(coord(37.5663, 126.9779)),
            end: LocationInput::coordinates(coord(37.4979, 127.0276)),
            category: "cafe".to_string(),
            options: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_search_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_empty_category_rejected() {
        let mut req = valid_request();
        req.category = "  ".to_string();
        assert!(matches!(
            validate_search_request(&req),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn test_location_without_address_or_coordinates_rejected() {
        let mut req = valid_request();
        req.start = LocationInput::default();
        assert!(matches!(
            validate_search_request(&req),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut req = valid_request();
        req.end = LocationInput::coordinates(coord(91.0, 0.0));
        assert!(matches!(
            validate_search_request(&req),
            Err(SearchError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_option_bounds_enforced() {
        for options in [
            SearchOptions {
                max_results: Some(0),
                ..Default::default()
            },
            SearchOptions {
                max_results: Some(51),
                ..Default::default()
            },
            SearchOptions {
                buffer_distance: Some(50.0),
                ..Default::default()
            },
            SearchOptions {
                buffer_distance: Some(20_000.0),
                ..Default::default()
            },
            SearchOptions {
                max_detour_distance: Some(100.0),
                ..Default::default()
            },
            SearchOptions {
                max_detour_distance: Some(100_000.0),
                ..Default::default()
            },
        ] {
            let mut req = valid_request();
            req.options = Some(options);
            assert!(
                matches!(
                    validate_search_request(&req),
                    Err(SearchError::Validation(_))
                ),
                "expected rejection for {options:?}"
            );
        }
    }

    #[test]
    fn test_boundary_option_values_accepted() {
        let mut req = valid_request();
        req.options = Some(SearchOptions {
            max_results: Some(50),
            buffer_distance: Some(100.0),
            max_detour_distance: Some(50_000.0),
        });
        assert!(validate_search_request(&req).is_ok());
    }
}
