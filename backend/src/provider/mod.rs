//! Directions and geocoding providers.
//!
//! The vendor backend is chosen once at startup from configuration and fixed
//! for the life of the process; dispatch is a plain enum so a misconfigured
//! variant is a compile error, not a runtime module lookup. All vendor HTTP
//! goes through [`client::RetryingClient`], which owns timeout and bounded
//! retry, keeping that concern out of the pipeline.

mod client;
mod kakao;
mod naver;
mod synthetic;

pub use client::RetryingClient;
pub use kakao::KakaoProvider;
pub use naver::NaverProvider;
pub use synthetic::SyntheticProvider;

use shared::{Coordinate, Route, RouteProfile};

use crate::config::{AppConfig, ProviderKind};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no route found between the given coordinates")]
    NoRouteFound,

    #[error("no address found for \"{0}\"")]
    NoAddressFound(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("rate limited by the provider")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected provider response: {0}")]
    Api(String),
}

pub(crate) fn validate_endpoint(c: Coordinate, name: &str) -> Result<(), ProviderError> {
    if !c.is_valid() {
        return Err(ProviderError::InvalidCoordinates(format!(
            "{name} must have lat in [-90, 90] and lng in [-180, 180], got ({}, {})",
            c.lat, c.lng
        )));
    }
    Ok(())
}

/// Directions backend, fixed at construction.
#[derive(Clone)]
pub enum DirectionsClient {
    Naver(NaverProvider),
    Kakao(KakaoProvider),
    Synthetic(SyntheticProvider),
}

impl DirectionsClient {
    pub async fn get_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: RouteProfile,
    ) -> Result<Route, ProviderError> {
        match self {
            DirectionsClient::Naver(p) => p.get_route(start, end, profile).await,
            DirectionsClient::Kakao(p) => p.get_route(start, end, profile).await,
            DirectionsClient::Synthetic(p) => p.get_route(start, end, profile),
        }
    }
}

/// Geocoding backend, fixed at construction.
#[derive(Clone)]
pub enum GeocodingClient {
    Naver(NaverProvider),
    Kakao(KakaoProvider),
    Synthetic(SyntheticProvider),
}

impl GeocodingClient {
    pub async fn geocode_address(&self, address: &str) -> Result<Coordinate, ProviderError> {
        match self {
            GeocodingClient::Naver(p) => p.geocode_address(address).await,
            GeocodingClient::Kakao(p) => p.geocode_address(address).await,
            GeocodingClient::Synthetic(p) => p.geocode_address(address),
        }
    }

    pub async fn reverse_geocode(&self, coord: Coordinate) -> Result<String, ProviderError> {
        match self {
            GeocodingClient::Naver(p) => p.reverse_geocode(coord).await,
            GeocodingClient::Kakao(p) => p.reverse_geocode(coord).await,
            GeocodingClient::Synthetic(p) => p.reverse_geocode(coord),
        }
    }
}

/// Build the configured provider pair. Missing vendor credentials fall back
/// to the synthetic backend so the service still starts for local work.
pub fn build(config: &AppConfig) -> Result<(DirectionsClient, GeocodingClient), ProviderError> {
    match config.provider {
        ProviderKind::Naver => {
            match (&config.naver_client_id, &config.naver_client_secret) {
                (Some(id), Some(secret)) => {
                    let provider =
                        NaverProvider::new(RetryingClient::new()?, id.clone(), secret.clone());
                    Ok((
                        DirectionsClient::Naver(provider.clone()),
                        GeocodingClient::Naver(provider),
                    ))
                }
                _ => {
                    tracing::warn!(
                        "MAP_PROVIDER=naver but credentials are missing, using synthetic routing"
                    );
                    Ok(synthetic_pair())
                }
            }
        }
        ProviderKind::Kakao => match &config.kakao_rest_api_key {
            Some(key) => {
                let provider = KakaoProvider::new(RetryingClient::new()?, key.clone());
                Ok((
                    DirectionsClient::Kakao(provider.clone()),
                    GeocodingClient::Kakao(provider),
                ))
            }
            None => {
                tracing::warn!(
                    "MAP_PROVIDER=kakao but KAKAO_REST_API_KEY is missing, using synthetic routing"
                );
                Ok(synthetic_pair())
            }
        },
        ProviderKind::Synthetic => Ok(synthetic_pair()),
    }
}

fn synthetic_pair() -> (DirectionsClient, GeocodingClient) {
    let provider = SyntheticProvider::new();
    (
        DirectionsClient::Synthetic(provider.clone()),
        GeocodingClient::Synthetic(provider),
    )
}
