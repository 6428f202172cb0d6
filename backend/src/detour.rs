//! Detour cost calculation, the pipeline orchestrator.
//!
//! sample -> spatial filter -> proximity filter -> per-candidate routing ->
//! rank. Each surviving candidate costs two directions calls (A->C, C->B),
//! which is why two narrowing stages run first.

use futures::stream::{self, StreamExt};
use shared::{Coordinate, DetourCost, DetourResult, DetourRoutes, Route, RouteProfile};

use crate::error::SearchError;
use crate::format::format_detour;
use crate::provider::DirectionsClient;
use crate::proximity::{filter_by_proximity, ScoredPlace};
use crate::sampler::{optimal_sample_interval, sample_polyline};
use crate::spatial::{filter_places_by_route, DEFAULT_BUFFER_DISTANCE_M};
use crate::store::PlaceStore;

pub const DEFAULT_MAX_DETOUR_DISTANCE_M: f64 = 5_000.0;

/// Candidates kept after proximity filtering, i.e. routed.
const TOP_PROXIMITY_CANDIDATES: usize = 20;

/// Final ranked results returned by the pipeline.
const TOP_RESULTS: usize = 10;

/// Cap on concurrent outbound directions requests; vendors rate-limit well
/// below anything higher.
const MAX_CONCURRENT_ROUTE_REQUESTS: usize = 8;

/// Duration term of the cost score is normalized against a fixed 10 minute
/// reference, independent of the distance cap.
const DURATION_REFERENCE_S: f64 = 600.0;

const DISTANCE_WEIGHT: f64 = 60.0;
const DURATION_WEIGHT: f64 = 40.0;

/// Final ranking blends inverted cost (70%) with proximity (30%).
const COST_BLEND: f64 = 0.7;
const PROXIMITY_BLEND: f64 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct DetourOptions {
    pub buffer_distance: f64,
    pub max_detour_distance: f64,
    /// Defaults to [`optimal_sample_interval`] of the route distance.
    pub sample_interval: Option<f64>,
}

impl Default for DetourOptions {
    fn default() -> Self {
        Self {
            buffer_distance: DEFAULT_BUFFER_DISTANCE_M,
            max_detour_distance: DEFAULT_MAX_DETOUR_DISTANCE_M,
            sample_interval: None,
        }
    }
}

#[derive(Debug)]
pub struct DetourOutcome {
    pub results: Vec<DetourResult>,
    pub total_candidates: usize,
    /// Directions calls attributable to the whole search: one for the
    /// original route (made by the caller) plus two per routed candidate,
    /// counted even when the candidate is dropped afterwards.
    pub api_calls_used: usize,
}

/// Rank waypoint candidates of `category` along `original`.
///
/// Storage failures and nothing else are fatal here; a candidate whose
/// sub-routes fail is dropped and the rest proceed.
pub async fn calculate_detour_costs(
    directions: &DirectionsClient,
    store: &PlaceStore,
    original: &Route,
    category: &str,
    options: &DetourOptions,
) -> Result<DetourOutcome, SearchError> {
    let interval = options
        .sample_interval
        .unwrap_or_else(|| optimal_sample_interval(original.distance));

    tracing::debug!(
        "detour search: route {}m/{}s, category {category}",
        original.distance,
        original.duration
    );

    let sampled = sample_polyline(&original.path, interval);
    tracing::debug!("sampled {} points at {interval}m", sampled.len());

    let spatial_candidates =
        filter_places_by_route(store, original, category, options.buffer_distance).await?;
    if spatial_candidates.is_empty() {
        tracing::debug!("no candidates within {}m of the route", options.buffer_distance);
        return Ok(DetourOutcome {
            results: Vec::new(),
            total_candidates: 0,
            api_calls_used: 1,
        });
    }
    let total_candidates = spatial_candidates.len();

    let shortlisted =
        filter_by_proximity(spatial_candidates, &sampled, original, TOP_PROXIMITY_CANDIDATES);
    if shortlisted.is_empty() {
        tracing::debug!("no candidates passed proximity filtering");
        return Ok(DetourOutcome {
            results: Vec::new(),
            total_candidates,
            api_calls_used: 1,
        });
    }

    let api_calls_used = 1 + shortlisted.len() * 2;

    let routed: Vec<Option<DetourResult>> = stream::iter(
        shortlisted
            .into_iter()
            .map(|candidate| route_candidate(directions, original, candidate, options)),
    )
    .buffered(MAX_CONCURRENT_ROUTE_REQUESTS)
    .collect()
    .await;

    let mut results: Vec<DetourResult> = routed.into_iter().flatten().collect();
    results.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    results.truncate(TOP_RESULTS);

    for (i, r) in results.iter().take(3).enumerate() {
        tracing::info!(
            "{}. {} - detour {}, score {:.1}",
            i + 1,
            r.place.name,
            format_detour(r.detour_cost.distance, r.detour_cost.duration),
            r.final_score
        );
    }
    tracing::debug!(
        "detour search done: {} results, {api_calls_used} api calls",
        results.len()
    );

    Ok(DetourOutcome {
        results,
        total_candidates,
        api_calls_used,
    })
}

/// Detour cost of routing through a single ad-hoc waypoint, outside the
/// ranked pipeline. Provider failures propagate.
pub async fn single_detour_cost(
    directions: &DirectionsClient,
    original: &Route,
    waypoint: Coordinate,
) -> Result<DetourCost, SearchError> {
    let (to, from) = tokio::join!(
        directions.get_route(original.start, waypoint, RouteProfile::Optimal),
        directions.get_route(waypoint, original.end, RouteProfile::Optimal),
    );
    let (to, from) = (to?, from?);
    Ok(detour_cost(original, &to, &from, DEFAULT_MAX_DETOUR_DISTANCE_M))
}

async fn route_candidate(
    directions: &DirectionsClient,
    original: &Route,
    candidate: ScoredPlace,
    options: &DetourOptions,
) -> Option<DetourResult> {
    let waypoint = candidate.place.coordinates;
    let (to, from) = tokio::join!(
        directions.get_route(original.start, waypoint, RouteProfile::Optimal),
        directions.get_route(waypoint, original.end, RouteProfile::Optimal),
    );

    let (to, from) = match (to, from) {
        (Ok(to), Ok(from)) => (to, from),
        (Err(err), _) | (_, Err(err)) => {
            tracing::warn!(
                "sub-route failed for {}, dropping candidate: {err}",
                candidate.place.name
            );
            return None;
        }
    };

    build_result(original, candidate, to, from, options.max_detour_distance)
}

/// Increase over the direct route, with the bounded 0-100 cost score.
fn detour_cost(original: &Route, to: &Route, from: &Route, max_detour: f64) -> DetourCost {
    let distance = to.distance + from.distance - original.distance;
    let duration = to.duration + from.duration - original.duration;
    let cost_score = ((distance / max_detour) * DISTANCE_WEIGHT
        + (duration / DURATION_REFERENCE_S) * DURATION_WEIGHT)
        .min(100.0);
    DetourCost {
        distance,
        duration,
        cost_score,
    }
}

fn final_score(cost_score: f64, proximity_score: f64) -> f64 {
    (100.0 - cost_score) * COST_BLEND + proximity_score * PROXIMITY_BLEND
}

/// None when the detour exceeds the cap; the boundary itself is retained.
fn build_result(
    original: &Route,
    candidate: ScoredPlace,
    to: Route,
    from: Route,
    max_detour: f64,
) -> Option<DetourResult> {
    let cost = detour_cost(original, &to, &from, max_detour);
    if cost.distance > max_detour {
        tracing::debug!(
            "{} exceeds max detour distance: {}",
            candidate.place.name,
            format_detour(cost.distance, cost.duration)
        );
        return None;
    }

    Some(DetourResult {
        final_score: final_score(cost.cost_score, candidate.proximity_score),
        place: candidate.place,
        detour_cost: cost,
        routes: DetourRoutes {
            original: original.clone(),
            to_waypoint: to,
            from_waypoint: from,
        },
        proximity_score: candidate.proximity_score,
    })
}
