//! Proximity scoring.
//!
//! Second narrowing stage: scores each spatially-filtered candidate by how
//! close it sits to the sampled route geometry, throws out anything near the
//! destination, and keeps the top N for the expensive routing stage.

use shared::{Place, Route, RoutePoint};

use crate::geo::haversine_m;

/// Distance at which the linear falloff reaches zero.
const MAX_SCORING_DISTANCE_M: f64 = 1_000.0;

/// Candidates whose nearest sample point lies past this share of the route
/// are excluded; a place next to the destination is not a useful stop.
const LATE_ROUTE_CUTOFF: f64 = 0.8;

/// Mild preference for places around the middle of the route.
const MIDPOINT_BONUS: f64 = 1.1;
const MIDPOINT_RANGE: std::ops::RangeInclusive<f64> = 0.4..=0.6;

#[derive(Debug, Clone)]
pub struct ScoredPlace {
    pub place: Place,
    pub proximity_score: f64,
}

/// Score a place against the sampled route geometry, 0-100.
///
/// 100 at 0 m from the route, falling linearly to 0 at 1 km; hard zero for
/// anything whose nearest sample point is past 80% of route progress.
/// `_route` is unused for now and kept for future weighting by true route
/// distance.
pub fn proximity_score(place: &Place, sampled: &[RoutePoint], _route: &Route) -> f64 {
    let mut min_distance = f64::INFINITY;
    let mut closest_index = 0usize;

    for (i, point) in sampled.iter().enumerate() {
        let d = haversine_m(place.coordinates, point.coordinate());
        if d < min_distance {
            min_distance = d;
            closest_index = i;
        }
    }

    let progress = if sampled.len() > 1 {
        closest_index as f64 / (sampled.len() - 1) as f64
    } else {
        0.0
    };

    if progress > LATE_ROUTE_CUTOFF {
        return 0.0;
    }

    let distance_score = (100.0 - (min_distance / MAX_SCORING_DISTANCE_M) * 100.0).max(0.0);
    let position_weight = if MIDPOINT_RANGE.contains(&progress) {
        MIDPOINT_BONUS
    } else {
        1.0
    };

    (distance_score * position_weight).min(100.0)
}

/// Score every place, drop zero scores, and return the best `top_n` in
/// descending score order. The sort is stable so identical inputs always
/// produce identical orderings.
pub fn filter_by_proximity(
    places: Vec<Place>,
    sampled: &[RoutePoint],
    route: &Route,
    top_n: usize,
) -> Vec<ScoredPlace> {
    let mut scored: Vec<ScoredPlace> = places
        .into_iter()
        .map(|place| {
            let proximity_score = proximity_score(&place, sampled, route);
            ScoredPlace {
                place,
                proximity_score,
            }
        })
        .filter(|s| s.proximity_score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.proximity_score.total_cmp(&a.proximity_score));
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Coordinate;

    // Straight ~10 km route from 37.50 to 37.59 along lng 127.0.
    fn sample_points() -> Vec<RoutePoint> {
        (0..10)
            .map(|i| RoutePoint::new(37.50 + i as f64 * 0.01, 127.0))
            .collect()
    }

    fn route(points: &[RoutePoint]) -> Route {
        Route {
            start: points[0].coordinate(),
            end: points[points.len() - 1].coordinate(),
            distance: 10_000.0,
            duration: 600.0,
            path: points.to_vec(),
        }
    }

    fn place(id: &str, lat: f64, lng: f64) -> Place {
        Place {
            id: id.to_string(),
            name: "Test".to_string(),
            category: "test".to_string(),
            address: "test".to_string(),
            road_address: None,
            phone: None,
            coordinates: Coordinate { lat, lng },
        }
    }

    #[test]
    fn test_on_route_place_scores_high() {
        let points = sample_points();
        let r = route(&points);
        let score = proximity_score(&place("p", 37.53, 127.0), &points, &r);
        assert!(score > 90.0, "got {score}");
    }

    #[test]
    fn test_450m_off_route_scores_mid() {
        // lng offset of 0.005 is ~440 m at this latitude
        let points = sample_points();
        let r = route(&points);
        let score = proximity_score(&place("p", 37.53, 127.005), &points, &r);
        assert!(score > 40.0 && score < 70.0, "got {score}");
    }

    #[test]
    fn test_far_place_scores_zero() {
        // ~1.8 km off route, past the 1 km falloff
        let points = sample_points();
        let r = route(&points);
        let score = proximity_score(&place("p", 37.53, 127.02), &points, &r);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_place_near_destination_scores_zero() {
        // Sits exactly on the final sample point: progress 1.0 > 0.8
        let points = sample_points();
        let r = route(&points);
        let score = proximity_score(&place("p", 37.59, 127.0), &points, &r);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_midpoint_bonus_applies() {
        let points = sample_points();
        let r = route(&points);
        // Same offset distance, one near the midpoint, one near the start.
        let mid = proximity_score(&place("m", 37.55, 127.003), &points, &r);
        let early = proximity_score(&place("e", 37.51, 127.003), &points, &r);
        assert!(mid > early, "mid {mid} <= early {early}");
    }

    #[test]
    fn test_filter_sorts_descending_and_drops_zeroes() {
        let points = sample_points();
        let r = route(&points);
        let places = vec![
            place("near", 37.53, 127.0),
            place("mid", 37.53, 127.005),
            place("far", 37.53, 127.02),
        ];
        let result = filter_by_proximity(places, &points, &r, 20);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].place.id, "near");
        assert!(result[0].proximity_score > result[1].proximity_score);
    }

    #[test]
    fn test_filter_respects_top_n() {
        let points = sample_points();
        let r = route(&points);
        let places = vec![
            place("a", 37.53, 127.0),
            place("b", 37.53, 127.002),
            place("c", 37.53, 127.004),
        ];
        let result = filter_by_proximity(places, &points, &r, 2);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].place.id, "a");
    }

    #[test]
    fn test_all_zero_scores_yield_empty() {
        let points = sample_points();
        let r = route(&points);
        let result = filter_by_proximity(vec![place("far", 37.53, 127.02)], &points, &r, 20);
        assert!(result.is_empty());
    }
}
