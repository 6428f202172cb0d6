//! Polyline sampling.
//!
//! Routing providers return dense polylines (often thousands of vertices).
//! Scoring every candidate against every vertex is wasteful, so the pipeline
//! works on a sparse resample at a distance-dependent interval, which keeps
//! the point count around 20-50 regardless of route length.

use shared::RoutePoint;

use crate::geo::haversine_m;

/// Resample `path` at `interval_m` meters.
///
/// The first and last original points are always kept, so route endpoints
/// never drop out of proximity analysis. Emitted intermediate points are
/// linearly interpolated between the two bracketing vertices and carry the
/// target cumulative `distance`; `duration` is left unset because time does
/// not interpolate linearly along geometry.
pub fn sample_polyline(path: &[RoutePoint], interval_m: f64) -> Vec<RoutePoint> {
    if path.is_empty() {
        return Vec::new();
    }
    if path.len() == 1 {
        return path.to_vec();
    }

    let mut sampled = vec![path[0]];
    let mut accumulated = 0.0;
    let mut next_sample = interval_m;

    for window in path.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        let segment = haversine_m(prev.coordinate(), curr.coordinate());
        accumulated += segment;

        // A long segment can cross several interval boundaries.
        while accumulated >= next_sample && segment > 0.0 {
            let ratio = (next_sample - (accumulated - segment)) / segment;
            let c = prev.coordinate().interpolate(curr.coordinate(), ratio);
            sampled.push(RoutePoint {
                lat: c.lat,
                lng: c.lng,
                distance: Some(next_sample),
                duration: None,
            });
            next_sample += interval_m;
        }
    }

    let last = path[path.len() - 1];
    if sampled.last() != Some(&last) {
        sampled.push(last);
    }

    sampled
}

/// Sampling interval for a given total route distance:
/// up to 10 km at 500 m, up to 50 km at 1 km, beyond that 2 km.
pub fn optimal_sample_interval(total_distance_m: f64) -> f64 {
    if total_distance_m <= 10_000.0 {
        500.0
    } else if total_distance_m <= 50_000.0 {
        1_000.0
    } else {
        2_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path() {
        assert!(sample_polyline(&[], 500.0).is_empty());
    }

    #[test]
    fn test_single_point_returned_unchanged() {
        let p = RoutePoint::new(37.5, 127.0);
        assert_eq!(sample_polyline(&[p], 500.0), vec![p]);
    }

    #[test]
    fn test_short_path_keeps_both_endpoints() {
        // ~100 m apart, well under the 500 m interval
        let path = vec![RoutePoint::new(37.5000, 127.0), RoutePoint::new(37.5009, 127.0)];
        let sampled = sample_polyline(&path, 500.0);
        assert_eq!(sampled.len(), 2);
        assert_eq!(sampled[0], path[0]);
        assert_eq!(sampled[1], path[1]);
    }

    #[test]
    fn test_1km_path_at_200m_interval() {
        // 100 dense vertices along ~1 km of latitude
        let path: Vec<RoutePoint> = (0..=100)
            .map(|i| RoutePoint::new(37.5 + (i as f64 * 0.009) / 100.0, 127.0))
            .collect();
        let sampled = sample_polyline(&path, 200.0);
        assert!((5..=8).contains(&sampled.len()), "got {}", sampled.len());
    }

    #[test]
    fn test_endpoints_always_present() {
        let path = vec![
            RoutePoint::new(37.5, 127.0),
            RoutePoint::new(37.505, 127.0),
            RoutePoint::new(37.51, 127.0),
        ];
        let sampled = sample_polyline(&path, 200.0);
        assert_eq!(sampled[0], path[0]);
        assert_eq!(*sampled.last().unwrap(), *path.last().unwrap());
    }

    #[test]
    fn test_long_segment_produces_multiple_samples() {
        // Two vertices ~2.2 km apart sampled at 500 m must yield interior
        // points for each crossed boundary, not just one.
        let path = vec![RoutePoint::new(37.5, 127.0), RoutePoint::new(37.52, 127.0)];
        let sampled = sample_polyline(&path, 500.0);
        assert!(sampled.len() >= 5, "got {}", sampled.len());
        // Interior samples carry the target cumulative distance.
        assert_eq!(sampled[1].distance, Some(500.0));
        assert_eq!(sampled[2].distance, Some(1000.0));
        assert!(sampled[1].duration.is_none());
    }

    #[test]
    fn test_optimal_interval_policy() {
        assert_eq!(optimal_sample_interval(5_000.0), 500.0);
        assert_eq!(optimal_sample_interval(10_000.0), 500.0);
        assert_eq!(optimal_sample_interval(30_000.0), 1_000.0);
        assert_eq!(optimal_sample_interval(80_000.0), 2_000.0);
    }
}
