//! Spatial candidate filter.
//!
//! First narrowing stage, in two steps: a coarse store query over the
//! buffer-expanded bounding box of the route, then an app-level haversine
//! pass against the full (unsampled) polyline. Testing every stored place
//! against every polyline vertex would not scale, so only bbox survivors pay
//! for the fine pass.

use shared::{Place, Route};

use crate::geo::{min_distance_to_path, BoundingBox};
use crate::store::{PlaceStore, StoreError};

/// Hard cap on candidates handed to the scoring stages.
pub const MAX_SPATIAL_CANDIDATES: usize = 100;

pub const DEFAULT_BUFFER_DISTANCE_M: f64 = 1_000.0;

/// All places of `category` within `buffer_m` meters of the route polyline,
/// capped at [`MAX_SPATIAL_CANDIDATES`].
pub async fn filter_places_by_route(
    store: &PlaceStore,
    route: &Route,
    category: &str,
    buffer_m: f64,
) -> Result<Vec<Place>, StoreError> {
    let Some(bbox) = BoundingBox::of_path(&route.path) else {
        return Ok(Vec::new());
    };
    let bbox = bbox.expanded_by(buffer_m);

    let coarse = store.query_by_category_and_region(category, &bbox).await?;
    tracing::debug!(
        "spatial filter: {} bbox candidates for category {category}",
        coarse.len()
    );

    let mut kept = Vec::new();
    for place in coarse {
        if min_distance_to_path(place.coordinates, &route.path) <= buffer_m {
            kept.push(place);
            if kept.len() >= MAX_SPATIAL_CANDIDATES {
                break;
            }
        }
    }

    tracing::debug!("spatial filter: {} within {buffer_m}m of the route", kept.len());
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPlaceStore;
    use shared::{Coordinate, RoutePoint};

    fn route() -> Route {
        // Straight ~5.5 km route north along lng 127.0
        let path: Vec<RoutePoint> = (0..=50)
            .map(|i| RoutePoint::new(37.50 + i as f64 * 0.001, 127.0))
            .collect();
        Route {
            start: path[0].coordinate(),
            end: path.last().unwrap().coordinate(),
            distance: 5_500.0,
            duration: 480.0,
            path,
        }
    }

    fn place(id: &str, lat: f64, lng: f64) -> Place {
        Place {
            id: id.to_string(),
            name: id.to_string(),
            category: "cafe".to_string(),
            address: format!("{id} address"),
            road_address: None,
            phone: None,
            coordinates: Coordinate { lat, lng },
        }
    }

    #[tokio::test]
    async fn test_keeps_places_within_buffer() {
        let store = PlaceStore::Memory(MemoryPlaceStore::from_iter([
            place("on_route", 37.52, 127.0),
            // ~880 m east, inside the 1 km buffer
            place("near", 37.52, 127.01),
            // ~2.6 km east, inside the expanded bbox but past the buffer
            place("far", 37.52, 127.03),
        ]));

        let found = filter_places_by_route(&store, &route(), "cafe", 1_000.0)
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["on_route", "near"]);
    }

    #[tokio::test]
    async fn test_other_categories_ignored() {
        let mut off_category = place("other", 37.52, 127.0);
        off_category.category = "pharmacy".to_string();
        let store = PlaceStore::Memory(MemoryPlaceStore::from_iter([off_category]));

        let found = filter_places_by_route(&store, &route(), "cafe", 1_000.0)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_empty_route_yields_no_candidates() {
        let store = PlaceStore::Memory(MemoryPlaceStore::from_iter([place(
            "anywhere", 37.52, 127.0,
        )]));
        let mut r = route();
        r.path.clear();

        let found = filter_places_by_route(&store, &r, "cafe", 1_000.0)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_caps_at_max_candidates() {
        let store = PlaceStore::Memory(MemoryPlaceStore::from_iter(
            (0..150).map(|i| place(&format!("p{i}"), 37.52, 127.0 + i as f64 * 1e-6)),
        ));

        let found = filter_places_by_route(&store, &route(), "cafe", 1_000.0)
            .await
            .unwrap();
        assert_eq!(found.len(), MAX_SPATIAL_CANDIDATES);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = PlaceStore::Memory(MemoryPlaceStore::unavailable());
        let result = filter_places_by_route(&store, &route(), "cafe", 1_000.0).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
