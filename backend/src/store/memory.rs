use std::collections::HashSet;

use shared::Place;

use crate::geo::BoundingBox;

use super::StoreError;

/// In-memory place store for tests and offline runs. De-duplicates on
/// (name, category, address), the same uniqueness rule the Postgres schema
/// enforces.
#[derive(Default)]
pub struct MemoryPlaceStore {
    places: Vec<Place>,
    seen: HashSet<(String, String, String)>,
    unavailable: bool,
}

impl MemoryPlaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every query, for exercising the storage-unavailable
    /// path.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Insert a place, ignoring duplicates. Returns whether it was kept.
    pub fn insert(&mut self, place: Place) -> bool {
        let key = (
            place.name.clone(),
            place.category.clone(),
            place.address.clone(),
        );
        if !self.seen.insert(key) {
            return false;
        }
        self.places.push(place);
        true
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn query_by_category_and_region(
        &self,
        category: &str,
        bbox: &BoundingBox,
    ) -> Result<Vec<Place>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(self
            .places
            .iter()
            .filter(|p| p.category == category && bbox.contains(p.coordinates))
            .cloned()
            .collect())
    }
}

impl FromIterator<Place> for MemoryPlaceStore {
    fn from_iter<I: IntoIterator<Item = Place>>(iter: I) -> Self {
        let mut store = Self::new();
        for place in iter {
            store.insert(place);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Coordinate;

    fn place(id: &str, name: &str, lat: f64, lng: f64) -> Place {
        Place {
            id: id.to_string(),
            name: name.to_string(),
            category: "cafe".to_string(),
            address: format!("{name} street 1"),
            road_address: None,
            phone: None,
            coordinates: Coordinate { lat, lng },
        }
    }

    #[test]
    fn test_deduplicates_on_name_category_address() {
        let mut store = MemoryPlaceStore::new();
        assert!(store.insert(place("a", "Same", 37.5, 127.0)));
        assert!(!store.insert(place("b", "Same", 37.6, 127.1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_query_filters_category_and_region() {
        let mut store = MemoryPlaceStore::new();
        store.insert(place("in", "In", 37.5, 127.0));
        store.insert(place("out", "Out", 38.5, 127.0));
        let mut other = place("other", "Other", 37.5, 127.0);
        other.category = "pharmacy".to_string();
        store.insert(other);

        let bbox = BoundingBox {
            min_lat: 37.4,
            max_lat: 37.6,
            min_lng: 126.9,
            max_lng: 127.1,
        };
        let found = store.query_by_category_and_region("cafe", &bbox).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "in");
    }

    #[test]
    fn test_unavailable_store_errors() {
        let store = MemoryPlaceStore::unavailable();
        let bbox = BoundingBox {
            min_lat: 0.0,
            max_lat: 1.0,
            min_lng: 0.0,
            max_lng: 1.0,
        };
        let err = store.query_by_category_and_region("cafe", &bbox);
        assert!(matches!(err, Err(StoreError::Unavailable(_))));
    }
}
