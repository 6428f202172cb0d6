//! Place store seam.
//!
//! The pipeline only needs one read operation: all places of a category
//! inside a bounding box. The production backend is PostgreSQL with a plain
//! (category, lat, lng) index; a geospatially-indexed store answering a true
//! line-buffer containment query (e.g. PostGIS ST_DWithin against the route
//! LineString) satisfies the same contract more efficiently and is the
//! preferred setup when available. The in-memory store backs tests and
//! offline mode.

mod memory;
mod postgres;

pub use memory::MemoryPlaceStore;
pub use postgres::PgPlaceStore;

use shared::Place;

use crate::geo::BoundingBox;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("place store unavailable: {0}")]
    Unavailable(String),

    #[error("store configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Store backend, fixed at startup. Variant dispatch keeps the selection
/// compile-time checked instead of re-resolving a backend per call.
pub enum PlaceStore {
    Postgres(PgPlaceStore),
    Memory(MemoryPlaceStore),
}

impl PlaceStore {
    pub async fn query_by_category_and_region(
        &self,
        category: &str,
        bbox: &BoundingBox,
    ) -> Result<Vec<Place>, StoreError> {
        match self {
            PlaceStore::Postgres(pg) => pg.query_by_category_and_region(category, bbox).await,
            PlaceStore::Memory(mem) => mem.query_by_category_and_region(category, bbox),
        }
    }
}
