use shared::{Coordinate, Place};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::geo::BoundingBox;

use super::StoreError;

/// PostgreSQL place store. Coarse-stage queries run as plain lat/lng range
/// scans over the (category, lat, lng) index; the fine polyline-distance
/// narrowing happens in the application. With PostGIS installed the same
/// contract could be served by a single ST_DWithin query against the route
/// geometry instead.
pub struct PgPlaceStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct PlaceRow {
    id: String,
    name: String,
    category: String,
    address: String,
    road_address: Option<String>,
    phone: Option<String>,
    lat: f64,
    lng: f64,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            id: row.id,
            name: row.name,
            category: row.category,
            address: row.address,
            road_address: row.road_address,
            phone: row.phone,
            coordinates: Coordinate {
                lat: row.lat,
                lng: row.lng,
            },
        }
    }
}

impl PgPlaceStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool created");
        Ok(Self { pool })
    }

    /// Run schema migration. SQLx query() cannot handle multiple statements,
    /// so the migration file is executed over a raw connection.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        let migration_sql = include_str!("../../migrations/20250601_create_places.sql");
        sqlx::raw_sql(migration_sql).execute(&mut *conn).await?;

        tracing::info!("Place store migrations completed");
        Ok(())
    }

    pub async fn query_by_category_and_region(
        &self,
        category: &str,
        bbox: &BoundingBox,
    ) -> Result<Vec<Place>, StoreError> {
        let rows = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT id, name, category, address, road_address, phone, lat, lng
            FROM places
            WHERE category = $1
              AND lat BETWEEN $2 AND $3
              AND lng BETWEEN $4 AND $5
            "#,
        )
        .bind(category)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lng)
        .bind(bbox.max_lng)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            "Coarse store query returned {} places for category {category}",
            rows.len()
        );
        Ok(rows.into_iter().map(Place::from).collect())
    }

    /// Insert places from an ingestion run. Duplicates on
    /// (name, category, address) are skipped by the unique index.
    pub async fn insert_places(&self, places: &[Place]) -> Result<u64, StoreError> {
        let mut inserted = 0;
        for place in places {
            let result = sqlx::query(
                r#"
                INSERT INTO places (id, name, category, address, road_address, phone, lat, lng)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (name, category, address) DO NOTHING
                "#,
            )
            .bind(&place.id)
            .bind(&place.name)
            .bind(&place.category)
            .bind(&place.address)
            .bind(&place.road_address)
            .bind(&place.phone)
            .bind(place.coordinates.lat)
            .bind(place.coordinates.lng)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        tracing::info!("Inserted {inserted} of {} places", places.len());
        Ok(inserted)
    }
}
