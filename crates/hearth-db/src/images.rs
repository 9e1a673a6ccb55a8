//! Image reference repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use hearth_core::{Error, ImageRepository, PropertyImage, Result};

/// PostgreSQL implementation of ImageRepository.
pub struct PgImageRepository {
    pool: Pool<Postgres>,
}

impl PgImageRepository {
    /// Create a new PgImageRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    async fn add(&self, property_id: Uuid, storage_path: &str, is_primary: bool) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO property_images (id, property_id, storage_path, is_primary, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(property_id)
        .bind(storage_path)
        .bind(is_primary)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn list_for_property(&self, property_id: Uuid) -> Result<Vec<PropertyImage>> {
        let rows = sqlx::query(
            "SELECT id, property_id, storage_path, is_primary, created_at
             FROM property_images
             WHERE property_id = $1
             ORDER BY is_primary DESC, created_at, id",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let images = rows
            .into_iter()
            .map(|row| PropertyImage {
                id: row.get("id"),
                property_id: row.get("property_id"),
                storage_path: row.get("storage_path"),
                is_primary: row.get("is_primary"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(images)
    }

    async fn has_primary(&self, property_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(
                 SELECT 1 FROM property_images WHERE property_id = $1 AND is_primary
             ) AS has_primary",
        )
        .bind(property_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.get("has_primary"))
    }

    async fn paths_for_property(&self, property_id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT storage_path FROM property_images WHERE property_id = $1")
            .bind(property_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|r| r.get("storage_path")).collect())
    }
}
