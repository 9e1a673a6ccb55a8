//! Property repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use hearth_core::{filter, Error, FilterCriteria, Property, PropertyInput, PropertyRepository, Result};

use crate::filter_query::{FilterQueryBuilder, QueryParam};

const PROPERTY_COLUMNS: &str = "id, owner_id, title, address, city, state, zip, price, bedrooms, \
     bathrooms, square_feet, description, latitude, longitude, features, property_type, \
     year_built, is_featured, created_at, updated_at";

fn property_from_row(row: &PgRow) -> Property {
    Property {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        zip: row.get("zip"),
        price: row.get("price"),
        bedrooms: row.get("bedrooms"),
        bathrooms: row.get("bathrooms"),
        square_feet: row.get("square_feet"),
        description: row.get("description"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        features: row.get("features"),
        property_type: row.get("property_type"),
        year_built: row.get("year_built"),
        is_featured: row.get("is_featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL implementation of PropertyRepository.
pub struct PgPropertyRepository {
    pool: Pool<Postgres>,
}

impl PgPropertyRepository {
    /// Create a new PgPropertyRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Owner of a row, or None when the row does not exist.
    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>> {
        let row = sqlx::query("SELECT owner_id FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| r.get("owner_id")))
    }

    /// Map a zero-row owner-scoped write to the right error.
    async fn ownership_error(&self, id: Uuid, owner_id: Uuid) -> Error {
        match self.owner_of(id).await {
            Ok(None) => Error::PropertyNotFound(id),
            Ok(Some(actual)) if actual != owner_id => {
                Error::Forbidden(format!("Property {} belongs to another account", id))
            }
            Ok(Some(_)) => Error::Internal(format!(
                "owner-scoped write on property {} affected no rows",
                id
            )),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn insert(&self, owner_id: Uuid, input: &PropertyInput) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO properties (
                id, owner_id, title, address, city, state, zip, price, bedrooms,
                bathrooms, square_feet, description, latitude, longitude, features,
                property_type, year_built, is_featured, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $19
            )
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&input.title)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.zip)
        .bind(input.price)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.square_feet)
        .bind(&input.description)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.features)
        .bind(&input.property_type)
        .bind(input.year_built)
        .bind(input.is_featured)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "properties",
            op = "insert",
            property_id = %id,
            account_id = %owner_id,
            "Inserted property"
        );
        Ok(id)
    }

    async fn update(&self, id: Uuid, owner_id: Uuid, input: &PropertyInput) -> Result<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE properties SET
                title = $3, address = $4, city = $5, state = $6, zip = $7,
                price = $8, bedrooms = $9, bathrooms = $10, square_feet = $11,
                description = $12, latitude = $13, longitude = $14, features = $15,
                property_type = $16, year_built = $17, is_featured = $18,
                updated_at = $19
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&input.title)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.zip)
        .bind(input.price)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.square_feet)
        .bind(&input.description)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.features)
        .bind(&input.property_type)
        .bind(input.year_built)
        .bind(input.is_featured)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(self.ownership_error(id, owner_id).await);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<()> {
        // Image rows cascade via foreign key.
        let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(self.ownership_error(id, owner_id).await);
        }

        debug!(
            subsystem = "db",
            component = "properties",
            op = "delete",
            property_id = %id,
            account_id = %owner_id,
            "Deleted property"
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Property> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM properties WHERE id = $1",
            PROPERTY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| property_from_row(&r))
            .ok_or(Error::PropertyNotFound(id))
    }

    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Property>> {
        let (clause, params) = FilterQueryBuilder::new(criteria.clone(), 0).build();
        let sql = format!(
            "SELECT {} FROM properties WHERE {} ORDER BY created_at DESC, id",
            PROPERTY_COLUMNS, clause
        );

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                QueryParam::Int64(v) => query.bind(v),
                QueryParam::Int(v) => query.bind(v),
                QueryParam::Float(v) => query.bind(v),
                QueryParam::String(v) => query.bind(v),
            };
        }

        let rows = query.fetch_all(&self.pool).await.map_err(Error::Database)?;
        let mut properties: Vec<Property> =
            rows.iter().map(property_from_row).collect();

        // Feature containment has no store-side pushdown; the full predicate
        // runs in memory on the retrieved rows.
        filter::retain(&mut properties, criteria);

        debug!(
            subsystem = "db",
            component = "properties",
            op = "list",
            result_count = properties.len(),
            "Listed properties"
        );
        Ok(properties)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM properties WHERE owner_id = $1 ORDER BY created_at DESC, id",
            PROPERTY_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(property_from_row).collect())
    }

    async fn distinct_features(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT unnest(features) AS feature FROM properties ORDER BY feature",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|r| r.get("feature")).collect())
    }
}
