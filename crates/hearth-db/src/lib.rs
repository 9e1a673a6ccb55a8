//! # hearth-db
//!
//! PostgreSQL database and blob storage layer for hearth.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for properties, images, profiles, and auth
//! - Filter pushdown query generation (range/equality constraints in SQL,
//!   feature containment in memory)
//! - A filesystem blob backend with public-URL resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use hearth_db::Database;
//! use hearth_core::FilterCriteria;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/hearth").await?;
//!     let houses = db.properties.list(&FilterCriteria::new()).await?;
//!     println!("{} listings", houses.len());
//!     Ok(())
//! }
//! ```
pub mod auth;
pub mod filter_query;
pub mod images;
pub mod listings;
pub mod pool;
pub mod profiles;
pub mod properties;
pub mod storage;

// Re-export core types
pub use hearth_core::*;

// Re-export repository implementations
pub use auth::PgAuthRepository;
pub use filter_query::{FilterQueryBuilder, QueryParam};
pub use images::PgImageRepository;
pub use listings::ListingService;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use profiles::PgProfileRepository;
pub use properties::PgPropertyRepository;
pub use storage::{
    image_storage_path, sanitize_filename, store_listing_image, FilesystemBackend,
    PublicUrlResolver, StorageBackend,
};

use std::sync::Arc;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Property repository for listing CRUD.
    pub properties: PgPropertyRepository,
    /// Image reference repository.
    pub images: PgImageRepository,
    /// Profile repository.
    pub profiles: PgProfileRepository,
    /// Account and session repository.
    pub auth: PgAuthRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            properties: PgPropertyRepository::new(pool.clone()),
            images: PgImageRepository::new(pool.clone()),
            profiles: PgProfileRepository::new(pool.clone()),
            auth: PgAuthRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Build a listing service over this database and `resolver`.
    pub fn listing_service(&self, resolver: PublicUrlResolver) -> ListingService {
        ListingService::new(
            Arc::new(PgPropertyRepository::new(self.pool.clone())),
            Arc::new(PgImageRepository::new(self.pool.clone())),
            resolver,
        )
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Insert the sample listing set when the properties table is empty.
    ///
    /// Used for local bootstrap. Returns the number of rows inserted.
    pub async fn seed_sample_listings(&self) -> Result<usize> {
        use sqlx::Row;

        let row = sqlx::query("SELECT COUNT(*) AS n FROM properties")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        let existing: i64 = row.get("n");
        if existing > 0 {
            return Ok(0);
        }

        let samples = hearth_core::seed::sample_properties();
        let owner = hearth_core::seed::seed_owner();
        let count = samples.len();

        for property in samples {
            sqlx::query(
                r#"
                INSERT INTO properties (
                    id, owner_id, title, address, city, state, zip, price, bedrooms,
                    bathrooms, square_feet, description, latitude, longitude, features,
                    property_type, year_built, is_featured, created_at, updated_at
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
                )
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(property.id)
            .bind(owner)
            .bind(&property.title)
            .bind(&property.address)
            .bind(&property.city)
            .bind(&property.state)
            .bind(&property.zip)
            .bind(property.price)
            .bind(property.bedrooms)
            .bind(property.bathrooms)
            .bind(property.square_feet)
            .bind(&property.description)
            .bind(property.latitude)
            .bind(property.longitude)
            .bind(&property.features)
            .bind(&property.property_type)
            .bind(property.year_built)
            .bind(property.is_featured)
            .bind(property.created_at)
            .bind(property.updated_at)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        }

        tracing::info!(
            subsystem = "db",
            component = "seed",
            result_count = count,
            "Seeded sample listings"
        );
        Ok(count)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
