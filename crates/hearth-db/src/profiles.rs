//! Profile repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use hearth_core::{Error, Profile, ProfileRepository, ProfileUpdate, Result};

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        account_id: row.get("account_id"),
        display_name: row.get("display_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL implementation of ProfileRepository.
pub struct PgProfileRepository {
    pool: Pool<Postgres>,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, account_id: Uuid, email: &str) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO profiles (account_id, email, created_at, updated_at)
             VALUES ($1, $2, $3, $3)
             ON CONFLICT (account_id) DO NOTHING",
        )
        .bind(account_id)
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn get(&self, account_id: Uuid) -> Result<Profile> {
        let row = sqlx::query(
            "SELECT account_id, display_name, email, phone, created_at, updated_at
             FROM profiles WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| profile_from_row(&r))
            .ok_or_else(|| Error::NotFound(format!("Profile for account {}", account_id)))
    }

    async fn update(&self, account_id: Uuid, update: &ProfileUpdate) -> Result<Profile> {
        let now = Utc::now();
        let row = sqlx::query(
            "UPDATE profiles
             SET display_name = COALESCE($2, display_name),
                 phone = COALESCE($3, phone),
                 updated_at = $4
             WHERE account_id = $1
             RETURNING account_id, display_name, email, phone, created_at, updated_at",
        )
        .bind(account_id)
        .bind(&update.display_name)
        .bind(&update.phone)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| profile_from_row(&r))
            .ok_or_else(|| Error::NotFound(format!("Profile for account {}", account_id)))
    }
}
