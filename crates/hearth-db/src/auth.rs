//! Account and session repository implementation.
//!
//! Credentials are stored as salted SHA-256 digests; issued bearer tokens
//! are stored as SHA-256 digests only, so a database leak exposes neither
//! passwords nor live tokens. Session expiry slides forward on each
//! authenticated request.

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use hearth_core::defaults::{SESSION_TOKEN_PREFIX, SESSION_TTL_DAYS};
use hearth_core::{Error, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// PostgreSQL implementation of the account/session store.
pub struct PgAuthRepository {
    pool: Pool<Postgres>,
}

impl PgAuthRepository {
    /// Create a new PgAuthRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random string.
    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a secret using SHA256.
    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn hash_password(password: &str, salt: &str) -> String {
        Self::hash_secret(&format!("{}{}", salt, password))
    }

    fn validate_credentials_shape(email: &str, password: &str) -> Result<()> {
        if !email.contains('@') || email.trim().len() < 3 {
            return Err(Error::InvalidInput("A valid email is required".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    /// Register a new account. Returns the new account id.
    ///
    /// Fails with `InvalidInput` when the email is already registered.
    pub async fn signup(&self, email: &str, password: &str) -> Result<Uuid> {
        Self::validate_credentials_shape(email, password)?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        let salt = Self::generate_secret(16);
        let password_hash = Self::hash_password(password, &salt);
        let email = email.trim().to_lowercase();

        let result = sqlx::query(
            "INSERT INTO accounts (id, email, password_hash, password_salt, created_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(id)
        .bind(&email)
        .bind(&password_hash)
        .bind(&salt)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::InvalidInput(
                "An account with this email already exists".to_string(),
            ));
        }

        debug!(
            subsystem = "db",
            component = "auth",
            op = "signup",
            account_id = %id,
            "Registered account"
        );
        Ok(id)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// Returns `(token, account_id)`. The plaintext token is returned to the
    /// caller exactly once; only its hash is persisted.
    pub async fn signin(&self, email: &str, password: &str) -> Result<(String, Uuid)> {
        let email = email.trim().to_lowercase();
        let row = sqlx::query(
            "SELECT id, password_hash, password_salt FROM accounts WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        // Same error for unknown email and wrong password.
        let invalid = || Error::Unauthorized("Invalid email or password".to_string());
        let row = row.ok_or_else(invalid)?;

        let account_id: Uuid = row.get("id");
        let stored_hash: String = row.get("password_hash");
        let salt: String = row.get("password_salt");
        if Self::hash_password(password, &salt) != stored_hash {
            return Err(invalid());
        }

        let token = format!("{}{}", SESSION_TOKEN_PREFIX, Self::generate_secret(48));
        let token_hash = Self::hash_secret(&token);
        let now = Utc::now();
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);

        sqlx::query(
            "INSERT INTO sessions (id, account_id, token_hash, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(&token_hash)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "auth",
            op = "signin",
            account_id = %account_id,
            "Issued session token"
        );
        Ok((token, account_id))
    }

    /// Revoke the session behind `token`. Revoking an unknown token is a no-op.
    pub async fn signout(&self, token: &str) -> Result<()> {
        let token_hash = Self::hash_secret(token);
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    /// Validate a bearer token, returning the account id when the session is
    /// live. Extends the expiry on each use (sliding window).
    pub async fn validate_session(&self, token: &str) -> Result<Option<Uuid>> {
        if !token.starts_with(SESSION_TOKEN_PREFIX) {
            return Ok(None);
        }

        let token_hash = Self::hash_secret(token);
        let now = Utc::now();
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);

        let row = sqlx::query(
            "UPDATE sessions
             SET expires_at = $2, last_used_at = $3
             WHERE token_hash = $1 AND expires_at > $3
             RETURNING account_id",
        )
        .bind(&token_hash)
        .bind(expires_at)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| r.get("account_id")))
    }

    /// Delete expired sessions. Returns the number removed.
    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_length_and_charset() {
        let secret = PgAuthRepository::generate_secret(48);
        assert_eq!(secret.len(), 48);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_secret_is_deterministic_hex() {
        let a = PgAuthRepository::hash_secret("hunter2");
        let b = PgAuthRepository::hash_secret("hunter2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_password_hash_depends_on_salt() {
        let with_salt_a = PgAuthRepository::hash_password("hunter2", "salt-a");
        let with_salt_b = PgAuthRepository::hash_password("hunter2", "salt-b");
        assert_ne!(with_salt_a, with_salt_b);
    }

    #[test]
    fn test_credentials_shape() {
        assert!(PgAuthRepository::validate_credentials_shape("a@b.com", "secret1").is_ok());
        assert!(PgAuthRepository::validate_credentials_shape("not-an-email", "secret1").is_err());
        assert!(PgAuthRepository::validate_credentials_shape("a@b.com", "short").is_err());
    }
}
