//! Authentication HTTP handlers.
//!
//! Email/password signup and signin, bearer-token signout, and session
//! introspection. Tokens are opaque `hv_tok_`-prefixed secrets stored only
//! as SHA-256 hashes; validation slides the 30-day expiry window.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::info;

use hearth_core::ProfileRepository;

use crate::{ApiError, AppState, Auth};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Create a new account and its profile row.
///
/// # Returns
/// - 201 Created with `{ "account_id": "<uuid>" }`
/// - 400 Bad Request for malformed email or short password
/// - 409 Conflict if the email is already registered
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let account_id = state
        .db
        .auth
        .signup(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            hearth_core::Error::InvalidInput(msg) if msg.contains("already exists") => {
                ApiError::Conflict(msg)
            }
            other => other.into(),
        })?;
    state.db.profiles.create(account_id, &req.email).await?;

    info!(account_id = %account_id, "Account created");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "account_id": account_id })),
    ))
}

/// Verify credentials and issue a session token.
///
/// The token is returned exactly once; only its hash is stored.
///
/// # Returns
/// - 200 OK with `{ "token": "hv_tok_...", "account_id": "<uuid>" }`
/// - 401 Unauthorized for unknown email or wrong password
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (token, account_id) = state.db.auth.signin(&req.email, &req.password).await?;

    info!(account_id = %account_id, "Session issued");
    Ok(Json(serde_json::json!({
        "token": token,
        "account_id": account_id,
    })))
}

/// Revoke the presented session token.
///
/// Idempotent: revoking an unknown or already-revoked token still returns
/// 204, so clients can always clear local state.
pub async fn signout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    state.db.auth.signout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Introspect the current session.
///
/// Always 200; anonymous requests get `{ "authenticated": false }` rather
/// than an error so clients can check sign-in state without handling 401s.
pub async fn session(auth: Auth) -> Json<serde_json::Value> {
    match auth.principal.account_id() {
        Some(account_id) => Json(serde_json::json!({
            "authenticated": true,
            "account_id": account_id,
        })),
        None => Json(serde_json::json!({
            "authenticated": false,
        })),
    }
}
