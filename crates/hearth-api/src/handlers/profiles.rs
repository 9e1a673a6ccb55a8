//! Profile HTTP handlers. Owner-scoped read and edit.

use axum::{extract::State, Json};

use hearth_core::{Profile, ProfileRepository, ProfileUpdate};

use crate::{ApiError, AppState, RequireAuth};

/// Get the authenticated account's profile.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.db.profiles.get(auth.account_id).await?;
    Ok(Json(profile))
}

/// Apply profile edits. Omitted fields are left unchanged.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: RequireAuth,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.db.profiles.update(auth.account_id, &update).await?;
    Ok(Json(profile))
}
