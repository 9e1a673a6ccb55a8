//! Property listing HTTP handlers.
//!
//! CRUD over listings, owner-scoped mutation, photo uploads, and the
//! amenity-tag endpoint backing the filter panel. List responses carry the
//! standard pagination envelope; each listing is composed with its resolved
//! image URLs (or the placeholder when none exist).

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use hearth_core::{
    defaults, validate_property_input, FilterCriteria, ImageRepository, PropertyInput,
    PropertyRepository, PropertyType, PropertyWithImages,
};
use hearth_db::{image_storage_path, sanitize_filename, store_listing_image, StorageBackend};

use crate::{ApiError, AppState, ListResponse, RequireAuth};

/// Query parameters shared by the listing and marker endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// Inclusive lower price bound.
    pub min_price: Option<i64>,
    /// Inclusive upper price bound.
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<i32>,
    pub min_bathrooms: Option<f64>,
    /// Category name; "any" or empty means no constraint.
    pub property_type: Option<String>,
    /// Comma-separated amenity tags, all of which must be present.
    pub features: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Translate query parameters into filter criteria.
///
/// Returns `None` when the requested category is not a recognized property
/// type: no listing can ever match it, so callers short-circuit to an empty
/// result instead of querying.
pub(crate) fn criteria_from_query(query: &FilterQuery) -> Option<FilterCriteria> {
    let property_type = match query.property_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if s.eq_ignore_ascii_case("any") => None,
        Some(s) => Some(PropertyType::parse(&s.to_ascii_lowercase())?),
    };

    let features = query
        .features
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    Some(FilterCriteria {
        min_price: query.min_price,
        max_price: query.max_price,
        min_bedrooms: query.min_bedrooms,
        min_bathrooms: query.min_bathrooms,
        property_type,
        features,
    })
}

/// Clamp pagination parameters and slice out the requested page.
fn paginate<T: serde::Serialize>(items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> ListResponse<T> {
    let limit = limit
        .unwrap_or(defaults::DEFAULT_PAGE_LIMIT)
        .clamp(1, defaults::MAX_PAGE_LIMIT);
    let offset = offset.unwrap_or(0);
    let total = items.len();
    let page: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
    ListResponse::new(page, total, limit, offset)
}

/// List listings matching the filter query.
///
/// # Returns
/// - 200 OK with a paginated envelope of listings (newest first)
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ListResponse<PropertyWithImages>>, ApiError> {
    let Some(criteria) = criteria_from_query(&query) else {
        // Unrecognized category: nothing can match
        return Ok(Json(paginate(vec![], query.limit, query.offset)));
    };

    let listings = state.listings.list(&criteria).await?;
    Ok(Json(paginate(listings, query.limit, query.offset)))
}

/// Get a single listing by id.
///
/// # Returns
/// - 200 OK with the listing and its image URLs
/// - 404 Not Found if the listing doesn't exist
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyWithImages>, ApiError> {
    let listing = state.listings.get(id).await?;
    Ok(Json(listing))
}

/// Create a new listing owned by the authenticated account.
///
/// # Returns
/// - 201 Created with `{ "id": "<uuid>" }`
/// - 400 Bad Request with per-field messages if validation fails
pub async fn create_property(
    State(state): State<AppState>,
    auth: RequireAuth,
    Json(input): Json<PropertyInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate_property_input(&input).map_err(ApiError::Validation)?;

    let id = state.db.properties.insert(auth.account_id, &input).await?;
    info!(
        property_id = %id,
        account_id = %auth.account_id,
        "Listing created"
    );
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Replace a listing. The edit form submits the complete shape.
///
/// # Returns
/// - 200 OK with the updated listing
/// - 400 Bad Request if validation fails
/// - 403 Forbidden if the listing belongs to another account
/// - 404 Not Found if the listing doesn't exist
pub async fn update_property(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
    Json(input): Json<PropertyInput>,
) -> Result<Json<PropertyWithImages>, ApiError> {
    validate_property_input(&input).map_err(ApiError::Validation)?;

    state
        .db
        .properties
        .update(id, auth.account_id, &input)
        .await?;
    let listing = state.listings.get(id).await?;
    Ok(Json(listing))
}

/// Delete a listing and its stored photos.
///
/// # Returns
/// - 204 No Content on success
/// - 403 Forbidden if the listing belongs to another account
/// - 404 Not Found if the listing doesn't exist
pub async fn delete_property(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    // Collect blob paths before the row (and its image rows) cascade away
    let paths = state.db.images.paths_for_property(id).await?;

    state.db.properties.delete(id, auth.account_id).await?;

    // Blob cleanup is best-effort; the listing is already gone
    for path in &paths {
        if let Err(e) = state.storage.delete(path).await {
            warn!(storage_path = %path, error = %e, "Failed to delete listing photo");
        }
    }

    info!(
        property_id = %id,
        account_id = %auth.account_id,
        image_count = paths.len(),
        "Listing deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// List the authenticated account's own listings, newest first.
pub async fn my_properties(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<PropertyWithImages>>, ApiError> {
    let listings = state.listings.list_by_owner(auth.account_id).await?;
    Ok(Json(listings))
}

/// Upload one or more photos for a listing.
///
/// Multipart form upload. Each file part must carry an `image/*` content
/// type. The first photo uploaded to a listing with no primary image becomes
/// the primary (cover) image.
///
/// # Returns
/// - 201 Created with `{ "uploaded": n, "images": [urls...] }`
/// - 400 Bad Request for non-image parts or an empty upload
/// - 403 Forbidden if the listing belongs to another account
/// - 404 Not Found if the listing doesn't exist
pub async fn upload_images(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let property = state.db.properties.get(id).await?;
    if property.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the listing owner can upload photos".to_string(),
        ));
    }

    let mut has_primary = state.db.images.has_primary(id).await?;
    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            // Skip non-file parts
            continue;
        };

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::BadRequest(format!(
                "Unsupported content type '{}' for '{}'; expected image/*",
                content_type, filename
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        if data.is_empty() {
            return Err(ApiError::BadRequest(format!("'{}' is empty", filename)));
        }
        if data.len() > defaults::MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest(format!(
                "'{}' exceeds the {} byte upload limit",
                filename,
                defaults::MAX_UPLOAD_BYTES
            )));
        }

        let safe_name = sanitize_filename(&filename);
        let storage_path = image_storage_path(auth.account_id, id, &safe_name);

        let is_primary = !has_primary;
        store_listing_image(
            state.storage.as_ref(),
            &state.db.images,
            id,
            &storage_path,
            &data,
            is_primary,
        )
        .await?;
        has_primary = true;

        info!(
            property_id = %id,
            storage_path = %storage_path,
            upload_bytes = data.len(),
            is_primary,
            "Photo uploaded"
        );
        stored.push(storage_path);
    }

    if stored.is_empty() {
        return Err(ApiError::BadRequest(
            "No file parts in upload".to_string(),
        ));
    }

    let listing = state.listings.get(id).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "uploaded": stored.len(),
            "images": listing.images,
        })),
    ))
}

/// Amenity tags available for filtering.
///
/// The curated baseline set, merged with any tags already present on
/// listings, sorted and deduplicated.
pub async fn list_features(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let mut features: Vec<String> = hearth_core::seed::AVAILABLE_FEATURES
        .iter()
        .map(|s| s.to_string())
        .collect();
    features.extend(state.db.properties.distinct_features().await?);
    features.sort();
    features.dedup();
    Ok(Json(features))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(property_type: Option<&str>, features: Option<&str>) -> FilterQuery {
        FilterQuery {
            property_type: property_type.map(String::from),
            features: features.map(String::from),
            ..FilterQuery::default()
        }
    }

    #[test]
    fn test_empty_query_is_empty_criteria() {
        let criteria = criteria_from_query(&FilterQuery::default()).unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_any_category_means_no_constraint() {
        let criteria = criteria_from_query(&query(Some("any"), None)).unwrap();
        assert!(criteria.property_type.is_none());
        let criteria = criteria_from_query(&query(Some(""), None)).unwrap();
        assert!(criteria.property_type.is_none());
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let criteria = criteria_from_query(&query(Some("House"), None)).unwrap();
        assert_eq!(criteria.property_type, Some(PropertyType::House));
    }

    #[test]
    fn test_unrecognized_category_is_unmatchable() {
        assert!(criteria_from_query(&query(Some("castle"), None)).is_none());
    }

    #[test]
    fn test_features_split_and_trimmed() {
        let criteria = criteria_from_query(&query(None, Some("Garage, Fireplace,,  Pool "))).unwrap();
        assert_eq!(criteria.features, vec!["Garage", "Fireplace", "Pool"]);
    }

    #[test]
    fn test_numeric_bounds_pass_through() {
        let q = FilterQuery {
            min_price: Some(250_000),
            max_price: Some(700_000),
            min_bedrooms: Some(3),
            min_bathrooms: Some(2.5),
            ..FilterQuery::default()
        };
        let criteria = criteria_from_query(&q).unwrap();
        assert_eq!(criteria.min_price, Some(250_000));
        assert_eq!(criteria.max_price, Some(700_000));
        assert_eq!(criteria.min_bedrooms, Some(3));
        assert_eq!(criteria.min_bathrooms, Some(2.5));
    }

    #[test]
    fn test_paginate_clamps_limit() {
        let items: Vec<u32> = (0..500).collect();
        let page = paginate(items, Some(10_000), None);
        assert_eq!(page.pagination.limit, defaults::MAX_PAGE_LIMIT);
        assert_eq!(page.data.len(), defaults::MAX_PAGE_LIMIT);
        assert!(page.pagination.has_more);
    }

    #[test]
    fn test_paginate_offset_past_end() {
        let items: Vec<u32> = (0..5).collect();
        let page = paginate(items, Some(10), Some(100));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 5);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_paginate_default_limit() {
        let items: Vec<u32> = (0..100).collect();
        let page = paginate(items, None, None);
        assert_eq!(page.pagination.limit, defaults::DEFAULT_PAGE_LIMIT);
        assert_eq!(page.data.len(), defaults::DEFAULT_PAGE_LIMIT);
    }
}
