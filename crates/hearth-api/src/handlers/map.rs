//! Map marker HTTP handler.
//!
//! Projects the filtered listing set down to the coordinates, title, and
//! price the map needs. Listings without coordinates are counted in
//! `omitted` rather than dropped silently.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use hearth_core::{markers, MarkerSet, PropertyRepository};

use crate::handlers::properties::{criteria_from_query, FilterQuery};
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct MarkersQuery {
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<i32>,
    pub min_bathrooms: Option<f64>,
    pub property_type: Option<String>,
    pub features: Option<String>,
    /// Listing to highlight on the map.
    pub selected: Option<Uuid>,
}

/// Markers for every listing matching the filter query.
pub async fn markers(
    State(state): State<AppState>,
    Query(query): Query<MarkersQuery>,
) -> Result<Json<MarkerSet>, ApiError> {
    let filter = FilterQuery {
        min_price: query.min_price,
        max_price: query.max_price,
        min_bedrooms: query.min_bedrooms,
        min_bathrooms: query.min_bathrooms,
        property_type: query.property_type.clone(),
        features: query.features.clone(),
        ..FilterQuery::default()
    };

    let Some(criteria) = criteria_from_query(&filter) else {
        return Ok(Json(MarkerSet {
            markers: vec![],
            omitted: 0,
        }));
    };

    let properties = state.db.properties.list(&criteria).await?;
    Ok(Json(markers::project(&properties, query.selected)))
}
