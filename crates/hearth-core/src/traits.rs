//! Repository traits for hearth abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{FilterCriteria, Profile, Property, PropertyImage};

// =============================================================================
// PROPERTY REPOSITORY
// =============================================================================

/// Full listing draft submitted by the create and edit forms.
///
/// The edit flow submits the complete shape (the form is pre-filled from the
/// existing row), so create and update share this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInput {
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: f64,
    #[serde(default)]
    pub square_feet: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
    pub property_type: String,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Repository for property CRUD operations.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Insert a new listing under `owner_id`. Returns the new row id.
    async fn insert(&self, owner_id: Uuid, input: &PropertyInput) -> Result<Uuid>;

    /// Replace a listing, scoped to its owner.
    ///
    /// Returns `PropertyNotFound` when the row does not exist and `Forbidden`
    /// when it exists but belongs to another account.
    async fn update(&self, id: Uuid, owner_id: Uuid, input: &PropertyInput) -> Result<()>;

    /// Delete a listing, scoped to its owner. Image rows cascade.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<()>;

    /// Fetch a single listing.
    async fn get(&self, id: Uuid) -> Result<Property>;

    /// List listings matching `criteria`.
    ///
    /// Range and equality constraints are pushed down to the store; feature
    /// containment is applied in memory after retrieval.
    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Property>>;

    /// List every listing owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>>;

    /// Distinct amenity tags across all listings, for the filter panel.
    async fn distinct_features(&self) -> Result<Vec<String>>;
}

// =============================================================================
// IMAGE REPOSITORY
// =============================================================================

/// Repository for per-property image references.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Record an uploaded image. `is_primary` marks the listing's cover image.
    async fn add(&self, property_id: Uuid, storage_path: &str, is_primary: bool) -> Result<Uuid>;

    /// Image rows for a property, primary first, then upload order.
    async fn list_for_property(&self, property_id: Uuid) -> Result<Vec<PropertyImage>>;

    /// True when the property already has a primary image.
    async fn has_primary(&self, property_id: Uuid) -> Result<bool>;

    /// Storage paths for a property, for blob cleanup on delete.
    async fn paths_for_property(&self, property_id: Uuid) -> Result<Vec<String>>;
}

// =============================================================================
// PROFILE REPOSITORY
// =============================================================================

/// Editable profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Repository for denormalized profile rows.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create the profile row for a new account.
    async fn create(&self, account_id: Uuid, email: &str) -> Result<()>;

    /// Fetch a profile.
    async fn get(&self, account_id: Uuid) -> Result<Profile>;

    /// Apply profile edits and return the updated row.
    async fn update(&self, account_id: Uuid, update: &ProfileUpdate) -> Result<Profile>;
}
