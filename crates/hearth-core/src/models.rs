//! Domain models for hearth.
//!
//! One canonical snake_case shape is used end-to-end; the database rows,
//! API payloads, and filter engine all share these types. Adaptation to
//! the store happens at the repository boundary, not via parallel shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PROPERTY
// =============================================================================

/// The fixed set of listing categories accepted by the management form.
///
/// Stored rows may carry a category outside this set (legacy imports); the
/// filter engine treats those as non-matching rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Townhouse,
}

impl PropertyType {
    /// All recognized categories, in display order.
    pub const ALL: [PropertyType; 4] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Condo,
        PropertyType::Townhouse,
    ];

    /// Canonical lowercase name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
        }
    }

    /// Parse a stored category string. Returns `None` for unrecognized values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "house" => Some(PropertyType::House),
            "apartment" => Some(PropertyType::Apartment),
            "condo" => Some(PropertyType::Condo),
            "townhouse" => Some(PropertyType::Townhouse),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property listing.
///
/// Numeric attributes are non-negative (enforced by validation at the
/// management boundary and by database checks). `latitude` and `longitude`
/// are both present or both absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    /// Account that created the listing. Only the owner may mutate it.
    pub owner_id: Uuid,
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Whole-dollar price.
    pub price: i64,
    pub bedrooms: i32,
    /// Fractional to represent half-baths (e.g. 2.5).
    pub bathrooms: f64,
    pub square_feet: Option<i32>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Free-form amenity tags. Uniqueness is not enforced.
    #[serde(default)]
    pub features: Vec<String>,
    /// Stored category string; see [`PropertyType`].
    pub property_type: String,
    pub year_built: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// True when both coordinates are present.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// A property row composed with its resolved image URLs.
///
/// Produced by the listing service: storage paths are resolved to public
/// URLs, and a property with no uploaded images gets a single placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyWithImages {
    #[serde(flatten)]
    pub property: Property,
    pub images: Vec<String>,
}

/// An image reference row, keyed by property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    /// Path within the blob store, namespaced `{owner_id}/{property_id}/...`.
    pub storage_path: String,
    /// First uploaded image is the primary one shown on cards.
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// FILTER CRITERIA
// =============================================================================

/// Transient filter criteria, reconstructed per request and discarded.
///
/// All set fields are combined with logical AND; unset fields mean "no
/// constraint". Price bounds are inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Inclusive lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    /// Inclusive upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    /// Minimum bedroom count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<i32>,
    /// Minimum bathroom count (fractional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bathrooms: Option<f64>,
    /// Exact category match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    /// Required amenity tags; every listed tag must be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl FilterCriteria {
    /// Create an empty (match-everything) criteria set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set inclusive price bounds.
    pub fn price_between(mut self, min: i64, max: i64) -> Self {
        self.min_price = Some(min);
        self.max_price = Some(max);
        self
    }

    /// Set the minimum bedroom count.
    pub fn min_bedrooms(mut self, n: i32) -> Self {
        self.min_bedrooms = Some(n);
        self
    }

    /// Set the minimum bathroom count.
    pub fn min_bathrooms(mut self, n: f64) -> Self {
        self.min_bathrooms = Some(n);
        self
    }

    /// Require an exact category.
    pub fn of_type(mut self, ty: PropertyType) -> Self {
        self.property_type = Some(ty);
        self
    }

    /// Require an amenity tag (AND logic with other tags).
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_bedrooms.is_none()
            && self.min_bathrooms.is_none()
            && self.property_type.is_none()
            && self.features.is_empty()
    }
}

// =============================================================================
// ACCOUNTS, SESSIONS, PROFILES
// =============================================================================

/// A registered account. Password material never leaves the db layer.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
}

/// A bearer-token session. Only the token hash is stored.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Denormalized profile row keyed by account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub account_id: Uuid,
    pub display_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated (or anonymous) caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPrincipal {
    /// A valid session token was presented.
    Session { account_id: Uuid },
    /// No token, or an invalid/expired one.
    Anonymous,
}

impl AuthPrincipal {
    /// True unless anonymous.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthPrincipal::Anonymous)
    }

    /// The account id, if authenticated.
    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            AuthPrincipal::Session { account_id } => Some(*account_id),
            AuthPrincipal::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_roundtrip() {
        for ty in PropertyType::ALL {
            assert_eq!(PropertyType::parse(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn test_property_type_parse_unrecognized() {
        assert_eq!(PropertyType::parse("castle"), None);
        assert_eq!(PropertyType::parse(""), None);
        assert_eq!(PropertyType::parse("House"), None); // stored values are lowercase
    }

    #[test]
    fn test_property_type_serde_lowercase() {
        let json = serde_json::to_string(&PropertyType::Townhouse).unwrap();
        assert_eq!(json, "\"townhouse\"");
        let back: PropertyType = serde_json::from_str("\"condo\"").unwrap();
        assert_eq!(back, PropertyType::Condo);
    }

    #[test]
    fn test_filter_criteria_builder() {
        let criteria = FilterCriteria::new()
            .price_between(250_000, 1_000_000)
            .min_bedrooms(2)
            .of_type(PropertyType::House)
            .with_feature("Pool");

        assert_eq!(criteria.min_price, Some(250_000));
        assert_eq!(criteria.max_price, Some(1_000_000));
        assert_eq!(criteria.min_bedrooms, Some(2));
        assert_eq!(criteria.property_type, Some(PropertyType::House));
        assert_eq!(criteria.features, vec!["Pool".to_string()]);
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_filter_criteria_default_is_empty() {
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn test_auth_principal() {
        let id = Uuid::new_v4();
        let session = AuthPrincipal::Session { account_id: id };
        assert!(session.is_authenticated());
        assert_eq!(session.account_id(), Some(id));

        assert!(!AuthPrincipal::Anonymous.is_authenticated());
        assert_eq!(AuthPrincipal::Anonymous.account_id(), None);
    }
}
