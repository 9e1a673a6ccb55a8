//! Sample listing data used for local bootstrap and filter-engine tests.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::models::Property;

/// Amenity tags offered by the filter panel.
pub const AVAILABLE_FEATURES: &[&str] = &[
    "Balcony",
    "Garage",
    "Pool",
    "Pet Friendly",
    "Gym",
    "In-unit Laundry",
    "Fireplace",
    "Backyard",
    "Central AC",
    "Hardwood Floors",
    "Waterfront",
    "Hot Tub",
    "Home Theater",
    "Wine Cellar",
    "Exposed Brick",
    "High Ceilings",
    "24-hour Security",
    "Fitness Center",
    "Rooftop Terrace",
    "Patio",
    "Smart Home",
    "Fenced Yard",
    "Historic",
    "Front Porch",
    "Garden",
    "Detached Studio",
];

/// Stable id for the nth seed property (1-based, matching the sample set).
pub fn seed_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Owner account used for all seed listings.
pub fn seed_owner() -> Uuid {
    Uuid::from_u128(0x5eed)
}

#[allow(clippy::too_many_arguments)]
fn listing(
    n: u128,
    title: &str,
    address: &str,
    city: &str,
    zip: &str,
    price: i64,
    bedrooms: i32,
    bathrooms: f64,
    square_feet: i32,
    coords: (f64, f64),
    features: &[&str],
    property_type: &str,
    year_built: i32,
    is_featured: bool,
) -> Property {
    let created = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    Property {
        id: seed_id(n),
        owner_id: seed_owner(),
        title: title.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        state: "TX".to_string(),
        zip: zip.to_string(),
        price,
        bedrooms,
        bathrooms,
        square_feet: Some(square_feet),
        description: None,
        latitude: Some(coords.0),
        longitude: Some(coords.1),
        features: features.iter().map(|s| s.to_string()).collect(),
        property_type: property_type.to_string(),
        year_built: Some(year_built),
        is_featured,
        created_at: created,
        updated_at: created,
    }
}

/// The six-listing sample set, in insertion order.
pub fn sample_properties() -> Vec<Property> {
    vec![
        listing(
            1,
            "Modern Downtown Apartment",
            "123 Main Street",
            "Austin",
            "78701",
            450_000,
            2,
            2.0,
            1200,
            (30.2672, -97.7431),
            &["Balcony", "Gym", "Pool", "Pet Friendly", "In-unit Laundry"],
            "apartment",
            2018,
            true,
        ),
        listing(
            2,
            "Charming Suburban Home",
            "456 Oak Lane",
            "Round Rock",
            "78664",
            625_000,
            4,
            3.0,
            2800,
            (30.5083, -97.6789),
            &["Garage", "Fireplace", "Backyard", "Central AC", "Hardwood Floors"],
            "house",
            2005,
            false,
        ),
        listing(
            3,
            "Luxury Lakefront Villa",
            "789 Lakeview Drive",
            "Austin",
            "78732",
            1_250_000,
            5,
            4.5,
            4200,
            (30.3884, -97.9908),
            &["Waterfront", "Pool", "Hot Tub", "Home Theater", "Wine Cellar"],
            "house",
            2015,
            true,
        ),
        listing(
            4,
            "Downtown Loft Condo",
            "101 Congress Ave",
            "Austin",
            "78701",
            525_000,
            1,
            1.5,
            1050,
            (30.2646, -97.7475),
            &[
                "Exposed Brick",
                "High Ceilings",
                "24-hour Security",
                "Fitness Center",
                "Rooftop Terrace",
            ],
            "condo",
            2010,
            false,
        ),
        listing(
            5,
            "Family-Friendly Townhouse",
            "202 Cedar St",
            "Austin",
            "78702",
            399_000,
            3,
            2.5,
            1800,
            (30.2669, -97.7252),
            &["Garage", "Patio", "Smart Home", "Fireplace", "Fenced Yard"],
            "townhouse",
            2019,
            false,
        ),
        listing(
            6,
            "Historic Bungalow",
            "303 Elm Rd",
            "Austin",
            "78704",
            750_000,
            3,
            2.0,
            1650,
            (30.2497, -97.7661),
            &[
                "Historic",
                "Hardwood Floors",
                "Front Porch",
                "Garden",
                "Detached Studio",
            ],
            "house",
            1935,
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_set_shape() {
        let props = sample_properties();
        assert_eq!(props.len(), 6);
        assert_eq!(props[0].id, seed_id(1));
        assert_eq!(props[2].price, 1_250_000);
        assert!(props.iter().all(|p| p.has_coordinates()));
        assert!(props.iter().all(|p| p.owner_id == seed_owner()));
    }

    #[test]
    fn test_seed_ids_are_stable() {
        assert_eq!(seed_id(1), seed_id(1));
        assert_ne!(seed_id(1), seed_id(2));
    }

    #[test]
    fn test_available_features_cover_sample_tags() {
        assert_eq!(AVAILABLE_FEATURES.len(), 26);
        for property in sample_properties() {
            for tag in &property.features {
                assert!(
                    AVAILABLE_FEATURES.contains(&tag.as_str()),
                    "sample tag '{}' missing from the curated feature list",
                    tag
                );
            }
        }
    }
}
