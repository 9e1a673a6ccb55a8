//! Listing form validation.
//!
//! Runs before any write in the create and edit flows; failures are reported
//! per field so the caller can render them inline.

use crate::models::PropertyType;
use crate::traits::PropertyInput;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    /// The offending input field.
    pub field: &'static str,
    /// Human-readable message, suitable for inline display.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn require_len(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    label: &str,
) {
    if value.trim().chars().count() < min {
        errors.push(FieldError::new(
            field,
            format!("{} must be at least {} characters", label, min),
        ));
    }
}

/// Validate a property draft.
///
/// Returns every failure at once rather than stopping at the first, so a
/// form can highlight all offending fields in a single round trip.
pub fn validate_property_input(input: &PropertyInput) -> std::result::Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    require_len(&mut errors, "title", &input.title, 3, "Title");
    require_len(&mut errors, "address", &input.address, 5, "Address");
    require_len(&mut errors, "city", &input.city, 2, "City");
    require_len(&mut errors, "state", &input.state, 2, "State");
    require_len(&mut errors, "zip", &input.zip, 5, "ZIP code");

    if let Some(description) = &input.description {
        require_len(&mut errors, "description", description, 10, "Description");
    }

    if input.price <= 0 {
        errors.push(FieldError::new("price", "Price must be positive"));
    }
    if input.bedrooms <= 0 {
        errors.push(FieldError::new("bedrooms", "Bedrooms must be positive"));
    }
    if input.bathrooms <= 0.0 {
        errors.push(FieldError::new("bathrooms", "Bathrooms must be positive"));
    }
    if let Some(sqft) = input.square_feet {
        if sqft <= 0 {
            errors.push(FieldError::new("square_feet", "Square feet must be positive"));
        }
    }
    if let Some(year) = input.year_built {
        if year <= 0 {
            errors.push(FieldError::new("year_built", "Year built must be positive"));
        }
    }

    if PropertyType::parse(&input.property_type).is_none() {
        errors.push(FieldError::new(
            "property_type",
            "Property type must be one of: house, apartment, condo, townhouse",
        ));
    }

    // Coordinates come as a pair or not at all.
    if input.latitude.is_some() != input.longitude.is_some() {
        errors.push(FieldError::new(
            "latitude",
            "Latitude and longitude must be provided together",
        ));
    }
    if let Some(lat) = input.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            errors.push(FieldError::new("latitude", "Latitude must be within -90..90"));
        }
    }
    if let Some(lng) = input.longitude {
        if !(-180.0..=180.0).contains(&lng) {
            errors.push(FieldError::new(
                "longitude",
                "Longitude must be within -180..180",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PropertyInput {
        PropertyInput {
            title: "Modern Downtown Apartment".to_string(),
            address: "123 Main Street".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            price: 450_000,
            bedrooms: 2,
            bathrooms: 2.0,
            square_feet: Some(1200),
            description: Some("Stunning apartment with city views".to_string()),
            latitude: Some(30.2672),
            longitude: Some(-97.7431),
            features: vec!["Balcony".to_string()],
            property_type: "apartment".to_string(),
            year_built: Some(2018),
            is_featured: false,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_property_input(&valid_input()).is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut input = valid_input();
        input.title = "  ".to_string();
        let errors = validate_property_input(&input).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn test_nonpositive_numerics_rejected() {
        let mut input = valid_input();
        input.price = 0;
        input.bedrooms = -1;
        input.bathrooms = 0.0;
        let errors = validate_property_input(&input).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"price"));
        assert!(fields.contains(&"bedrooms"));
        assert!(fields.contains(&"bathrooms"));
    }

    #[test]
    fn test_unknown_property_type_rejected() {
        let mut input = valid_input();
        input.property_type = "castle".to_string();
        let errors = validate_property_input(&input).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "property_type"));
    }

    #[test]
    fn test_half_baths_accepted() {
        let mut input = valid_input();
        input.bathrooms = 2.5;
        assert!(validate_property_input(&input).is_ok());
    }

    #[test]
    fn test_unpaired_coordinates_rejected() {
        let mut input = valid_input();
        input.longitude = None;
        let errors = validate_property_input(&input).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "latitude"));
    }

    #[test]
    fn test_no_coordinates_accepted() {
        let mut input = valid_input();
        input.latitude = None;
        input.longitude = None;
        assert!(validate_property_input(&input).is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut input = valid_input();
        input.latitude = Some(91.0);
        input.longitude = Some(-200.0);
        let errors = validate_property_input(&input).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"latitude"));
        assert!(fields.contains(&"longitude"));
    }

    #[test]
    fn test_all_errors_reported_at_once() {
        let input = PropertyInput {
            title: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            price: 0,
            bedrooms: 0,
            bathrooms: 0.0,
            square_feet: Some(0),
            description: None,
            latitude: None,
            longitude: None,
            features: vec![],
            property_type: String::new(),
            year_built: None,
            is_featured: false,
        };
        let errors = validate_property_input(&input).unwrap_err();
        assert!(errors.len() >= 9);
    }

    #[test]
    fn test_short_description_rejected_when_present() {
        let mut input = valid_input();
        input.description = Some("too short".chars().take(5).collect());
        let errors = validate_property_input(&input).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "description"));
    }
}
