//! The filter predicate engine.
//!
//! Pure, synchronous predicate narrowing over a list of properties. All set
//! criteria combine with logical AND; unset criteria impose no constraint.
//! Output preserves input order and is always a subset of the input.
//!
//! The same predicate runs in two places: pushed down as SQL range/equality
//! constraints by the repository (price, bedrooms, bathrooms, type), and
//! in-memory here (always, for feature containment, which the store-side
//! query surface does not push down).

use crate::models::{FilterCriteria, Property, PropertyType};

/// True when `property` satisfies every set criterion.
pub fn matches(property: &Property, criteria: &FilterCriteria) -> bool {
    // Price bounds are inclusive on both ends.
    if let Some(min) = criteria.min_price {
        if property.price < min {
            return false;
        }
    }
    if let Some(max) = criteria.max_price {
        if property.price > max {
            return false;
        }
    }

    if let Some(min) = criteria.min_bedrooms {
        if property.bedrooms < min {
            return false;
        }
    }

    if let Some(min) = criteria.min_bathrooms {
        if property.bathrooms < min {
            return false;
        }
    }

    // Unrecognized stored categories never match a requested category.
    if let Some(wanted) = criteria.property_type {
        if PropertyType::parse(&property.property_type) != Some(wanted) {
            return false;
        }
    }

    // Every requested tag must be present; an empty request always passes.
    criteria
        .features
        .iter()
        .all(|f| property.features.iter().any(|have| have == f))
}

/// Narrow `properties` to the ordered sublist matching `criteria`.
pub fn apply<'a>(properties: &'a [Property], criteria: &FilterCriteria) -> Vec<&'a Property> {
    properties.iter().filter(|p| matches(p, criteria)).collect()
}

/// In-place variant used after store retrieval.
pub fn retain(properties: &mut Vec<Property>, criteria: &FilterCriteria) {
    properties.retain(|p| matches(p, criteria));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{sample_properties, seed_id};

    fn ids(result: &[&Property]) -> Vec<uuid::Uuid> {
        result.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_criteria_passes_everything() {
        let props = sample_properties();
        let result = apply(&props, &FilterCriteria::new());
        assert_eq!(result.len(), props.len());
    }

    #[test]
    fn test_output_is_ordered_subset() {
        let props = sample_properties();
        let criteria = FilterCriteria::new().min_bedrooms(3);
        let result = apply(&props, &criteria);

        // Subset of input, preserving relative order.
        let input_ids: Vec<_> = props.iter().map(|p| p.id).collect();
        let mut last_pos = 0;
        for p in &result {
            let pos = input_ids.iter().position(|id| *id == p.id).unwrap();
            assert!(pos >= last_pos);
            last_pos = pos;
        }

        // Every returned property satisfies the criteria; every excluded
        // property violates at least one.
        for p in &props {
            let included = result.iter().any(|r| r.id == p.id);
            assert_eq!(included, matches(p, &criteria));
        }
    }

    #[test]
    fn test_idempotence() {
        let props = sample_properties();
        let criteria = FilterCriteria::new()
            .price_between(400_000, 800_000)
            .min_bathrooms(2.0);

        let once: Vec<Property> = apply(&props, &criteria).into_iter().cloned().collect();
        let twice = apply(&once, &criteria);
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn test_price_boundaries_inclusive() {
        let props = sample_properties();

        // Property 5 is priced exactly 399,000.
        let at_low = FilterCriteria::new().price_between(399_000, 399_000);
        assert_eq!(ids(&apply(&props, &at_low)), vec![seed_id(5)]);

        // One dollar outside either bound excludes it.
        let below = FilterCriteria::new().price_between(399_001, 500_000);
        assert!(!apply(&props, &below).iter().any(|p| p.id == seed_id(5)));
        let above = FilterCriteria::new().price_between(100_000, 398_999);
        assert!(apply(&props, &above).is_empty());
    }

    #[test]
    fn test_price_range_scenario() {
        // 250k..1M inclusive over the sample set: everything but the
        // 1,250,000 villa (id 3).
        let props = sample_properties();
        let criteria = FilterCriteria::new().price_between(250_000, 1_000_000);
        let result = apply(&props, &criteria);
        assert_eq!(
            ids(&result),
            vec![seed_id(1), seed_id(2), seed_id(4), seed_id(5), seed_id(6)]
        );
    }

    #[test]
    fn test_house_with_pool_scenario() {
        let props = sample_properties();
        let criteria = FilterCriteria::new()
            .of_type(PropertyType::House)
            .with_feature("Pool");
        let result = apply(&props, &criteria);

        // Only the lakefront villa is a house with a pool.
        assert_eq!(ids(&result), vec![seed_id(3)]);
        for p in &result {
            assert_eq!(p.property_type, "house");
            assert!(p.features.iter().any(|f| f == "Pool"));
        }
    }

    #[test]
    fn test_all_requested_features_must_match() {
        let props = sample_properties();
        let criteria = FilterCriteria::new()
            .with_feature("Garage")
            .with_feature("Fireplace");
        let result = apply(&props, &criteria);
        // Properties 2 and 5 carry both tags.
        assert_eq!(ids(&result), vec![seed_id(2), seed_id(5)]);
    }

    #[test]
    fn test_unrecognized_category_never_matches() {
        let mut props = sample_properties();
        props[0].property_type = "houseboat".to_string();

        let criteria = FilterCriteria::new().of_type(PropertyType::Apartment);
        assert!(!apply(&props, &criteria).iter().any(|p| p.id == seed_id(1)));

        // But it still passes category-less criteria.
        let loose = FilterCriteria::new().price_between(400_000, 500_000);
        assert!(apply(&props, &loose).iter().any(|p| p.id == seed_id(1)));
    }

    #[test]
    fn test_min_bathrooms_fractional() {
        let props = sample_properties();
        let criteria = FilterCriteria::new().min_bathrooms(2.5);
        let result = apply(&props, &criteria);
        // 3.0, 4.5, and 2.5 qualify; 2.0 and 1.5 do not.
        assert_eq!(ids(&result), vec![seed_id(2), seed_id(3), seed_id(5)]);
    }

    #[test]
    fn test_retain_matches_apply() {
        let props = sample_properties();
        let criteria = FilterCriteria::new().min_bedrooms(4);

        let borrowed = ids(&apply(&props, &criteria));
        let mut owned = props.clone();
        retain(&mut owned, &criteria);
        let retained: Vec<_> = owned.iter().map(|p| p.id).collect();
        assert_eq!(borrowed, retained);
    }

    #[test]
    fn test_combined_criteria_are_anded() {
        let props = sample_properties();
        let criteria = FilterCriteria::new()
            .price_between(250_000, 1_000_000)
            .min_bedrooms(3)
            .of_type(PropertyType::House);
        let result = apply(&props, &criteria);
        // Houses with 3+ bedrooms under 1M: ids 2 and 6.
        assert_eq!(ids(&result), vec![seed_id(2), seed_id(6)]);
    }
}
