//! Filter pushdown query builder.
//!
//! Converts a [`FilterCriteria`] into a parameterized SQL WHERE fragment so
//! the store narrows listings by range and equality before rows ever reach
//! the process. Feature-tag containment is deliberately NOT pushed down; the
//! query surface this design targets has no array-containment pushdown, so
//! tags are matched in memory by the core filter engine after retrieval.

use hearth_core::FilterCriteria;

/// Type-safe parameter binding for generated SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// 64-bit integer (prices).
    Int64(i64),
    /// 32-bit integer (bedroom counts).
    Int(i32),
    /// Double (bathroom counts).
    Float(f64),
    /// String (property type).
    String(String),
}

/// Generates SQL WHERE clause fragments for listing filters.
///
/// # Example
///
/// ```rust,ignore
/// let builder = FilterQueryBuilder::new(criteria, 0);
/// let (sql, params) = builder.build();
/// // sql: "price >= $1 AND price <= $2 AND property_type = $3"
/// ```
pub struct FilterQueryBuilder {
    criteria: FilterCriteria,
    param_offset: usize,
}

impl FilterQueryBuilder {
    /// Create a new builder.
    ///
    /// `param_offset` is the number of parameters already in the enclosing
    /// query, so generated placeholders start at `$offset + 1`.
    pub fn new(criteria: FilterCriteria, param_offset: usize) -> Self {
        Self {
            criteria,
            param_offset,
        }
    }

    /// Build the WHERE clause fragment and its parameters, in order.
    ///
    /// Returns `("TRUE", [])` when no pushable constraint is set.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut next = self.param_offset;

        if let Some(min) = self.criteria.min_price {
            next += 1;
            clauses.push(format!("price >= ${}", next));
            params.push(QueryParam::Int64(min));
        }
        if let Some(max) = self.criteria.max_price {
            next += 1;
            clauses.push(format!("price <= ${}", next));
            params.push(QueryParam::Int64(max));
        }
        if let Some(min) = self.criteria.min_bedrooms {
            next += 1;
            clauses.push(format!("bedrooms >= ${}", next));
            params.push(QueryParam::Int(min));
        }
        if let Some(min) = self.criteria.min_bathrooms {
            next += 1;
            clauses.push(format!("bathrooms >= ${}", next));
            params.push(QueryParam::Float(min));
        }
        if let Some(ty) = self.criteria.property_type {
            next += 1;
            clauses.push(format!("property_type = ${}", next));
            params.push(QueryParam::String(ty.as_str().to_string()));
        }

        if clauses.is_empty() {
            ("TRUE".to_string(), Vec::new())
        } else {
            (clauses.join(" AND "), params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::PropertyType;

    #[test]
    fn test_empty_criteria_yields_true() {
        let builder = FilterQueryBuilder::new(FilterCriteria::new(), 0);
        let (sql, params) = builder.build();
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_price_range_clause() {
        let criteria = FilterCriteria::new().price_between(250_000, 1_000_000);
        let (sql, params) = FilterQueryBuilder::new(criteria, 0).build();
        assert_eq!(sql, "price >= $1 AND price <= $2");
        assert_eq!(
            params,
            vec![QueryParam::Int64(250_000), QueryParam::Int64(1_000_000)]
        );
    }

    #[test]
    fn test_all_pushable_constraints() {
        let criteria = FilterCriteria::new()
            .price_between(100_000, 2_000_000)
            .min_bedrooms(3)
            .min_bathrooms(2.5)
            .of_type(PropertyType::Condo);
        let (sql, params) = FilterQueryBuilder::new(criteria, 0).build();
        assert_eq!(
            sql,
            "price >= $1 AND price <= $2 AND bedrooms >= $3 AND bathrooms >= $4 AND property_type = $5"
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params[4], QueryParam::String("condo".to_string()));
    }

    #[test]
    fn test_param_offset_shifts_placeholders() {
        let criteria = FilterCriteria::new().min_bedrooms(2);
        let (sql, _) = FilterQueryBuilder::new(criteria, 3).build();
        assert_eq!(sql, "bedrooms >= $4");
    }

    #[test]
    fn test_features_are_not_pushed_down() {
        let criteria = FilterCriteria::new().with_feature("Pool");
        let (sql, params) = FilterQueryBuilder::new(criteria, 0).build();
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }
}
