//! Default values shared across crates.

/// URL substituted when a listing has no uploaded images.
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.svg";

/// Default inclusive price bounds offered by the filter panel.
pub const DEFAULT_MIN_PRICE: i64 = 250_000;
/// See [`DEFAULT_MIN_PRICE`].
pub const DEFAULT_MAX_PRICE: i64 = 1_000_000;

/// Session lifetime; extended on each authenticated request (sliding window).
pub const SESSION_TTL_DAYS: i64 = 30;

/// Prefix for issued bearer tokens.
pub const SESSION_TOKEN_PREFIX: &str = "hv_tok_";

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Hard ceiling on requested page size.
pub const MAX_PAGE_LIMIT: usize = 200;

/// Maximum accepted size for a single image upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_bounds_ordered() {
        assert!(DEFAULT_MIN_PRICE < DEFAULT_MAX_PRICE);
    }

    #[test]
    fn test_page_limits_ordered() {
        assert!(DEFAULT_PAGE_LIMIT <= MAX_PAGE_LIMIT);
    }
}
