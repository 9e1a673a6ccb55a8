//! hearth-api - HTTP API server for hearth property listings

mod error;
mod handlers;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use hearth_core::{defaults, AuthPrincipal};
use hearth_db::{Database, FilesystemBackend, ListingService, PoolConfig, PublicUrlResolver};

use error::ApiError;
use handlers::{auth, map, profiles, properties};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    /// Listing read service composing properties with their image URLs.
    listings: ListingService,
    /// Blob store for uploaded listing photos.
    storage: Arc<FilesystemBackend>,
    /// Global rate limiter (None if rate limiting is disabled).
    rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

// =============================================================================
// STANDARD RESPONSE TYPES
// =============================================================================

/// Standardized pagination metadata for list responses.
#[derive(Serialize, Deserialize, Debug)]
pub struct PaginationMeta {
    /// Total number of items matching the query (across all pages)
    pub total: usize,
    /// Maximum number of items per page (request parameter)
    pub limit: usize,
    /// Number of items skipped (request parameter)
    pub offset: usize,
    /// True if more items are available after this page
    pub has_more: bool,
}

/// Standardized list response wrapper with pagination metadata.
///
/// All list endpoints return this structure for consistency.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    /// The list of items for the current page
    pub data: Vec<T>,
    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T: Serialize> ListResponse<T> {
    /// Create a new paginated list response.
    ///
    /// Automatically calculates `has_more` from offset, page length, and total.
    pub fn new(data: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        let has_more = offset + data.len() < total;
        Self {
            data,
            pagination: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        }
    }
}

// =============================================================================
// CORS CONFIGURATION HELPER
// =============================================================================

/// Parse allowed origins from comma-separated environment variable.
///
/// # Environment Variable
/// `ALLOWED_ORIGINS` - Comma-separated list of allowed origins
///
/// # Default Origins
/// If not set or empty:
/// - http://localhost:5173 (Vite dev server)
/// - http://localhost:3000
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://localhost:3000"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// The path prefix to serve blobs under, when `base_url` is a same-origin
/// path rather than a full URL (external CDN or static server).
fn local_serve_prefix(base_url: &str) -> Option<&str> {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.starts_with('/') && !trimmed.starts_with("//") && trimmed.len() > 1 {
        Some(trimmed)
    } else {
        None
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "hearth_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hearth_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("hearth-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/hearth".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Rate limiting configuration
    // RATE_LIMIT_REQUESTS: requests per period (default: 100)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60 = 1 minute)
    let rate_limit_requests: u64 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .unwrap_or(60);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        rate_limit_requests,
        rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect_with_config(&database_url, PoolConfig::from_env()).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Initialize image storage
    let storage_path =
        std::env::var("STORAGE_PATH").unwrap_or_else(|_| "/var/lib/hearth/images".to_string());
    let storage = FilesystemBackend::new(&storage_path);
    storage
        .validate()
        .await
        .map_err(|e| anyhow::anyhow!("image storage validation failed: {}", e))?;
    info!("Image storage initialized at {}", storage_path);

    // Public URL prefix under which stored images are served
    let public_base_url =
        std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "/images".to_string());
    let listings = db.listing_service(PublicUrlResolver::new(&public_base_url));

    // Optionally seed the sample listing set on an empty database
    let seed_enabled = std::env::var("SEED_SAMPLE_DATA")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if seed_enabled {
        let inserted = db.seed_sample_listings().await?;
        if inserted > 0 {
            info!("Seeded {} sample listings", inserted);
        }
    }

    // Periodically evict expired sessions
    {
        let purge_db = db.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match purge_db.auth.purge_expired_sessions().await {
                    Ok(n) if n > 0 => info!("Purged {} expired sessions", n),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Session purge failed: {}", e),
                }
            }
        });
    }

    // Create rate limiter if enabled
    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .and_then(|q| NonZeroU32::new(rate_limit_requests as u32).map(|n| q.allow_burst(n)))
            .ok_or_else(|| anyhow::anyhow!("rate limit period and request count must be non-zero"))?;
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    // Create app state
    let state = AppState {
        db,
        listings,
        storage: Arc::new(storage),
        rate_limiter,
    };

    // Build router
    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/signin", post(auth::signin))
        .route("/api/v1/auth/signout", post(auth::signout))
        .route("/api/v1/auth/session", get(auth::session))
        // Property listings
        .route(
            "/api/v1/properties",
            get(properties::list_properties).post(properties::create_property),
        )
        .route(
            "/api/v1/properties/:id",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route(
            "/api/v1/properties/:id/images",
            post(properties::upload_images),
        )
        .route("/api/v1/my/properties", get(properties::my_properties))
        // Amenity tags for the filter panel
        .route("/api/v1/features", get(properties::list_features))
        // Map markers
        .route("/api/v1/map/markers", get(map::markers))
        // Profile
        .route(
            "/api/v1/profile",
            get(profiles::get_profile).put(profiles::update_profile),
        );

    // Serve stored photos directly when PUBLIC_BASE_URL is a same-origin
    // path; a full URL means an external CDN or static server fronts them.
    if let Some(prefix) = local_serve_prefix(&public_base_url) {
        info!("Serving stored images at {}", prefix);
        app = app.nest_service(prefix, ServeDir::new(&storage_path));
    }

    let app = app
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        })
        // Photo uploads are the largest request bodies this server accepts
        .layer(RequestBodyLimitLayer::new(defaults::MAX_UPLOAD_BYTES))
        .layer(DefaultBodyLimit::max(defaults::MAX_UPLOAD_BYTES))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// AUTHENTICATION EXTRACTORS
// =============================================================================

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Extractor for optionally-authenticated requests.
///
/// Validates the Bearer session token when one is presented and resolves it
/// to a principal. Requests without a token (or with an invalid or expired
/// one) resolve to `Anonymous` rather than failing, so public endpoints can
/// still personalize when a session happens to be present.
#[derive(Debug, Clone)]
pub struct Auth {
    pub principal: AuthPrincipal,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let principal = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                let token = header.trim_start_matches("Bearer ").trim();

                if token.starts_with(defaults::SESSION_TOKEN_PREFIX) {
                    // Validation extends the sliding expiry window
                    match state.db.auth.validate_session(token).await {
                        Ok(Some(account_id)) => AuthPrincipal::Session { account_id },
                        _ => AuthPrincipal::Anonymous,
                    }
                } else {
                    // Unknown token format
                    AuthPrincipal::Anonymous
                }
            }
            _ => AuthPrincipal::Anonymous,
        };

        Ok(Auth { principal })
    }
}

/// Extractor that requires authentication.
///
/// Use this for endpoints that must have a valid session.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    pub account_id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = Auth::from_request_parts(parts, state).await?;

        match auth.principal.account_id() {
            Some(account_id) => Ok(RequireAuth { account_id }),
            None => Err(ApiError::Unauthorized(
                "Authentication required".to_string(),
            )),
        }
    }
}

// =============================================================================
// RATE LIMITING MIDDLEWARE
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    // If rate limiting is disabled, pass through
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!("Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "rate_limit_exceeded",
                    "error_description": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_uuidv7() {
        let mut maker = MakeRequestUuidV7;
        let req = axum::http::Request::new(());
        let id = maker.make_request_id(&req).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn test_list_response_has_more() {
        let page = ListResponse::new(vec![1, 2, 3], 10, 3, 0);
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.total, 10);

        let last_page = ListResponse::new(vec![10], 10, 3, 9);
        assert!(!last_page.pagination.has_more);
    }

    #[test]
    fn test_local_serve_prefix() {
        assert_eq!(local_serve_prefix("/images"), Some("/images"));
        assert_eq!(local_serve_prefix("/images/"), Some("/images"));
        assert_eq!(local_serve_prefix("https://cdn.example.com/images"), None);
        assert_eq!(local_serve_prefix("//cdn.example.com/images"), None);
        assert_eq!(local_serve_prefix("/"), None);
    }

    #[test]
    fn test_list_response_empty() {
        let empty: ListResponse<i32> = ListResponse::new(vec![], 0, 50, 0);
        assert!(!empty.pagination.has_more);
        assert_eq!(empty.data.len(), 0);
    }
}
