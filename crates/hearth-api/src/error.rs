//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use hearth_core::FieldError;

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    Database(hearth_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// Form validation failed; carries per-field messages for inline display.
    Validation(Vec<FieldError>),
}

impl From<hearth_core::Error> for ApiError {
    fn from(err: hearth_core::Error) -> Self {
        match &err {
            hearth_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            hearth_core::Error::PropertyNotFound(id) => {
                ApiError::NotFound(format!("Property {} not found", id))
            }
            hearth_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            hearth_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            hearth_core::Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            hearth_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    let friendly_msg = if msg.contains("accounts_email_key") {
                        "An account with this email already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                if msg.contains("foreign key") {
                    return ApiError::BadRequest(msg);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Validation(fields) = self {
            let body = Json(serde_json::json!({
                "error": "Validation failed",
                "fields": fields,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Validation(_) => unreachable!("handled above"),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_property_not_found_maps_to_not_found() {
        let err: ApiError = hearth_core::Error::PropertyNotFound(Uuid::nil()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let err: ApiError = hearth_core::Error::InvalidInput("bad".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_unauthorized_and_forbidden_pass_through() {
        let err: ApiError = hearth_core::Error::Unauthorized("no token".to_string()).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        let err: ApiError = hearth_core::Error::Forbidden("not yours".to_string()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_storage_error_maps_to_internal() {
        let err: ApiError = hearth_core::Error::Storage("disk full".to_string()).into();
        assert!(matches!(err, ApiError::Database(_)));
    }

    #[test]
    fn test_validation_response_carries_fields() {
        let fields = vec![FieldError {
            field: "price",
            message: "Price must be positive".to_string(),
        }];
        let response = ApiError::Validation(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
