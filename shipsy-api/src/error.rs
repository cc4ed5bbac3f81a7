/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; domain errors from
/// `shipsy-shared` convert into it with `?`.
///
/// # Response format
///
/// ```json
/// {
///   "error": "validation_error",
///   "message": "Request validation failed",
///   "details": [{ "field": "weightKg", "message": "weightKg is required" }]
/// }
/// ```
///
/// Storage and internal failures are logged server side and reported to
/// clients with a generic message only.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shipsy_shared::{
    auth::service::AuthServiceError, shipments::ShipmentError, validation::FieldViolation,
};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate username
    Conflict(String),

    /// Unprocessable entity (422), validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl From<FieldViolation> for ValidationErrorDetail {
    fn from(violation: FieldViolation) -> Self {
        Self {
            field: violation.field,
            message: violation.message,
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

fn details(violations: Vec<FieldViolation>) -> Vec<ValidationErrorDetail> {
    violations.into_iter().map(ValidationErrorDetail::from).collect()
}

/// Convert request body rejections to API errors
///
/// Bodies that parse but do not fit the target type (wrong field type,
/// unknown status) are reported as validation errors; everything else is a
/// bad request.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message,
            }]),
            _ => ApiError::BadRequest(message),
        }
    }
}

/// Convert auth service errors to API errors
impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Validation(violations) => ApiError::ValidationError(details(violations)),
            AuthServiceError::DuplicateUsername => {
                ApiError::Conflict("Username already exists".to_string())
            }
            AuthServiceError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            AuthServiceError::Unauthenticated => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthServiceError::NotFound => ApiError::NotFound("User not found".to_string()),
            AuthServiceError::Storage(e) => ApiError::InternalError(format!("Storage error: {}", e)),
            AuthServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert shipment errors to API errors
impl From<ShipmentError> for ApiError {
    fn from(err: ShipmentError) -> Self {
        match err {
            ShipmentError::Validation(violations) => ApiError::ValidationError(details(violations)),
            ShipmentError::NotFound => ApiError::NotFound("Shipment not found".to_string()),
            ShipmentError::Storage(e) => ApiError::InternalError(format!("Storage error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipsy_shared::store::StoreError;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Shipment not found".to_string());
        assert_eq!(err.to_string(), "Not found: Shipment not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "weightKg".to_string(),
                message: "weightKg is required".to_string(),
            },
            ValidationErrorDetail {
                field: "baseRate".to_string(),
                message: "baseRate must be non-negative".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (ApiError::from(AuthServiceError::DuplicateUsername), StatusCode::CONFLICT),
            (ApiError::from(AuthServiceError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthServiceError::Unauthenticated), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthServiceError::NotFound), StatusCode::NOT_FOUND),
            (ApiError::from(ShipmentError::NotFound), StatusCode::NOT_FOUND),
            (
                ApiError::from(ShipmentError::Validation(vec![FieldViolation::new("weightKg", "required")])),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(ShipmentError::Storage(StoreError::Backend("down".to_string()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_storage_details_not_exposed() {
        let err = ApiError::from(ShipmentError::Storage(StoreError::Backend(
            "password authentication failed for user shipsy".to_string(),
        )));

        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body.error, "internal_error");
        assert_eq!(body.message, "An internal error occurred");
        assert!(body.details.is_none());
    }
}
