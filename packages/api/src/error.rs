// ABOUTME: API error type and its HTTP response mapping
// ABOUTME: Validation errors become a field map; server-side failures are logged and sanitized

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use usertags_core::FieldErrors;
use usertags_storage::StorageError;
use usertags_users::UserError;
use uuid::Uuid;

use crate::auth::REALM;

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(errors) => AppError::Validation(errors),
            UserError::NotFound(_) => AppError::NotFound,
            UserError::Storage(e) => AppError::Storage(e),
        }
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Storage(StorageError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// Message safe to show to clients
    fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => format!("Validation failed: {}", errors),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound => "The requested resource was not found".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::Storage(StorageError::Unavailable(_)) => {
                "Tag store is temporarily unavailable".to_string()
            }
            AppError::Storage(_) => "Data storage error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_code) = self.to_status_and_code();

        match self {
            // Field errors go back as-is: {"email": ["is not valid"]}
            AppError::Validation(errors) => {
                info!(error_code = %error_code, errors = %errors, "Validation failed");
                (status_code, Json(errors)).into_response()
            }
            // Challenge with an empty body
            AppError::Unauthorized => {
                let mut response = status_code.into_response();
                if let Ok(challenge) =
                    HeaderValue::from_str(&format!("Basic realm=\"{}\"", REALM))
                {
                    response.headers_mut().insert(WWW_AUTHENTICATE, challenge);
                }
                response
            }
            other => {
                let request_id = Uuid::new_v4().to_string();

                match &other {
                    AppError::Storage(err) => {
                        error!(
                            request_id = %request_id,
                            storage_error = %err,
                            "Storage system error"
                        );
                    }
                    _ => {
                        info!(
                            request_id = %request_id,
                            error_code = %error_code,
                            error = %other,
                            "API error response"
                        );
                    }
                }

                let error_response = ErrorResponse {
                    success: false,
                    error: ErrorDetail {
                        code: error_code.to_string(),
                        message: other.to_user_message(),
                    },
                    request_id,
                };

                (status_code, Json(error_response)).into_response()
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use usertags_core::MSG_INVALID;

    #[test]
    fn test_validation_error_status() {
        let error = AppError::Validation(FieldErrors::single("email", MSG_INVALID));
        let (status, code) = error.to_status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_user_errors_map_onto_api_errors() {
        assert!(matches!(
            AppError::from(UserError::NotFound(3)),
            AppError::NotFound
        ));
        assert!(matches!(
            AppError::from(UserError::Storage(StorageError::unavailable("down"))),
            AppError::Storage(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn test_unavailable_store_is_503() {
        let error = AppError::Storage(StorageError::unavailable("connection refused"));
        let (status, code) = error.to_status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "STORE_UNAVAILABLE");
    }

    #[test]
    fn test_user_message_sanitization() {
        let error = AppError::Storage(StorageError::Database(
            "disk I/O error at /secret/path".to_string(),
        ));
        let message = error.to_user_message();
        assert_eq!(message, "Data storage error");
        assert!(!message.contains("/secret/path"));
    }

    #[test]
    fn test_unauthorized_response_has_challenge_and_empty_body() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"usertags\""
        );
    }
}
