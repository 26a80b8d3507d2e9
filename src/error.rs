//! Application error type and its HTTP envelope.
//!
//! Every failure leaves the service as
//!
//! ```json
//! { "Status": false, "Errors": { "email": ["Enter a valid email address."] } }
//! ```
//!
//! or, for authentication failures,
//!
//! ```json
//! { "Status": false, "Error": "Log in required" }
//! ```
//!
//! Internal failures are logged and reported with a generic `Error` message;
//! their details never reach the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_governor::GovernorError;
use validator::ValidationErrors;

use crate::utils::db_error::{USERS_EMAIL_CONSTRAINT, is_unique_violation_on};
use crate::utils::validation::FieldErrors;

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Status")]
    status: bool,

    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(rename = "Errors", skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

/// Errors surfaced by services, repositories and handlers.
///
/// `details` becomes the `Errors` value of the response; when it is `null`
/// the message is used instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Rejected input or credentials (403).
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    /// Request lacks a usable token (403, `Error` key).
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Client exceeded its rate limit (429, `Error` key).
    #[error("{message}")]
    TooManyRequests { message: String, retry_after: u64 },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn too_many_requests(retry_after: u64) -> Self {
        Self::TooManyRequests {
            message: "Too many requests".to_string(),
            retry_after,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Conflict raised when an email is already registered.
    pub fn email_taken() -> Self {
        Self::conflict(
            "Email already registered",
            json!({ "email": ["A user with this email already exists."] }),
        )
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } | Self::Unauthorized { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn errors_value(message: String, details: Value) -> Value {
    if details.is_null() {
        Value::String(message)
    } else {
        details
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            Self::Validation { message, details }
            | Self::Forbidden { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details } => ErrorBody {
                status: false,
                error: None,
                errors: Some(errors_value(message, details)),
            },
            Self::Unauthorized { message } => ErrorBody {
                status: false,
                error: Some(message),
                errors: None,
            },
            Self::TooManyRequests {
                message,
                retry_after,
            } => {
                let body = ErrorBody {
                    status: false,
                    error: Some(message),
                    errors: None,
                };
                return (
                    status,
                    [(RETRY_AFTER, retry_after.to_string())],
                    Json(body),
                )
                    .into_response();
            }
            Self::Internal { message, details } => {
                tracing::error!(%message, %details, "Internal error");
                ErrorBody {
                    status: false,
                    error: Some("Internal server error".to_string()),
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on(&e, USERS_EMAIL_CONSTRAINT) {
            return Self::email_taken();
        }

        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return Self::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        match e {
            sqlx::Error::RowNotFound => Self::not_found("Record not found", Value::Null),
            other => Self::internal("Database error", json!({ "reason": other.to_string() })),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from_validation(&errors).into_bad_request()
    }
}

impl From<GovernorError> for AppError {
    fn from(error: GovernorError) -> Self {
        match error {
            GovernorError::TooManyRequests { wait_time, .. } => Self::too_many_requests(wait_time),
            other => Self::internal(
                "Rate limiter failure",
                json!({ "reason": other.to_string() }),
            ),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(
            "Malformed request body",
            json!({ "body": [rejection.body_text()] }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let err = AppError::bad_request(
            "Missing fields",
            json!({ "street": ["This field is required."] }),
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["Status"], false);
        assert_eq!(body["Errors"]["street"][0], "This field is required.");
        assert!(body.get("Error").is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_uses_error_key() {
        let response = AppError::unauthorized("Log in required").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["Status"], false);
        assert_eq!(body["Error"], "Log in required");
        assert!(body.get("Errors").is_none());
    }

    #[tokio::test]
    async fn test_null_details_fall_back_to_message() {
        let response =
            AppError::forbidden("Invalid email or password", Value::Null).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["Errors"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::internal("Database error", json!({ "reason": "secret dsn" }))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["Error"], "Internal server error");
        assert!(!body.to_string().contains("secret dsn"));
    }

    #[tokio::test]
    async fn test_rate_limit_rejection_uses_envelope() {
        let err = AppError::from(GovernorError::TooManyRequests {
            wait_time: 3,
            headers: None,
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "3");

        let body = body_json(response).await;
        assert_eq!(body["Status"], false);
        assert_eq!(body["Error"], "Too many requests");
    }

    #[tokio::test]
    async fn test_unextractable_rate_limit_key_is_internal() {
        let response = AppError::from(GovernorError::UnableToExtractKey).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["Error"], "Internal server error");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::conflict("dup", Value::Null).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_found("none", Value::Null).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
