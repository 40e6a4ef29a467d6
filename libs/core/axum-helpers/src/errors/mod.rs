pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Layout of [`ErrorResponse::timestamp`], identical to the wire format of hit timestamps.
pub const ERROR_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Standard error response structure.
///
/// Returned for every error produced by the service:
/// - `code`: Integer error code for logging/monitoring (e.g., 1010)
/// - `error`: Machine-readable error kind (e.g., "INVALID_RANGE")
/// - `message`: Human-readable error message
/// - `timestamp`: When the error was produced, `yyyy-MM-dd HH:mm:ss`
/// - `details`: Optional additional error details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1010,
///   "error": "INVALID_RANGE",
///   "message": "start 2024-01-02 00:00:00 must be before end 2024-01-01 00:00:00",
///   "timestamp": "2024-01-05 12:30:00",
///   "details": null
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Local time the error was produced
    #[schema(example = "2024-01-05 12:30:00")]
    pub timestamp: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            timestamp: chrono::Local::now()
                .format(ERROR_TIMESTAMP_FORMAT)
                .to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query string error: {0}")]
    QueryRejection(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Database(e) => map_db_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                // Body shape problems are caller errors; only a wrong content type keeps its own status.
                let status = match e.status() {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::QueryRejection(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidQuery.code(), "Query rejected: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery, msg, None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::InvalidRange(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidRange.code(), "Invalid range: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidRange, msg, None)
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    msg,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse::new(code, message).with_details(details));

        (status, body).into_response()
    }
}

/// Maps DbErr to response components. Internals of the failure are logged, never returned.
fn map_db_error(error: &DbErr) -> (StatusCode, ErrorCode, String, Option<Value>) {
    let (status, code) = match error {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            tracing::error!(
                error_code = ErrorCode::DatabaseConnection.code(),
                "Database connection error: {:?}",
                error
            );
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DatabaseConnection)
        }
        DbErr::Exec(_) | DbErr::Query(_) => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                error
            );
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError)
        }
        _ => {
            tracing::error!(
                error_code = ErrorCode::DatabaseUnhandled.code(),
                "Unhandled database error: {:?}",
                error
            );
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseUnhandled)
        }
    };

    (status, code, code.default_message().to_string(), None)
}

/// Field name -> list of `{code, message, params}` for every failed rule.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_messages: Vec<Value> = errors
                .iter()
                .map(|err| {
                    json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), json!(error_messages))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(details)
}
