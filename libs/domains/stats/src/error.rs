use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use chrono::NaiveDateTime;
use sea_orm::DbErr;
use thiserror::Error;

use crate::models::TIMESTAMP_FORMAT;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("start {} must be before end {}", .start.format(TIMESTAMP_FORMAT), .end.format(TIMESTAMP_FORMAT))]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Convert StatsError to AppError for standardized error responses
impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            err @ StatsError::InvalidRange { .. } => AppError::InvalidRange(err.to_string()),
            StatsError::Validation(msg) => AppError::BadRequest(msg),
            StatsError::Database(e) => AppError::Database(e),
            StatsError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_invalid_range_message_uses_wire_format() {
        let err = StatsError::InvalidRange {
            start: at(11),
            end: at(9),
        };
        assert_eq!(
            err.to_string(),
            "start 2024-01-01 11:00:00 must be before end 2024-01-01 09:00:00"
        );
    }

    #[test]
    fn test_status_codes() {
        let invalid = StatsError::InvalidRange {
            start: at(1),
            end: at(1),
        };
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            StatsError::Validation("uri".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StatsError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StatsError::Database(DbErr::Custom("hits table missing".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
