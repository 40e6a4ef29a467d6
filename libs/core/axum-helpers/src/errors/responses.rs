//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred",
        "timestamp": "2024-01-05 12:30:00"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "timestamp": "2024-01-05 12:30:00",
        "details": {
            "uri": [{
                "code": "not_blank",
                "message": "must not be blank",
                "params": {"value": " "}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid time range or query string",
    content_type = "application/json",
    example = json!({
        "code": 1010,
        "error": "INVALID_RANGE",
        "message": "start 2024-01-02 00:00:00 must be before end 2024-01-01 00:00:00",
        "timestamp": "2024-01-05 12:30:00"
    })
)]
pub struct BadRequestQueryResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable - database connection could not be acquired",
    content_type = "application/json",
    example = json!({
        "code": 2013,
        "error": "DATABASE_CONNECTION",
        "message": "Database connection unavailable",
        "timestamp": "2024-01-05 12:30:00"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
