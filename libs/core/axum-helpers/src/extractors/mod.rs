//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with [`crate::AppError`], so failures render the
//! same structured body as every other error.

pub mod multi_query;
pub mod validated_json;

pub use multi_query::MultiQuery;
pub use validated_json::ValidatedJson;
