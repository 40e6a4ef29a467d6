//! Stats Domain
//!
//! Records URI hits and aggregates them into per-`(app, uri)` view counts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /hit, GET /stats
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, range checks, metrics
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Append + aggregate (in-memory, PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Hit, NewHit, StatsQuery, ViewStats
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_stats::{
//!     handlers,
//!     repository::InMemoryHitRepository,
//!     service::StatsService,
//! };
//!
//! let repository = InMemoryHitRepository::new();
//! let service = StatsService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{StatsError, StatsResult};
pub use handlers::ApiDoc;
pub use models::{Hit, NewHit, StatsQuery, TIMESTAMP_FORMAT, ViewStats};
pub use postgres::PgHitRepository;
pub use repository::{HitRepository, InMemoryHitRepository};
pub use service::StatsService;
