//! HTTP client for the stats service.
//!
//! Other services push hits and pull view counts through [`StatsClient`]:
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use stats_client::{StatsClient, StatsClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StatsClient::new(StatsClientConfig::from_env()?)?;
//!
//! let now = chrono::Local::now().naive_local();
//! client.add_hit("ewm-main-service", "/events/1", "192.163.0.1", now).await?;
//!
//! let views = client
//!     .entity_views("ewm-main-service", "/events", &[1, 2], now - chrono::Duration::days(1), now, true)
//!     .await?;
//! assert_eq!(views.len(), 2);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::StatsClient;
pub use config::StatsClientConfig;
pub use domain_stats::{Hit, ViewStats};
pub use error::{ClientError, ClientResult};
