use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    observability::init_metrics()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus recorder: {}", e))?;
    observability::StatsMetrics::set_known_apps(config.metric_apps.iter().cloned());

    let db = match &config.database {
        Some(database) => {
            let db = connect_from_config_with_retry(database.clone(), config.retry.clone())
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            run_migrations::<migration::Migrator>(&db, config.app.name).await?;
            Some(db)
        }
        None => {
            warn!("Using in-memory hit storage; hits are lost on restart");
            None
        }
    };

    let state = AppState { config, db };

    // - /hit, /stats: the stats API
    // - /health: liveness with app name/version
    // - /ready: readiness with a database ping
    // - /metrics: Prometheus exposition
    let app = api::app_router(&state)?;

    info!(
        storage = ?state.config.storage,
        "Starting stats server with graceful shutdown (30s timeout)"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Stats server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use core_config::{AppInfo, Environment, server::ServerConfig};
    use database::RetryConfig;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn memory_app() -> Router {
        let state = AppState {
            config: Config {
                app: AppInfo {
                    name: "stats_server",
                    version: "0.1.0",
                },
                server: ServerConfig::default(),
                environment: Environment::Development,
                storage: config::StorageBackend::Memory,
                database: None,
                retry: RetryConfig::default(),
                metric_apps: Vec::new(),
            },
            db: None,
        };

        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || api::app_router(&state).unwrap())
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health_and_ready_with_memory_storage() {
        let (status, body) = call(
            memory_app(),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = call(
            memory_app(),
            Request::builder().uri("/ready").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_health_ready_metrics_carry_shared_middleware() {
        for uri in ["/health", "/ready", "/metrics"] {
            let response = memory_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(
                response.headers()["x-content-type-options"],
                "nosniff",
                "{uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_hit_then_stats_through_full_router() {
        let app = memory_app();

        let (status, _) = call(
            app.clone(),
            Request::builder()
                .method("POST")
                .uri("/hit")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"app":"ewm-main-service","uri":"/events/1","ip":"10.0.0.1","timestamp":"2024-01-01 10:00:00"}"#,
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            app,
            Request::builder()
                .uri("/stats?start=2024-01-01+09:00:00&end=2024-01-01+11:00:00&uris=/events/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["hits"], 1);
        assert_eq!(body[0]["uri"], "/events/1");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let (status, body) = call(
            memory_app(),
            Request::builder().uri("/api/stats").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }
}
