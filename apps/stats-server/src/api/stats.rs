use axum::Router;
use domain_stats::{InMemoryHitRepository, PgHitRepository, StatsService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    match &state.db {
        Some(db) => handlers::router(StatsService::new(PgHitRepository::new(db.clone()))),
        None => handlers::router(StatsService::new(InMemoryHitRepository::new())),
    }
}
