use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    MultiQuery, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use tracing::instrument;
use utoipa::OpenApi;

use crate::error::StatsResult;
use crate::models::{Hit, NewHit, StatsQuery, ViewStats};
use crate::repository::HitRepository;
use crate::service::StatsService;

pub const TAG: &str = "stats";

/// OpenAPI documentation for the stats API
#[derive(OpenApi)]
#[openapi(
    paths(record_hit, get_stats),
    components(
        schemas(Hit, NewHit, ViewStats),
        responses(
            BadRequestValidationResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = TAG, description = "Hit recording and view statistics")
    )
)]
pub struct ApiDoc;

/// Create the stats router: `POST /hit` and `GET /stats`
pub fn router<R: HitRepository + 'static>(service: StatsService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/hit", post(record_hit))
        .route("/stats", get(get_stats))
        .with_state(shared_service)
}

/// Record one hit
#[utoipa::path(
    post,
    path = "/hit",
    tag = TAG,
    request_body = NewHit,
    responses(
        (status = 201, description = "Hit recorded", body = Hit),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
#[instrument(skip_all, fields(app = %input.app, uri = %input.uri))]
async fn record_hit<R: HitRepository>(
    State(service): State<Arc<StatsService<R>>>,
    ValidatedJson(input): ValidatedJson<NewHit>,
) -> StatsResult<impl IntoResponse> {
    let hit = service.record_hit(input).await?;
    Ok((StatusCode::CREATED, Json(hit)))
}

/// Hit counts per `(app, uri)`, most viewed first
#[utoipa::path(
    get,
    path = "/stats",
    tag = TAG,
    params(StatsQuery),
    responses(
        (status = 200, description = "Counts ordered by hits descending", body = Vec<ViewStats>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
#[instrument(skip_all, fields(unique = query.unique, uris = query.uris.len()))]
async fn get_stats<R: HitRepository>(
    State(service): State<Arc<StatsService<R>>>,
    MultiQuery(query): MultiQuery<StatsQuery>,
) -> StatsResult<Json<Vec<ViewStats>>> {
    let stats = service.get_stats(query).await?;
    Ok(Json(stats))
}
