use utoipa::{Modify, OpenApi};

/// Pulls the stats domain's paths and schemas into the service document.
struct StatsPaths;

impl Modify for StatsPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_stats::ApiDoc::openapi());
    }
}

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Stats Service API",
        version = "0.1.0",
        description = "Records URI hits and serves unique or total view counts per app and URI"
    ),
    modifiers(&StatsPaths)
)]
pub struct ApiDoc;
