use crate::api::registry::{Registry, RegistryStats};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Registry totals and the latest signup time.", body = RegistryStats),
    ),
    tag = "health"
)]
// axum handler for stats
#[instrument(skip(registry))]
pub async fn stats(registry: Extension<Registry>) -> impl IntoResponse {
    (StatusCode::OK, Json(registry.stats()))
}
