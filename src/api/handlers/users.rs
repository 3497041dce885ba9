//! User management endpoints.
//!
//! The path parameter is the user's email, the registry's unique key. Every
//! response body goes through the public view, so passwords never leave the
//! registry.

use crate::api::{
    handlers::{is_present, ApiMessage},
    registry::{PublicUser, Registry},
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PasswordUpdateRequest {
    password: String,
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Every registered user, oldest first.", body = [PublicUser]),
    ),
    tag = "users"
)]
#[instrument(skip(registry))]
pub async fn list_users(registry: Extension<Registry>) -> impl IntoResponse {
    (StatusCode::OK, Json(registry.list()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User detail.", body = PublicUser),
        (status = 404, description = "User not found.", body = ApiMessage),
    ),
    tag = "users"
)]
#[instrument(skip(registry))]
pub async fn get_user(Path(id): Path<String>, registry: Extension<Registry>) -> Response {
    match registry.get(&id) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(_) => not_found(),
    }
}

#[utoipa::path(
    put,
    path = "/users/{id}/password",
    params(
        ("id" = String, Path, description = "User email")
    ),
    request_body = PasswordUpdateRequest,
    responses(
        (status = 200, description = "Password updated.", body = ApiMessage),
        (status = 400, description = "Missing password.", body = ApiMessage),
        (status = 404, description = "User not found.", body = ApiMessage),
    ),
    tag = "users"
)]
#[instrument(skip(registry, payload))]
pub async fn update_password(
    Path(id): Path<String>,
    registry: Extension<Registry>,
    payload: Option<Json<PasswordUpdateRequest>>,
) -> Response {
    let update: PasswordUpdateRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::new("Missing payload")),
            )
                .into_response()
        }
    };

    if !is_present(&update.password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::new("Missing password")),
        )
            .into_response();
    }

    match registry.update_password(&id, &update.password) {
        Ok(()) => {
            debug!("Password updated: {}", id);

            (
                StatusCode::OK,
                Json(ApiMessage::new("Password updated successfully")),
            )
                .into_response()
        }
        Err(_) => not_found(),
    }
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User deleted.", body = ApiMessage),
        (status = 404, description = "User not found.", body = ApiMessage),
    ),
    tag = "users"
)]
#[instrument(skip(registry))]
pub async fn delete_user(Path(id): Path<String>, registry: Extension<Registry>) -> Response {
    match registry.delete(&id) {
        Ok(()) => {
            debug!("User deleted: {}", id);

            (
                StatusCode::OK,
                Json(ApiMessage::new("User deleted successfully")),
            )
                .into_response()
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiMessage::new("User not found")),
    )
        .into_response()
}
