use crate::api::{
    handlers::{is_present, ApiMessage},
    registry::{Registry, RegistryError},
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    name: Option<String>,
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/signup",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Signup successful", body = ApiMessage, content_type = "application/json"),
        (status = 400, description = "Missing email or password", body = ApiMessage),
        (status = 409, description = "User with the specified email already exists", body = ApiMessage),
    ),
    tag= "users"
)]
// axum handler for signup
#[instrument(skip(registry))]
pub async fn signup(
    registry: Extension<Registry>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let user: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::new("Missing payload")),
            )
        }
    };

    debug!("Signup attempt: {}", user.email);

    if !is_present(&user.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::new("Missing email")),
        );
    }

    if !is_present(&user.password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::new("Missing password")),
        );
    }

    match registry.create(&user.email, user.name.clone(), &user.password) {
        Ok(()) => {
            debug!("User signed up: {}", user.email);

            (
                StatusCode::CREATED,
                Json(ApiMessage::new("Signup successful")),
            )
        }

        Err(RegistryError::AlreadyExists) => {
            warn!("Signup failed: user already exists: {}", user.email);

            (
                StatusCode::CONFLICT,
                Json(ApiMessage::new("User already exists")),
            )
        }

        Err(err) => {
            error!("Signup failed: {err}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::new("Signup failed")),
            )
        }
    }
}
