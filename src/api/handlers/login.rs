use crate::{
    api::{handlers::ApiMessage, registry::Registry},
    cli::globals::GlobalArgs,
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = ApiMessage, content_type = "application/json"),
        (status = 401, description = "Invalid credentials", body = ApiMessage),
    ),
    tag= "users"
)]
// axum handler for login
#[instrument(skip(registry, globals))]
pub async fn login(
    registry: Extension<Registry>,
    globals: Extension<GlobalArgs>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let user: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiMessage::new("Invalid credentials")),
            )
        }
    };

    debug!("Login attempt: {}", user.email);

    match registry.authenticate(&user.email, &user.password) {
        Ok(_) => {
            debug!("Login successful: {}", user.email);

            // The startup secret is echoed verbatim into the response body,
            // kept for parity with the clients of this service.
            (
                StatusCode::OK,
                Json(ApiMessage::new(format!(
                    "Logged in with the secret: {}",
                    globals.secret_key.expose_secret()
                ))),
            )
        }

        Err(err) => {
            error!("Login failed for user: {}: {err}", user.email);

            (
                StatusCode::UNAUTHORIZED,
                Json(ApiMessage::new("Invalid credentials")),
            )
        }
    }
}
