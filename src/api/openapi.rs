use crate::api::{
    handlers::{self, ApiMessage},
    registry::{PublicUser, RegistryStats},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::signup::signup,
        handlers::login::login,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_password,
        handlers::users::delete_user,
        handlers::stats::stats,
    ),
    components(schemas(
        ApiMessage,
        PublicUser,
        RegistryStats,
        handlers::health::Health,
        handlers::signup::SignupRequest,
        handlers::login::LoginRequest,
        handlers::users::PasswordUpdateRequest,
    )),
    tags(
        (name = "users", description = "Signup, login and user management"),
        (name = "health", description = "Service health and registry stats"),
    )
)]
struct ApiDoc;

/// The OpenAPI document for the whole HTTP surface.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
