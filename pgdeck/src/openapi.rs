//! OpenAPI documentation, served at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::logout,
        crate::api::handlers::auth::me,
        crate::api::handlers::auth::update_profile,
        crate::api::handlers::projects::list_projects,
        crate::api::handlers::projects::get_project,
        crate::api::handlers::projects::create_project,
        crate::api::handlers::projects::update_project,
        crate::api::handlers::projects::delete_project,
        crate::api::handlers::db_connections::upsert_connection,
        crate::api::handlers::db_connections::test_connection,
    ),
    components(schemas(
        crate::api::models::MessageResponse,
        crate::api::models::auth::RegisterRequest,
        crate::api::models::auth::LoginRequest,
        crate::api::models::auth::UpdateProfileRequest,
        crate::api::models::auth::AuthResponse,
        crate::api::models::users::UserResponse,
        crate::api::models::users::UserEnvelope,
        crate::api::models::projects::ProjectCreateRequest,
        crate::api::models::projects::ProjectUpdateRequest,
        crate::api::models::projects::ProjectResponse,
        crate::api::models::projects::ProjectEnvelope,
        crate::api::models::projects::ProjectListResponse,
        crate::api::models::db_connections::UpsertConnectionRequest,
        crate::api::models::db_connections::ConnectionTestResponse,
        crate::db::models::users::AuthProvider,
        crate::db::models::users::UserStatus,
        crate::db::models::users::UserRole,
        crate::errors::ErrorEnvelope,
        crate::errors::FieldDetail,
    )),
    tags(
        (name = "user", description = "Registration, login, and profile"),
        (name = "project", description = "Project ownership and CRUD"),
        (name = "db-connection", description = "Per-project external database connections"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_covers_the_http_surface() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/user/register",
            "/user/login",
            "/user/logout",
            "/user/me",
            "/user/me/update",
            "/project",
            "/project/{project_id}",
            "/project/{project_id}/db-connection",
            "/project/{project_id}/db-connection/test",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }
}
