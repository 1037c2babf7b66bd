//! Handlers for registration, login, and the current-user profile.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{
        auth::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, SessionResponse, UpdateProfileRequest},
        users::{CurrentUser, UserEnvelope},
    },
    auth::{password, session},
    config::Config,
    db::{
        handlers::{Repository as _, Users},
        models::users::{AuthProvider, UserCreateDBRequest, UserRole, UserStatus, UserUpdateDBRequest, normalize_email},
    },
    errors::Error,
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/user/register",
    request_body = RegisterRequest,
    tag = "user",
    responses(
        (status = 201, description = "Account created, session established", body = AuthResponse),
        (status = 400, description = "Invalid input or email already in use"),
        (status = 409, description = "Concurrent registration with the same email"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<SessionResponse, Error> {
    let details = request.validate(&state.config.auth.password);
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let email = normalize_email(&request.email);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut users = Users::new(&mut tx);

    if users.get_user_by_email(&email).await?.is_some() {
        return Err(Error::BadRequest {
            message: "Email already in use".to_string(),
        });
    }

    // Hash on a blocking thread to keep the async runtime responsive
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    // Email verification is not implemented, so accounts activate immediately
    let created = users
        .create(&UserCreateDBRequest {
            email,
            password_hash: Some(password_hash),
            provider: AuthProvider::Local,
            status: UserStatus::Active,
            role: UserRole::User,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    let token = session::create_session_token(created.id, &state.config)?;
    let cookie = session_cookie(&token, &state.config);

    Ok(SessionResponse {
        auth: AuthResponse {
            user: created.into(),
            access_token: token,
        },
        cookie,
    })
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    tag = "user",
    responses(
        (status = 201, description = "Session established", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<SessionResponse, Error> {
    let details = request.validate();
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let email = normalize_email(&request.email);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut users = Users::new(&mut conn);

    let user = users.get_user_by_email(&email).await?.ok_or_else(invalid_credentials)?;

    // OAuth-only accounts have no hash; a banned account is deliberately
    // indistinguishable from bad credentials.
    let password_hash = user.password_hash.clone().ok_or_else(invalid_credentials)?;
    if user.status == UserStatus::Banned {
        return Err(invalid_credentials());
    }

    let password = request.password.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &password_hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(invalid_credentials());
    }

    let token = session::create_session_token(user.id, &state.config)?;
    let cookie = session_cookie(&token, &state.config);

    Ok(SessionResponse {
        auth: AuthResponse {
            user: user.into(),
            access_token: token,
        },
        cookie,
    })
}

/// Log out (clear the session cookie)
#[utoipa::path(
    post,
    path = "/user/logout",
    tag = "user",
    responses(
        (status = 200, description = "Session cleared", body = crate::api::models::MessageResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, _user: CurrentUser) -> LogoutResponse {
    LogoutResponse {
        cookie: clear_session_cookie(&state.config),
    }
}

/// The authenticated user's profile
#[utoipa::path(
    get,
    path = "/user/me",
    tag = "user",
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> Result<Json<UserEnvelope>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut users = Users::new(&mut conn);

    let record = users
        .get_by_id(user.id)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    Ok(Json(UserEnvelope { user: record.into() }))
}

/// Update the authenticated user's email and/or password
#[utoipa::path(
    patch,
    path = "/user/me/update",
    request_body = UpdateProfileRequest,
    tag = "user",
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserEnvelope>, Error> {
    let details = request.validate(&state.config.auth.password);
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut users = Users::new(&mut tx);

    let record = users
        .get_by_id(user.id)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    let mut update = UserUpdateDBRequest::default();

    if let Some(raw_email) = &request.email {
        let email = normalize_email(raw_email);
        if email != record.email {
            if users.get_user_by_email(&email).await?.is_some() {
                return Err(Error::BadRequest {
                    message: "Email already in use".to_string(),
                });
            }
            update.email = Some(email);
        }
    }

    if request.current_password.is_some() || request.new_password.is_some() {
        let (Some(current), Some(new)) = (request.current_password.clone(), request.new_password.clone()) else {
            return Err(Error::BadRequest {
                message: "Both currentPassword and newPassword are required.".to_string(),
            });
        };

        let Some(hash) = record.password_hash.clone() else {
            return Err(Error::BadRequest {
                message: "Password cannot be changed for this account.".to_string(),
            });
        };

        let current_for_verify = current.clone();
        let current_ok = tokio::task::spawn_blocking(move || password::verify_string(&current_for_verify, &hash))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password verification task: {e}"),
            })??;

        if !current_ok {
            return Err(Error::BadRequest {
                message: "Current password is incorrect.".to_string(),
            });
        }
        if new == current {
            return Err(Error::BadRequest {
                message: "New password must differ from the current password.".to_string(),
            });
        }

        let new_hash = tokio::task::spawn_blocking(move || password::hash_string(&new))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password hashing task: {e}"),
            })??;
        update.password_hash = Some(new_hash);
    }

    let updated = if update.email.is_some() || update.password_hash.is_some() {
        users.update(user.id, &update).await?
    } else {
        record
    };

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(UserEnvelope { user: updated.into() }))
}

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid credentials.".to_string()),
    }
}

/// Build the Set-Cookie value establishing a session. Secure and
/// SameSite=Strict are production-only so local development over plain HTTP
/// keeps working.
pub(crate) fn session_cookie(token: &str, config: &Config) -> String {
    let session = &config.auth.session;
    let max_age = session.timeout.as_secs();

    if config.production {
        format!(
            "{}={}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={}",
            session.cookie_name, token, max_age
        )
    } else {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            session.cookie_name, token, max_age
        )
    }
}

/// Build the Set-Cookie value clearing the session.
pub(crate) fn clear_session_cookie(config: &Config) -> String {
    let session = &config.auth.session;

    if config.production {
        format!(
            "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0",
            session.cookie_name
        )
    } else {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", session.cookie_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_config, create_test_server, register_user};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test]
    fn test_session_cookie_attributes() {
        let mut config = create_test_config();

        let dev_cookie = session_cookie("tok", &config);
        assert!(dev_cookie.starts_with("accessToken=tok;"));
        assert!(dev_cookie.contains("HttpOnly"));
        assert!(dev_cookie.contains("SameSite=Lax"));
        assert!(!dev_cookie.contains("Secure"));

        config.production = true;
        let prod_cookie = session_cookie("tok", &config);
        assert!(prod_cookie.contains("Secure"));
        assert!(prod_cookie.contains("SameSite=Strict"));

        let cleared = clear_session_cookie(&config);
        assert!(cleared.contains("Max-Age=0"));
    }

    #[sqlx::test]
    async fn test_register_success(pool: PgPool) {
        let server = create_test_server(pool).await;

        let response = server
            .post("/user/register")
            .json(&json!({
                "email": "alice@test.com",
                "password": "Abc12345!",
                "passwordCheck": "Abc12345!"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.headers().get("set-cookie").is_some());

        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["email"], "alice@test.com");
        assert_eq!(body["user"]["status"], "ACTIVE");
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[sqlx::test]
    async fn test_register_duplicate_email_any_casing(pool: PgPool) {
        let server = create_test_server(pool).await;

        register_user(&server, "alice@test.com").await;

        let response = server
            .post("/user/register")
            .json(&json!({
                "email": "ALICE@Test.com",
                "password": "Abc12345!",
                "passwordCheck": "Abc12345!"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Email already in use");
    }

    #[sqlx::test]
    async fn test_register_password_mismatch(pool: PgPool) {
        let server = create_test_server(pool).await;

        let response = server
            .post("/user/register")
            .json(&json!({
                "email": "alice@test.com",
                "password": "Abc12345!",
                "passwordCheck": "Other1234!"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "passwordCheck");
    }

    #[sqlx::test]
    async fn test_login_success_and_failures_are_uniform(pool: PgPool) {
        let server = create_test_server(pool).await;

        register_user(&server, "alice@test.com").await;

        let ok = server
            .post("/user/login")
            .json(&json!({"email": "alice@test.com", "password": "Abc12345!"}))
            .await;
        ok.assert_status(StatusCode::CREATED);

        // Wrong password and unknown email must be indistinguishable
        let wrong_password = server
            .post("/user/login")
            .json(&json!({"email": "alice@test.com", "password": "Wrong1234!"}))
            .await;
        let unknown_email = server
            .post("/user/login")
            .json(&json!({"email": "nobody@test.com", "password": "Abc12345!"}))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_email.assert_status(StatusCode::UNAUTHORIZED);

        let body_a: serde_json::Value = wrong_password.json();
        let body_b: serde_json::Value = unknown_email.json();
        assert_eq!(body_a["message"], body_b["message"]);
        assert_eq!(body_a["code"], body_b["code"]);
    }

    #[sqlx::test]
    async fn test_me_requires_auth(pool: PgPool) {
        let server = create_test_server(pool).await;

        let unauthenticated = server.get("/user/me").await;
        unauthenticated.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_me_with_bearer_token(pool: PgPool) {
        let server = create_test_server(pool).await;

        let token = register_user(&server, "alice@test.com").await;

        let response = server
            .get("/user/me")
            .add_header("authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["email"], "alice@test.com");
    }

    #[sqlx::test]
    async fn test_update_profile_password_change(pool: PgPool) {
        let server = create_test_server(pool).await;

        let token = register_user(&server, "alice@test.com").await;

        // Reusing the same password is rejected
        let reuse = server
            .patch("/user/me/update")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"currentPassword": "Abc12345!", "newPassword": "Abc12345!"}))
            .await;
        reuse.assert_status(StatusCode::BAD_REQUEST);

        // Only one of the pair is rejected
        let half = server
            .patch("/user/me/update")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"newPassword": "NewPass12!"}))
            .await;
        half.assert_status(StatusCode::BAD_REQUEST);

        // Proper change works and the new password logs in
        let change = server
            .patch("/user/me/update")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"currentPassword": "Abc12345!", "newPassword": "NewPass12!"}))
            .await;
        change.assert_status(StatusCode::OK);

        let relogin = server
            .post("/user/login")
            .json(&json!({"email": "alice@test.com", "password": "NewPass12!"}))
            .await;
        relogin.assert_status(StatusCode::CREATED);
    }

    #[sqlx::test]
    async fn test_update_profile_email_taken(pool: PgPool) {
        let server = create_test_server(pool).await;

        register_user(&server, "taken@test.com").await;
        let token = register_user(&server, "alice@test.com").await;

        let response = server
            .patch("/user/me/update")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"email": "Taken@test.com"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
