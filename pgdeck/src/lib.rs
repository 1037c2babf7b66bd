//! # pgdeck: connect external Postgres databases to user-owned projects
//!
//! `pgdeck` is the backend of a "connect your Postgres database and query it"
//! product. It owns three concerns: user identity (registration, login,
//! stateless JWT sessions), project ownership (every project has exactly one
//! owner, and every read or mutation checks it), and per-project external
//! database connections (validated end to end before their credentials are
//! encrypted and stored).
//!
//! ## Request flow
//!
//! A request enters through [Axum](https://github.com/tokio-rs/axum), picks
//! up an `x-request-id` correlation id, and hits a handler in
//! [`api::handlers`]. Authenticated routes extract a
//! [`CurrentUser`](api::models::users::CurrentUser) from the Bearer header or
//! the `accessToken` cookie (header wins), verifying the session token and
//! re-reading the account so bans apply immediately. Project and connection
//! routes then pass through the ownership guard in [`auth::ownership`]:
//! a missing project is a 404, someone else's project is a 403, uniformly
//! across the surface.
//!
//! Connecting a database runs a pipeline of hard gates: parse the supplied
//! `postgres://` string ([`connstr`]), probe the target with a short-lived
//! client and a liveness query ([`probe`]), encrypt the password with
//! AES-256-GCM ([`crypto`] - credentials are never stored in clear text),
//! and only then upsert the single connection row for the project. A failure
//! at any gate persists nothing.
//!
//! ## Layers
//!
//! The **API layer** ([`api`]) holds handlers and camelCase wire models with
//! boundary validation. The **auth layer** ([`auth`]) covers Argon2id
//! password hashing, JWT sessions, caller extraction, and the ownership
//! guard. The **database layer** ([`db`]) uses the repository pattern over
//! SQLx/PostgreSQL; migrations run at startup. Errors funnel through one
//! taxonomy ([`errors`]) that maps to status codes and a JSON envelope
//! carrying the request correlation id.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use pgdeck::{Application, Config, config::Args, telemetry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = Args::parse();
//!     let config = Config::load(&args)?;
//!     telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod connstr;
mod crypto;
pub mod db;
pub mod errors;
mod openapi;
pub mod probe;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Router,
    http::{self, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};
use bon::Builder;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
pub use types::{DbConnectionId, ProjectId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the pgdeck database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Build the application router with all endpoints and middleware.
///
/// Layer order matters: the request id is set outermost so the tracing layer
/// and the error-envelope middleware both see it, and the propagation layer
/// echoes it onto every response.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let user_routes = Router::new()
        .route("/user/register", post(api::handlers::auth::register))
        .route("/user/login", post(api::handlers::auth::login))
        .route("/user/logout", post(api::handlers::auth::logout))
        .route("/user/me", get(api::handlers::auth::me))
        .route("/user/me/update", patch(api::handlers::auth::update_profile));

    let project_routes = Router::new()
        .route(
            "/project",
            get(api::handlers::projects::list_projects).post(api::handlers::projects::create_project),
        )
        .route(
            "/project/{project_id}",
            get(api::handlers::projects::get_project)
                .patch(api::handlers::projects::update_project)
                .delete(api::handlers::projects::delete_project),
        )
        .route(
            "/project/{project_id}/db-connection",
            put(api::handlers::db_connections::upsert_connection),
        )
        .route(
            "/project/{project_id}/db-connection/test",
            get(api::handlers::db_connections::test_connection),
        );

    let cors_layer = create_cors_layer(&state.config)?;
    let x_request_id = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(user_routes)
        .merge(project_routes)
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        // Rebuilds error bodies with the correlation id
        .layer(from_fn_with_state(state, errors::error_envelope))
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .layer(cors_layer);

    Ok(router)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(config.cors.allow_credentials))
}

/// Main application struct that owns all resources and lifecycle.
///
/// [`Application::new`] connects to the database, runs migrations, and builds
/// the router; [`Application::serve`] binds the listener and runs until the
/// shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPool::connect(config.database_url()?).await?;
        migrator().run(&pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("pgdeck listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_server;
    use axum::http::StatusCode;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_server(pool).await;

        let response = server.get("/healthz").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.text(), "OK");
    }

    #[sqlx::test]
    async fn test_every_response_carries_a_request_id(pool: PgPool) {
        let server = create_test_server(pool).await;

        let ok = server.get("/healthz").await;
        assert!(ok.headers().get("x-request-id").is_some());

        let err = server.get("/user/me").await;
        assert!(err.headers().get("x-request-id").is_some());

        // Inbound ids are propagated, not replaced
        let propagated = server.get("/healthz").add_header("x-request-id", "caller-chosen-id").await;
        assert_eq!(
            propagated.headers().get("x-request-id").unwrap().to_str().unwrap(),
            "caller-chosen-id"
        );
    }

    #[sqlx::test]
    async fn test_error_envelope_shape(pool: PgPool) {
        let server = create_test_server(pool).await;

        let response = server.get("/user/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(body["message"].as_str().is_some());
        assert!(body["requestId"].as_str().is_some());
    }
}
