//! Handlers for the per-project database connection.
//!
//! The upsert validates the user's claim end to end before anything is
//! persisted: ownership, then syntax (codec), then reachability (probe), and
//! only then the encrypted write. A failure at any gate leaves the stored
//! row untouched.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, connstr, crypto,
    api::models::{
        db_connections::{ConnectionTestResponse, UpsertConnectionRequest},
        users::CurrentUser,
    },
    auth::ownership::require_owned_project,
    db::{handlers::DbConnections, models::db_connections::DbConnectionUpsertDBRequest},
    errors::Error,
    probe,
    types::ProjectId,
};

const DEFAULT_CONNECTION_NAME: &str = "Main connection";

/// Connect a database to a project (insert or overwrite)
#[utoipa::path(
    put,
    path = "/project/{project_id}/db-connection",
    request_body = UpsertConnectionRequest,
    tag = "db-connection",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Connection validated and stored", body = ConnectionTestResponse),
        (status = 400, description = "Malformed connection string or unreachable target"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such project"),
    )
)]
#[tracing::instrument(skip_all, fields(project_id))]
pub async fn upsert_connection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(project_id): Path<ProjectId>,
    Json(request): Json<UpsertConnectionRequest>,
) -> Result<Json<ConnectionTestResponse>, Error> {
    let details = request.validate();
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let project = require_owned_project(&mut conn, user.id, project_id).await?;

    let parts = connstr::parse(&request.connection_string).map_err(|e| Error::BadRequest { message: e.to_string() })?;

    // Probe with the raw user-supplied string, not the reconstructed one:
    // the claim is validated exactly as given before it is persisted.
    let outcome = probe::probe(&request.connection_string, state.config.probe.timeout)
        .await
        .map_err(|e| Error::BadRequest {
            message: format!("Cannot connect to database, error: {e}"),
        })?;

    let key = state.config.encryption_key().map_err(|e| Error::Internal {
        operation: format!("load encryption key: {e}"),
    })?;
    let password_enc = crypto::encrypt(parts.password.as_bytes(), &key).map_err(|e| Error::Internal {
        operation: format!("encrypt connection password: {e}"),
    })?;

    let mut connections = DbConnections::new(&mut conn);
    connections
        .upsert_for_project(&DbConnectionUpsertDBRequest {
            project_id: project.id,
            name: request.name.clone().unwrap_or_else(|| DEFAULT_CONNECTION_NAME.to_string()),
            host: parts.host,
            port: i32::from(parts.port),
            database: parts.database,
            username: parts.username,
            password_enc,
            read_only: request.read_only.unwrap_or(true),
        })
        .await?;

    Ok(Json(ConnectionTestResponse {
        message: "Database connected successfully.".to_string(),
        ok: true,
        latency_ms: outcome.latency_ms,
    }))
}

/// Re-probe the stored connection
#[utoipa::path(
    get,
    path = "/project/{project_id}/db-connection/test",
    tag = "db-connection",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Stored connection is reachable", body = ConnectionTestResponse),
        (status = 400, description = "Stored target is unreachable"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such project, or no connection configured"),
    )
)]
#[tracing::instrument(skip_all, fields(project_id))]
pub async fn test_connection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<ConnectionTestResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let project = require_owned_project(&mut conn, user.id, project_id).await?;

    let mut connections = DbConnections::new(&mut conn);
    let record = connections.get_by_project(project.id).await?.ok_or_else(|| Error::NotFound {
        message: "Db Connection not configured yet for this project.".to_string(),
    })?;

    let key = state.config.encryption_key().map_err(|e| Error::Internal {
        operation: format!("load encryption key: {e}"),
    })?;
    let password_bytes = crypto::decrypt(&record.password_enc, &key).map_err(|e| Error::Internal {
        operation: format!("decrypt connection password: {e}"),
    })?;
    let password = String::from_utf8(password_bytes).map_err(|e| Error::Internal {
        operation: format!("decode connection password: {e}"),
    })?;

    let connection_string = connstr::serialize(&connstr::ConnectionParts {
        host: record.host.clone(),
        port: record.port as u16,
        database: record.database.clone(),
        username: record.username.clone(),
        password,
    });

    let outcome = probe::probe(&connection_string, state.config.probe.timeout)
        .await
        .map_err(|e| Error::BadRequest {
            message: format!("Cannot connect to database, error: {e}"),
        })?;

    Ok(Json(ConnectionTestResponse {
        message: "Your connection is established.".to_string(),
        ok: true,
        latency_ms: outcome.latency_ms,
    }))
}
