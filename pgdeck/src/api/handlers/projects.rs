//! Handlers for project CRUD.
//!
//! Every operation on an existing project runs behind
//! [`require_owned_project`], so absence and ownership mismatches surface
//! uniformly as 404 and 403.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        MessageResponse,
        projects::{ProjectCreateRequest, ProjectEnvelope, ProjectListResponse, ProjectUpdateRequest},
        users::CurrentUser,
    },
    auth::ownership::require_owned_project,
    db::{
        handlers::{Projects, Repository as _},
        models::projects::{ProjectCreateDBRequest, ProjectUpdateDBRequest},
    },
    errors::Error,
    types::ProjectId,
};

/// List the caller's projects, newest first
#[utoipa::path(
    get,
    path = "/project",
    tag = "project",
    responses(
        (status = 200, description = "Projects owned by the caller", body = ProjectListResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_projects(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ProjectListResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut projects = Projects::new(&mut conn);

    let listed = projects.list_for_owner(user.id).await?;

    Ok(Json(ProjectListResponse {
        projects: listed.into_iter().map(Into::into).collect(),
    }))
}

/// A single project
#[utoipa::path(
    get,
    path = "/project/{project_id}",
    tag = "project",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project", body = ProjectEnvelope),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such project"),
    )
)]
#[tracing::instrument(skip_all, fields(project_id))]
pub async fn get_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<ProjectEnvelope>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let project = require_owned_project(&mut conn, user.id, project_id).await?;

    Ok(Json(ProjectEnvelope {
        project: project.into(),
    }))
}

/// Create a project owned by the caller
#[utoipa::path(
    post,
    path = "/project",
    request_body = ProjectCreateRequest,
    tag = "project",
    responses(
        (status = 201, description = "Project created", body = ProjectEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ProjectCreateRequest>,
) -> Result<(StatusCode, Json<ProjectEnvelope>), Error> {
    let details = request.validate();
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut projects = Projects::new(&mut conn);

    let created = projects
        .create(&ProjectCreateDBRequest {
            name: request.name.trim().to_string(),
            description: request.description.map(|d| d.trim().to_string()),
            owner_id: user.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectEnvelope {
            project: created.into(),
        }),
    ))
}

/// Update a project's name and/or description
#[utoipa::path(
    patch,
    path = "/project/{project_id}",
    request_body = ProjectUpdateRequest,
    tag = "project",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project updated", body = ProjectEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such project"),
    )
)]
#[tracing::instrument(skip_all, fields(project_id))]
pub async fn update_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(project_id): Path<ProjectId>,
    Json(request): Json<ProjectUpdateRequest>,
) -> Result<Json<ProjectEnvelope>, Error> {
    let details = request.validate();
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    require_owned_project(&mut conn, user.id, project_id).await?;

    let mut projects = Projects::new(&mut conn);
    let updated = projects
        .update(
            project_id,
            &ProjectUpdateDBRequest {
                name: request.name.trim().to_string(),
                description: request.description.map(|d| d.map(|s| s.trim().to_string())),
            },
        )
        .await?;

    Ok(Json(ProjectEnvelope {
        project: updated.into(),
    }))
}

/// Delete a project (and its stored connection, via cascade)
#[utoipa::path(
    delete,
    path = "/project/{project_id}",
    tag = "project",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted", body = MessageResponse),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such project"),
    )
)]
#[tracing::instrument(skip_all, fields(project_id))]
pub async fn delete_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<MessageResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    require_owned_project(&mut conn, user.id, project_id).await?;

    let mut projects = Projects::new(&mut conn);
    projects.delete(project_id).await?;

    Ok(Json(MessageResponse {
        message: "Project deleted.".to_string(),
    }))
}
