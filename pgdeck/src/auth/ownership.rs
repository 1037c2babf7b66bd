//! Project ownership guard.

use sqlx::PgConnection;

use crate::{
    db::{
        handlers::{Projects, Repository as _},
        models::projects::ProjectDBResponse,
    },
    errors::{Error, Result},
    types::{ProjectId, UserId},
};

/// Resolve a project and require that the requesting user owns it.
///
/// Absence is `NotFound`; an existing project owned by someone else is
/// `Forbidden`. The same pair of outcomes applies to every project and
/// connection endpoint, so a caller cannot use one route to learn what
/// another hides.
pub async fn require_owned_project(
    conn: &mut PgConnection,
    user_id: UserId,
    project_id: ProjectId,
) -> Result<ProjectDBResponse> {
    let mut projects = Projects::new(conn);

    let project = projects.get_by_id(project_id).await?.ok_or_else(|| Error::NotFound {
        message: "Project not found.".to_string(),
    })?;

    if project.owner_id != user_id {
        return Err(Error::Forbidden {
            message: "You do not have permission to access this project.".to_string(),
        });
    }

    Ok(project)
}
