//! Database repository for projects.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::projects::{ProjectCreateDBRequest, ProjectDBResponse, ProjectUpdateDBRequest},
    },
    types::{ProjectId, UserId},
};

pub struct Projects<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Projects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All projects owned by a user, newest first.
    #[instrument(skip(self), err)]
    pub async fn list_for_owner(&mut self, owner_id: UserId) -> Result<Vec<ProjectDBResponse>> {
        let projects = sqlx::query_as::<_, ProjectDBResponse>(
            "SELECT * FROM projects WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(projects)
    }

    /// Delete a project. Returns whether a row was removed; the stored
    /// connection (if any) goes with it via the FK cascade.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: ProjectId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Projects<'c> {
    type CreateRequest = ProjectCreateDBRequest;
    type UpdateRequest = ProjectUpdateDBRequest;
    type Response = ProjectDBResponse;
    type Id = ProjectId;

    #[instrument(skip(self, request), fields(owner_id = request.owner_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let project = sqlx::query_as::<_, ProjectDBResponse>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.owner_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(project)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: ProjectId) -> Result<Option<ProjectDBResponse>> {
        let project = sqlx::query_as::<_, ProjectDBResponse>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(project)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: ProjectId, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // $3 flags whether the description was supplied at all, so an absent
        // field leaves the column alone while an explicit null clears it.
        sqlx::query_as::<_, ProjectDBResponse>(
            r#"
            UPDATE projects SET
                name = $2,
                description = CASE WHEN $3 THEN $4 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.description.is_some())
        .bind(request.description.clone().flatten())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)
    }
}
