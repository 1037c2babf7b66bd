//! Database repository for external database connections.
//!
//! The store holds at most one row per project, so this repository is keyed
//! by project id rather than row id and does not implement the generic
//! [`Repository`](crate::db::handlers::Repository) trait.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        models::db_connections::{DbConnectionDBResponse, DbConnectionUpsertDBRequest},
    },
    types::ProjectId,
};

pub struct DbConnections<'c> {
    db: &'c mut PgConnection,
}

impl<'c> DbConnections<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// The stored connection for a project, if one has been configured.
    #[instrument(skip(self), err)]
    pub async fn get_by_project(&mut self, project_id: ProjectId) -> Result<Option<DbConnectionDBResponse>> {
        let connection = sqlx::query_as::<_, DbConnectionDBResponse>(
            "SELECT * FROM db_connections WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(connection)
    }

    /// Insert the connection row for a project, or overwrite the existing one.
    ///
    /// The unique index on `project_id` makes this atomic: concurrent writers
    /// converge on a single row instead of racing an existence check.
    #[instrument(skip(self, request), fields(project_id = request.project_id), err)]
    pub async fn upsert_for_project(&mut self, request: &DbConnectionUpsertDBRequest) -> Result<DbConnectionDBResponse> {
        let connection = sqlx::query_as::<_, DbConnectionDBResponse>(
            r#"
            INSERT INTO db_connections (project_id, name, host, port, database, username, password_enc, read_only)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (project_id) DO UPDATE SET
                name = EXCLUDED.name,
                host = EXCLUDED.host,
                port = EXCLUDED.port,
                database = EXCLUDED.database,
                username = EXCLUDED.username,
                password_enc = EXCLUDED.password_enc,
                read_only = EXCLUDED.read_only,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(request.project_id)
        .bind(&request.name)
        .bind(&request.host)
        .bind(request.port)
        .bind(&request.database)
        .bind(&request.username)
        .bind(&request.password_enc)
        .bind(request.read_only)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(connection)
    }
}
