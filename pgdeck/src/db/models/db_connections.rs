//! Database models for external database connections.

use chrono::{DateTime, Utc};

use crate::types::{DbConnectionId, ProjectId};

/// Database request for the insert-or-update of a project's connection.
/// `password_enc` is the already-encrypted envelope, never the clear text.
#[derive(Debug, Clone)]
pub struct DbConnectionUpsertDBRequest {
    pub project_id: ProjectId,
    pub name: String,
    pub host: String,
    pub port: i32,
    pub database: String,
    pub username: String,
    pub password_enc: String,
    pub read_only: bool,
}

/// Database response for a stored connection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbConnectionDBResponse {
    pub id: DbConnectionId,
    pub project_id: ProjectId,
    pub name: String,
    pub host: String,
    pub port: i32,
    pub database: String,
    pub username: String,
    pub password_enc: String,
    pub read_only: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
