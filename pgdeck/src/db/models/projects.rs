//! Database models for projects.

use chrono::{DateTime, Utc};

use crate::types::{ProjectId, UserId};

/// Database request for creating a project.
#[derive(Debug, Clone)]
pub struct ProjectCreateDBRequest {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
}

/// Database request for updating a project.
///
/// `description` distinguishes "leave unchanged" (`None`) from "set to NULL"
/// (`Some(None)`), mirroring the PATCH body semantics.
#[derive(Debug, Clone)]
pub struct ProjectUpdateDBRequest {
    pub name: String,
    pub description: Option<Option<String>>,
}

/// Database response for a project.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectDBResponse {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
