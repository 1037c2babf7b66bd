//! API models for projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::projects::ProjectDBResponse,
    errors::FieldDetail,
    types::{ProjectId, UserId},
};

const NAME_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 2000;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateRequest {
    pub name: String,
    pub description: Option<String>,
}

impl ProjectCreateRequest {
    pub fn validate(&self) -> Vec<FieldDetail> {
        let mut details = Vec::new();
        validate_name(&self.name, &mut details);
        validate_description(self.description.as_deref(), &mut details);
        details
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateRequest {
    pub name: String,
    /// Absent = leave unchanged, explicit null = clear.
    #[serde(default, with = "serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

impl ProjectUpdateRequest {
    pub fn validate(&self) -> Vec<FieldDetail> {
        let mut details = Vec::new();
        validate_name(&self.name, &mut details);
        validate_description(self.description.as_ref().and_then(|d| d.as_deref()), &mut details);
        details
    }
}

fn validate_name(name: &str, details: &mut Vec<FieldDetail>) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        details.push(FieldDetail::new("name", "Name is required"));
    } else if trimmed.len() > NAME_MAX {
        details.push(FieldDetail::new(
            "name",
            format!("Name must be at most {NAME_MAX} characters"),
        ));
    }
}

fn validate_description(description: Option<&str>, details: &mut Vec<FieldDetail>) {
    if let Some(description) = description {
        if description.trim().len() > DESCRIPTION_MAX {
            details.push(FieldDetail::new(
                "description",
                format!("Description must be at most {DESCRIPTION_MAX} characters"),
            ));
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectDBResponse> for ProjectResponse {
    fn from(db: ProjectDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            owner_id: db.owner_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// `{project: ...}` wrapper for single-project endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectEnvelope {
    pub project: ProjectResponse,
}

/// `{projects: [...]}` wrapper for the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
}
