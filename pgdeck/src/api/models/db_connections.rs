//! API models for the per-project database connection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::FieldDetail;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertConnectionRequest {
    pub connection_string: String,
    pub name: Option<String>,
    pub read_only: Option<bool>,
}

impl UpsertConnectionRequest {
    pub fn validate(&self) -> Vec<FieldDetail> {
        let mut details = Vec::new();

        if self.connection_string.is_empty() {
            details.push(FieldDetail::new("connectionString", "Connection string is required."));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                details.push(FieldDetail::new("name", "Name must not be empty."));
            }
        }

        details
    }
}

/// Result of probing a connection, returned by both the upsert and the
/// test endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestResponse {
    pub message: String,
    pub ok: bool,
    pub latency_ms: u64,
}
