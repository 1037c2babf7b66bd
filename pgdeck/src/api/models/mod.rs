//! API request/response models.
//!
//! Request types carry a `validate()` method returning per-field problems;
//! handlers turn a non-empty list into a 400 with structured details.

pub mod auth;
pub mod db_connections;
pub mod projects;
pub mod users;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
