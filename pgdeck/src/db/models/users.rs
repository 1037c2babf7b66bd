//! Database models for users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::UserId;

/// How an account authenticates. Only `LOCAL` (email + password) has login
/// logic today; the OAuth variants exist in the schema for accounts imported
/// from identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "auth_provider", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    Local,
    Google,
    Github,
}

/// Account lifecycle: `PENDING -> ACTIVE` happens implicitly at registration
/// (the verification flow is a stub), `BANNED` is terminal for login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Pending,
    Active,
    Banned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

/// Normalize an email for storage and lookup.
///
/// Uniqueness is case-insensitive and enforced here, at normalization time;
/// the unique index on `users.email` is only the storage-level backstop.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Database request for creating a new user. `email` must already be
/// normalized.
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub email: String,
    pub password_hash: Option<String>,
    pub provider: AuthProvider,
    pub status: UserStatus,
    pub role: UserRole,
}

/// Database request for updating a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Database response for a user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub email: String,
    pub password_hash: Option<String>,
    pub provider: AuthProvider,
    pub oauth_sub: Option<String>,
    pub status: UserStatus,
    pub role: UserRole,
    pub reset_token_hash: Option<String>,
    pub verification_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
