//! API models for users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::users::{AuthProvider, UserDBResponse, UserRole, UserStatus},
    types::UserId,
};

/// Public representation of a user.
///
/// Password and token hashes are projected out structurally: this type has no
/// field that could carry them, so no serialization path can leak one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub provider: AuthProvider,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            provider: db.provider,
            status: db.status,
            role: db.role,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// The authenticated caller, resolved from a session token by the
/// [`CurrentUser`](crate::auth::current_user) extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl From<UserDBResponse> for CurrentUser {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            role: db.role,
        }
    }
}

/// `{user: ...}` wrapper used by the profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_user() -> UserDBResponse {
        UserDBResponse {
            id: 1,
            email: "alice@test.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            provider: AuthProvider::Local,
            oauth_sub: None,
            status: UserStatus::Active,
            role: UserRole::User,
            reset_token_hash: Some("reset".to_string()),
            verification_token_hash: Some("verify".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_is_camel_case_and_hash_free() {
        let response = UserResponse::from(db_user());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["email"], "alice@test.com");
        assert_eq!(json["provider"], "LOCAL");
        assert_eq!(json["status"], "ACTIVE");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());

        // Nothing hash-shaped survives serialization
        let serialized = json.to_string();
        assert!(!serialized.contains("argon2"));
        assert!(!serialized.contains("passwordHash"));
        assert!(!serialized.contains("resetTokenHash"));
    }
}
