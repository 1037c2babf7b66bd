//! API models for registration, login, and profile updates.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::models::users::UserResponse,
    config::PasswordConfig,
    errors::FieldDetail,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_check: String,
}

impl RegisterRequest {
    pub fn validate(&self, policy: &PasswordConfig) -> Vec<FieldDetail> {
        let mut details = Vec::new();

        if !is_valid_email(&self.email) {
            details.push(FieldDetail::new("email", "A valid email address is required."));
        }
        details.extend(password_strength("password", &self.password, policy));

        if self.password_check.is_empty() {
            details.push(FieldDetail::new("passwordCheck", "Both passwords are required."));
        } else if self.password != self.password_check {
            details.push(FieldDetail::new("passwordCheck", "Passwords must be the same."));
        }

        details
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<FieldDetail> {
        let mut details = Vec::new();

        if !is_valid_email(&self.email) {
            details.push(FieldDetail::new("email", "A valid email address is required."));
        }
        if self.password.is_empty() {
            details.push(FieldDetail::new("password", "Password is required"));
        }

        details
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self, policy: &PasswordConfig) -> Vec<FieldDetail> {
        let mut details = Vec::new();

        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                details.push(FieldDetail::new("email", "A valid email address is required."));
            }
        }
        if let Some(new_password) = &self.new_password {
            details.extend(password_strength("newPassword", new_password, policy));
        }
        // Password changes need the current and the new password together
        if self.current_password.is_some() != self.new_password.is_some() {
            details.push(FieldDetail::new(
                "currentPassword",
                "Both passwords are required to change password",
            ));
        }

        details
    }
}

/// Successful registration/login payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
}

/// Auth payload plus the Set-Cookie header establishing the session.
#[derive(Debug)]
pub struct SessionResponse {
    pub auth: AuthResponse,
    pub cookie: String,
}

impl IntoResponse for SessionResponse {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(self.auth)).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        response
    }
}

/// Confirmation plus the Set-Cookie header clearing the session.
#[derive(Debug)]
pub struct LogoutResponse {
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        let body = crate::api::models::MessageResponse {
            message: "Signed out.".to_string(),
        };
        let mut response = (StatusCode::OK, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        response
    }
}

/// Minimal shape check: one `@` with a non-empty local part and a dotted,
/// whitespace-free domain. Deliverability is not this service's problem.
pub(crate) fn is_valid_email(raw: &str) -> bool {
    let trimmed = raw.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !trimmed.chars().any(char::is_whitespace)
}

/// Password policy: bounded length, at least one lowercase, one uppercase,
/// and one special character.
pub(crate) fn password_strength(field: &str, password: &str, policy: &PasswordConfig) -> Vec<FieldDetail> {
    let mut details = Vec::new();

    if password.len() < policy.min_length {
        details.push(FieldDetail::new(
            field,
            format!("Password must be at least {} characters", policy.min_length),
        ));
    }
    if password.len() > policy.max_length {
        details.push(FieldDetail::new(
            field,
            format!("Password must be at most {} characters", policy.max_length),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        details.push(FieldDetail::new(field, "Password must contain at least one lowercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        details.push(FieldDetail::new(field, "Password must contain at least one uppercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        details.push(FieldDetail::new(field, "Password must contain at least one special character"));
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordConfig {
        PasswordConfig::default()
    }

    fn register(email: &str, password: &str, check: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            password_check: check.to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        let details = register("alice@test.com", "Abc12345!", "Abc12345!").validate(&policy());
        assert!(details.is_empty(), "unexpected details: {details:?}");
    }

    #[test]
    fn test_password_mismatch() {
        let details = register("alice@test.com", "Abc12345!", "Different1!").validate(&policy());
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "passwordCheck");
        assert_eq!(details[0].message, "Passwords must be the same.");
    }

    #[test]
    fn test_password_policy() {
        // too short, no uppercase, no special char
        let details = password_strength("password", "abc", &policy());
        let messages: Vec<_> = details.iter().map(|d| d.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.contains("at least 8 characters")));
        assert!(messages.iter().any(|m| m.contains("uppercase")));
        assert!(messages.iter().any(|m| m.contains("special character")));
        assert!(!messages.iter().any(|m| m.contains("lowercase")));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("  user.name+tag@sub.example.co.uk "));

        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_update_profile_requires_both_passwords() {
        let request = UpdateProfileRequest {
            email: None,
            current_password: Some("Current1!".to_string()),
            new_password: None,
        };

        let details = request.validate(&policy());
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "currentPassword");
    }

    #[test]
    fn test_update_profile_empty_request_is_valid() {
        let request = UpdateProfileRequest {
            email: None,
            current_password: None,
            new_password: None,
        };
        assert!(request.validate(&policy()).is_empty());
    }

    #[test]
    fn test_register_request_wire_names() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.co",
            "password": "Abc12345!",
            "passwordCheck": "Abc12345!"
        }))
        .unwrap();

        assert_eq!(request.password_check, "Abc12345!");
    }
}
