//! Extraction of the authenticated caller from request parts.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    db::{
        handlers::{Repository as _, Users},
        models::users::UserStatus,
    },
    errors::{Error, Result},
};

/// Session token from the Authorization header, if it carries a Bearer token.
fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_owned)
}

/// Session token from the session cookie, if present.
fn cookie_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let cookie_str = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == cookie_name && !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // The Bearer header wins when both transports are present.
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts, &state.config.auth.session.cookie_name))
            .ok_or(Error::Unauthenticated { message: None })?;

        let claims = session::verify_session_token(&token, &state.config)?;

        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let mut users = Users::new(&mut conn);
        let user = users
            .get_by_id(claims.sub)
            .await?
            .ok_or(Error::Unauthenticated { message: None })?;

        // A banned account keeps a syntactically valid token until it expires;
        // reject it here so the ban takes effect immediately.
        if user.status == UserStatus::Banned {
            return Err(Error::Unauthenticated { message: None });
        }

        Ok(CurrentUser::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = axum::http::Request::builder().uri("http://localhost/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _body) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_cookie_token_extraction() {
        let parts = parts_with_headers(&[("cookie", "theme=dark; accessToken=tok123; lang=en")]);
        assert_eq!(cookie_token(&parts, "accessToken").as_deref(), Some("tok123"));
    }

    #[test]
    fn test_empty_cookie_value_is_ignored() {
        // A cleared cookie (logout) must not count as a credential
        let parts = parts_with_headers(&[("cookie", "accessToken=")]);
        assert_eq!(cookie_token(&parts, "accessToken"), None);
    }

    #[test]
    fn test_header_takes_precedence_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "accessToken=cookie-token"),
        ]);

        let token = bearer_token(&parts).or_else(|| cookie_token(&parts, "accessToken"));
        assert_eq!(token.as_deref(), Some("header-token"));
    }

    #[test]
    fn test_no_credentials() {
        let parts = parts_with_headers(&[]);
        assert_eq!(bearer_token(&parts), None);
        assert_eq!(cookie_token(&parts, "accessToken"), None);
    }
}
