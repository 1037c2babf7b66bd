//! Authentication and authorization.
//!
//! Two concerns live here:
//!
//! - **Identity**: password hashing ([`password`]), stateless JWT sessions
//!   ([`session`]), and extraction of the authenticated caller from a request
//!   ([`current_user`]). Session tokens travel as a Bearer header or the
//!   `accessToken` cookie; the header wins when both are present.
//! - **Authorization**: the project ownership guard ([`ownership`]), applied
//!   before any read or mutation of a project or its database connection.

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod session;
