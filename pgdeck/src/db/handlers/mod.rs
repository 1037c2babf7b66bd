//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection`, provides strongly-typed query
//! methods, and returns models from [`crate::db::models`]. [`Users`] and
//! [`Projects`] implement the common [`Repository`] trait;
//! [`DbConnections`] does not - its store is keyed by project, not by row id,
//! so it exposes `get_by_project`/`upsert_for_project` instead.

pub mod db_connections;
pub mod projects;
pub mod repository;
pub mod users;

pub use db_connections::DbConnections;
pub use projects::Projects;
pub use repository::Repository;
pub use users::Users;
