//! API request handlers.

pub mod auth;
pub mod db_connections;
pub mod projects;
