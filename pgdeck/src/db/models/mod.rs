//! Database record models matching table schemas.
//!
//! Each entity has a `*DBResponse` row struct (deriving `sqlx::FromRow`) and
//! separate request structs for writes, so the storage representation can
//! evolve independently of the API models in [`crate::api::models`].

pub mod db_connections;
pub mod projects;
pub mod users;
