//! Shared identifier types.
//!
//! Entity ids are `BIGSERIAL` values assigned by the database, wrapped in
//! type aliases so signatures say which entity they refer to.

pub type UserId = i64;
pub type ProjectId = i64;
pub type DbConnectionId = i64;
