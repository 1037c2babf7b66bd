//! Database layer for data persistence and access.
//!
//! SQLx over PostgreSQL, following the repository pattern: [`handlers`]
//! contains one repository per entity that encapsulates all queries for it,
//! [`models`] contains the row structs and the request/response types
//! repositories exchange with the rest of the crate, and [`errors`] maps
//! `sqlx::Error` into something handlers can match on.
//!
//! Repositories borrow a `PgConnection` so callers decide whether an
//! operation runs on a plain pool connection or inside a transaction:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let mut users = Users::new(&mut tx);
//! let user = users.create(&request).await?;
//! tx.commit().await?;
//! ```
//!
//! Migrations live in `migrations/` and run at startup via
//! [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
