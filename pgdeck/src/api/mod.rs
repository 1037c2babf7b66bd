//! HTTP API surface.
//!
//! [`handlers`] contains the axum request handlers, [`models`] the wire
//! request/response types. Wire JSON uses camelCase field names; validation
//! happens at this boundary, before anything reaches the repositories.

pub mod handlers;
pub mod models;
