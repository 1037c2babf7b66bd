//! Short-lived connectivity probe against an external Postgres target.
//!
//! A probe opens one client connection, runs a trivial liveness statement,
//! and reports wall-clock latency from connect-start to query completion.
//! The connection is released on every exit path. There are no retries and
//! no pooling; the only resilience mechanism is the optional timeout from
//! [`ProbeConfig`](crate::config::ProbeConfig).

use sqlx::{
    Connection, PgConnection,
    postgres::{PgConnectOptions, PgSslMode},
};
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub latency_ms: u64,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connecting or querying the target failed; carries the upstream message.
    #[error("{0}")]
    Unreachable(String),

    /// The configured probe timeout elapsed before the liveness check finished.
    #[error("connection attempt timed out after {0:?}")]
    TimedOut(Duration),
}

/// Probe the target described by a raw connection string.
pub async fn probe(connection_string: &str, timeout: Option<Duration>) -> Result<ProbeOutcome, ProbeError> {
    // The target's TLS certificate is deliberately not verified: user-supplied
    // databases routinely sit behind self-signed certificates. Prefer mode
    // negotiates TLS when the server offers it and falls back to plaintext.
    let options = PgConnectOptions::from_str(connection_string)
        .map_err(|e| ProbeError::Unreachable(e.to_string()))?
        .ssl_mode(PgSslMode::Prefer);

    let started = Instant::now();
    match timeout {
        Some(limit) => tokio::time::timeout(limit, liveness_check(&options))
            .await
            .map_err(|_| ProbeError::TimedOut(limit))??,
        None => liveness_check(&options).await?,
    }

    Ok(ProbeOutcome {
        latency_ms: started.elapsed().as_millis() as u64,
    })
}

async fn liveness_check(options: &PgConnectOptions) -> Result<(), ProbeError> {
    let mut conn = PgConnection::connect_with(options)
        .await
        .map_err(|e| ProbeError::Unreachable(e.to_string()))?;

    let result = sqlx::query("SELECT 1").execute(&mut conn).await;

    // Release the handle before inspecting the result so a failed liveness
    // query cannot leak the connection.
    let _ = conn.close().await;

    result.map(|_| ()).map_err(|e| ProbeError::Unreachable(e.to_string()))
}
