//! Error types for shop operations.

use thiserror::Error;

/// Errors produced by the shop core.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration rejected before any actor started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Shared state broke one of its invariants; the exclusion discipline was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// An actor thread could not be created.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        /// Role of the thread (`barber`, `client`, `arrivals`).
        role: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A joined actor thread panicked.
    #[error("{0} thread panicked")]
    ActorPanicked(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
