use std::time::Duration;

use registro_types::ValidationFailure;
use thiserror::Error;

/// Everything a registry operation can fail with.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Bad, missing, or oversized content; missing required field.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Too many creation requests from one client in the current window.
    #[error("rate limit exceeded; retry in {}s", .retry_after.as_secs())]
    RateLimitExceeded { retry_after: Duration, window: Duration },

    /// No record has the given id.
    #[error("registro {0} not found")]
    NotFound(i64),

    /// The persistence layer failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}
