use registro_types::ValidationFailure;
use thiserror::Error;

/// Errors that can be returned by registro-client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response (connection, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Input was rejected locally before any request was sent.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationFailure),

    /// The session is locked after suspicious input; reload to continue.
    #[error("acceso restringido: recarga la aplicación para continuar")]
    Locked,

    /// A destructive operation was requested without confirmation.
    #[error("operation requires confirmation")]
    NotConfirmed,
}

impl ClientError {
    /// HTTP status for [`ClientError::Api`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
