//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON [`ErrorBody`]
//! with an appropriate status code.
//!
//! Database errors are logged in full; the caller only sees a generic
//! message, so SQL and file paths never reach a client.

use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use registro_core::RegistryError;
use registro_types::{ErrorBody, ValidationFailure};
use thiserror::Error;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "Registro no encontrado";
pub const INVALID_ID_MESSAGE: &str = "Id inválido";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Cuerpo de la petición demasiado grande";
pub const UNAVAILABLE_MESSAGE: &str = "Servicio no disponible";
const INTERNAL_MESSAGE: &str = "internal server error";

/// All errors that can occur in the registro-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body or a field in it was rejected.
    #[error("validation failed: {0}")]
    Validation(ValidationFailure),

    /// The client exhausted its creation window.
    #[error("rate limited for {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration, window: Duration },

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid request outside the body schema.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,

    /// Propagated from the SQLite (or other) store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store did not answer a health check.
    #[error("store unreachable: {0}")]
    Unavailable(sqlx::Error),
}

impl From<RegistryError> for ServerError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Validation(f) => ServerError::Validation(f),
            RegistryError::RateLimitExceeded {
                retry_after,
                window,
            } => ServerError::RateLimited {
                retry_after,
                window,
            },
            RegistryError::NotFound(_) => ServerError::NotFound(NOT_FOUND_MESSAGE.to_owned()),
            RegistryError::StoreUnavailable(e) => ServerError::Database(e),
        }
    }
}

impl From<ValidationFailure> for ServerError {
    fn from(f: ValidationFailure) -> Self {
        ServerError::Validation(f)
    }
}

/// User-facing text for an exhausted window of `window` length.
pub fn rate_limit_message(window: Duration) -> String {
    let minutes = window.as_secs().div_ceil(60).max(1);
    format!(
        "Has enviado demasiadas propuestas. Por favor, espera {minutes} minutos antes de registrar más."
    )
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Validation(f) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: f.message().to_owned(),
                    details: Some(f.violations),
                },
            ),
            ServerError::RateLimited {
                retry_after,
                window,
            } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorBody {
                        error: rate_limit_message(window),
                        details: None,
                    }),
                )
                    .into_response();
                // Round up so a client never retries a moment too early.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                return response;
            }
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, plain(m)),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, plain(m)),
            ServerError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                plain(PAYLOAD_TOO_LARGE_MESSAGE.to_owned()),
            ),
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, plain(INTERNAL_MESSAGE.to_owned()))
            }
            ServerError::Unavailable(e) => {
                error!(error = %e, "store unreachable");
                (StatusCode::SERVICE_UNAVAILABLE, plain(UNAVAILABLE_MESSAGE.to_owned()))
            }
        };
        (status, Json(body)).into_response()
    }
}

fn plain(error: String) -> ErrorBody {
    ErrorBody {
        error,
        details: None,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
