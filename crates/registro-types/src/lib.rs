//! Shared types for the registro service.
//!
//! Everything that crosses the HTTP boundary lives here so the server and the
//! client agree on one definition:
//!
//! - [`Registro`]: a stored record as it appears on the wire.
//! - Request payloads ([`RegistroPayload`], [`PurgeWordPayload`]).
//! - Response bodies ([`MessageResponse`], [`PurgeResponse`], [`ErrorBody`]).
//! - Content validation ([`validation`]), which the client runs locally to
//!   avoid a round trip and the server runs before touching the store.

pub mod registro;
pub mod validation;

pub use registro::{
    ErrorBody, MessageResponse, PurgeResponse, PurgeWordPayload, Registro, RegistroPayload,
};
pub use validation::{FieldViolation, MAX_CONTENIDO_CHARS, ValidationFailure, validate_contenido};
