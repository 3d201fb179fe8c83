//! Request extractors that reject with [`ServerError`] instead of axum's
//! plain-text rejections.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use registro_types::ValidationFailure;
use serde::de::DeserializeOwned;

use crate::error::{INVALID_ID_MESSAGE, ServerError};

/// Message used when a required field is absent from the body.
pub const MISSING_FIELD_MESSAGE: &str = "El campo es obligatorio";

/// JSON body whose decoding failures surface as validation errors.
///
/// A missing field is reported with code `required`; any other decoding
/// failure (bad syntax, wrong type, unknown field, wrong content type) is
/// reported as `malformed`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(reject(rejection.status(), rejection.body_text())),
        }
    }
}

/// Like [`JsonBody`], but an empty or all-whitespace body yields
/// `T::default()` instead of a decoding error.
#[derive(Debug)]
pub struct OptionalJsonBody<T>(pub T);

impl<S, T> FromRequest<S> for OptionalJsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| reject(rejection.status(), rejection.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJsonBody(T::default()));
        }
        serde_json::from_slice(&body)
            .map(OptionalJsonBody)
            .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))
    }
}

fn reject(status: StatusCode, text: String) -> ServerError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return ServerError::PayloadTooLarge;
    }
    match missing_field(&text) {
        Some(field) => ValidationFailure::required(field, MISSING_FIELD_MESSAGE).into(),
        None => ValidationFailure::malformed(text).into(),
    }
}

/// Pull `name` out of serde's "missing field `name`" message.
fn missing_field(text: &str) -> Option<&str> {
    let rest = &text[text.find("missing field `")? + "missing field `".len()..];
    rest.find('`').map(|end| &rest[..end])
}

/// Integer record id from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id(pub i64);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ServerError::BadRequest(INVALID_ID_MESSAGE.to_owned()))?;
        raw.trim()
            .parse::<i64>()
            .map(Id)
            .map_err(|_| ServerError::BadRequest(INVALID_ID_MESSAGE.to_owned()))
    }
}
