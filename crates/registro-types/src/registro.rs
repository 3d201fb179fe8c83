//! Record and request / response body types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{FieldViolation, validate_contenido};

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registro {
    /// Store-assigned id; never reused after deletion.
    pub id: i64,
    /// The record text (1–100 characters).
    pub contenido: String,
    /// Creation time, set once by the server.
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /registros` and `PUT /registros/{id}`.
///
/// Exactly one field is accepted; unknown fields are rejected during
/// deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegistroPayload {
    #[validate(custom(function = "validate_contenido"))]
    pub contenido: String,
}

impl RegistroPayload {
    pub fn new(contenido: impl Into<String>) -> Self {
        Self {
            contenido: contenido.into(),
        }
    }
}

/// Body of `DELETE /registros/limpiar-palabra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PurgeWordPayload {
    /// Substring to look for (case-sensitive). Missing or empty is rejected.
    #[serde(default)]
    pub palabra: Option<String>,
}

/// Plain confirmation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Confirmation body for the bulk deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PurgeResponse {
    pub message: String,
    /// Number of records removed.
    pub count: u64,
}

/// JSON error envelope returned on every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}
