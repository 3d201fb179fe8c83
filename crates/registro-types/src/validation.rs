//! Content validation rules.
//!
//! A `contenido` value is accepted when it is not blank once trimmed and the
//! raw value holds at most [`MAX_CONTENIDO_CHARS`] characters. Lengths are
//! counted in `char`s, not bytes.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum number of characters a record may hold.
pub const MAX_CONTENIDO_CHARS: usize = 100;

pub const CODE_REQUIRED: &str = "required";
pub const CODE_BLANK: &str = "blank";
pub const CODE_TOO_LONG: &str = "too_long";
pub const CODE_MALFORMED: &str = "malformed";

pub const BLANK_MESSAGE: &str = "El campo no puede estar vacío";
pub const TOO_LONG_MESSAGE: &str = "Texto demasiado largo";

/// Validate a candidate record body.
///
/// Used as the `custom` rule on [`crate::RegistroPayload`] and called
/// directly by the client before it sends anything.
pub fn validate_contenido(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(CODE_BLANK).with_message(Cow::Borrowed(BLANK_MESSAGE)));
    }
    if value.chars().count() > MAX_CONTENIDO_CHARS {
        let mut err =
            ValidationError::new(CODE_TOO_LONG).with_message(Cow::Borrowed(TOO_LONG_MESSAGE));
        err.add_param(Cow::Borrowed("max"), &MAX_CONTENIDO_CHARS);
        return Err(err);
    }
    Ok(())
}

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Name of the offending field as it appears on the wire.
    pub field: String,
    /// Machine-readable constraint code (`required`, `blank`, `too_long`, `malformed`).
    pub code: String,
    /// Human-readable message suitable for display.
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A rejected payload, with every violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// A required field was absent or empty.
    pub fn required(field: &str, message: impl Into<String>) -> Self {
        Self::single(FieldViolation::new(field, CODE_REQUIRED, message))
    }

    /// The request body could not be decoded at all.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::single(FieldViolation::new("body", CODE_MALFORMED, message))
    }

    /// Message of the first violation, used as the top-level error text.
    pub fn message(&self) -> &str {
        self.violations
            .first()
            .map(|v| v.message.as_str())
            .unwrap_or("Datos inválidos")
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {} ({})", v.field, v.message, v.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldViolation::new(field.clone(), e.code.to_string(), message)
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.code.cmp(&b.code)));
        Self { violations }
    }
}

/// Run the derived [`Validate`] rules on `payload`.
pub fn check<T: Validate>(payload: &T) -> Result<(), ValidationFailure> {
    payload.validate().map_err(ValidationFailure::from)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
