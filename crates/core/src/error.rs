//! Domain error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain and service layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Field-level validation messages, keyed by input field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Coarse classification of a [`DomainError`], stable across layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    ValidationFailed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Error surfaced to callers of any scheduler operation.
///
/// Every variant carries a human-readable message; validation failures also
/// carry per-field messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No credential, or the credential failed verification.
    #[error("login required: {0}")]
    Unauthenticated(String),

    /// Authenticated, but not permitted (wrong owner, not a manager).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A referenced id does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed input.
    #[error("validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },

    /// Unexpected storage or infrastructure failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), msg.clone());
        Self::Validation { message: msg, fields }
    }

    /// Validation failure from a collected set of field messages.
    ///
    /// Returns `Ok(())` when `fields` is empty so callers can collect first and
    /// fail once.
    pub fn check_fields(fields: FieldErrors) -> DomainResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let message = fields
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        Err(Self::Validation { message, fields })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Validation { .. } => ErrorKind::ValidationFailed,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Field messages for validation failures; `None` for every other kind.
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            DomainError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_fields_passes_when_empty() {
        assert!(DomainError::check_fields(FieldErrors::new()).is_ok());
    }

    #[test]
    fn check_fields_collects_every_message() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), "Email must not be empty".to_string());
        fields.insert("password".to_string(), "Password must not be empty".to_string());

        let err = DomainError::check_fields(fields).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.fields().unwrap().len(), 2);
        assert!(err.to_string().contains("email: Email must not be empty"));
    }

    #[test]
    fn kinds_map_one_to_one() {
        assert_eq!(DomainError::unauthenticated("x").kind(), ErrorKind::Unauthenticated);
        assert_eq!(DomainError::forbidden("x").kind(), ErrorKind::Forbidden);
        assert_eq!(DomainError::not_found("event").kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::internal("x").kind(), ErrorKind::Internal);
        assert_eq!(DomainError::not_found("event").to_string(), "event not found");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ValidationFailed).unwrap();
        assert_eq!(json, "\"validation_failed\"");
    }
}
