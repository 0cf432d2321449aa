//! Error taxonomy for gateway operations.
//!
//! Store-specific failure codes are translated here rather than leaked to
//! callers; every variant maps to an HTTP-style status for the transport
//! layer.

use std::fmt;

use crate::snippet::ValidationError;
use crate::store::StoreError;

/// Error type for project store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Field-level validation failure.
    Validation(ValidationError),
    /// Snippet (or referenced document) does not exist.
    NotFound(String),
    /// Ownership or visibility violation.
    PermissionDenied(String),
    /// Duplicate unique field.
    Conflict(String),
    /// External store/provider failure; retryable by the caller.
    Unavailable(String),
    /// Catch-all.
    Unknown(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Validation(e) => write!(f, "{}", e),
            GatewayError::NotFound(id) => write!(f, "not found: {}", id),
            GatewayError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            GatewayError::Conflict(msg) => write!(f, "conflict: {}", msg),
            GatewayError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            GatewayError::Unknown(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        GatewayError::Validation(err)
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => GatewayError::NotFound(id),
            StoreError::Conflict { collection, id } => {
                GatewayError::Conflict(format!("{}:{}", collection, id))
            }
            StoreError::Unavailable(msg) => GatewayError::Unavailable(msg),
            StoreError::Serde(msg) => GatewayError::Unknown(msg),
        }
    }
}

impl GatewayError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::NotFound(_) => 404,
            GatewayError::PermissionDenied(_) => 403,
            GatewayError::Conflict(_) => 409,
            GatewayError::Unavailable(_) => 503,
            GatewayError::Unknown(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::FieldError;

    #[test]
    fn status_codes() {
        let validation = GatewayError::Validation(ValidationError {
            errors: vec![FieldError {
                field: "title".into(),
                message: "must not be empty".into(),
            }],
        });
        assert_eq!(validation.status_code(), 400);
        assert_eq!(GatewayError::NotFound("x".into()).status_code(), 404);
        assert_eq!(GatewayError::PermissionDenied("x".into()).status_code(), 403);
        assert_eq!(GatewayError::Conflict("x".into()).status_code(), 409);
        assert_eq!(GatewayError::Unavailable("x".into()).status_code(), 503);
        assert_eq!(GatewayError::Unknown("x".into()).status_code(), 500);
    }

    #[test]
    fn store_errors_translate() {
        let err: GatewayError = StoreError::NotFound {
            collection: "projects".into(),
            id: "p1".into(),
        }
        .into();
        assert!(matches!(err, GatewayError::NotFound(ref id) if id == "p1"));

        let err: GatewayError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, GatewayError::Unavailable(_)));

        let err: GatewayError = StoreError::Serde("bad json".into()).into();
        assert!(matches!(err, GatewayError::Unknown(_)));
    }
}
