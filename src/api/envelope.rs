//! Response envelope shared by every API route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::gateway::GatewayError;

/// `{success, message?, data?, details?}` — the shape of every response.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Field-level validation details, present only on 400s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Envelope {
    pub fn data(data: Value) -> Self {
        Envelope {
            success: true,
            message: None,
            data: Some(data),
            details: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: Value) -> Self {
        Envelope {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            message: Some(message.into()),
            data: None,
            details: None,
        }
    }
}

/// Translate a gateway error into an enveloped response.
///
/// Validation failures carry their field list in `details`; everything else
/// is a single blocking message at the taxonomy's status code.
pub(crate) fn error_response(err: GatewayError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let envelope = match &err {
        GatewayError::Validation(validation) => Envelope {
            success: false,
            message: Some("Validation Error".into()),
            data: None,
            details: serde_json::to_value(&validation.errors).ok(),
        },
        _ => Envelope::error(err.to_string()),
    };

    (status, Json(envelope)).into_response()
}

/// 401 for routes that require an authenticated actor.
pub(crate) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(Envelope::error("Authentication required")),
    )
        .into_response()
}
