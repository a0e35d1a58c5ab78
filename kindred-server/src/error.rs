//! Error handling for the Kindred server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kindred::KindredError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Kindred library error
    #[error("{0}")]
    Kindred(#[from] KindredError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Kindred(e) => match e {
                KindredError::Rejected(_) | KindredError::PartnershipRejected(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                KindredError::NotFound(_) => StatusCode::NOT_FOUND,
                KindredError::Conflict(_) => StatusCode::CONFLICT,
                KindredError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Kindred(e) => match e {
                KindredError::Rejected(_) | KindredError::PartnershipRejected(_) => "rejected",
                KindredError::NotFound(_) => "not_found",
                KindredError::Conflict(_) => "conflict",
                KindredError::InvalidInput(_) => "validation_error",
                KindredError::Storage(_) => "storage_error",
                KindredError::Serialization(_) => "serialization_error",
                KindredError::Configuration(_) => "configuration_error",
                KindredError::Logging(_) => "internal_error",
            },
            ServerError::Serialization(_) => "serialization_error",
        }
    }

    /// Machine-readable detail for rejected mutations
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServerError::Kindred(KindredError::Rejected(rejection)) => {
                Some(serde_json::json!({ "reason": rejection.code() }))
            }
            ServerError::Kindred(KindredError::PartnershipRejected(rejection)) => {
                Some(serde_json::json!({ "reason": rejection.code() }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            details: self.details(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kindred::graph::Rejection;

    #[test]
    fn test_rejection_maps_to_unprocessable_with_reason() {
        let err = ServerError::from(KindredError::Rejected(Rejection::Cycle));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_type(), "rejected");
        assert_eq!(err.details(), Some(serde_json::json!({ "reason": "cycle" })));
    }

    #[test]
    fn test_library_errors_map_to_status() {
        let cases = vec![
            (KindredError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (KindredError::Conflict("x".into()), StatusCode::CONFLICT),
            (KindredError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                KindredError::Configuration("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let err = ServerError::from(err);
            assert_eq!(err.status_code(), status);
            assert!(err.details().is_none());
        }
    }

    #[test]
    fn test_serialization_failure_is_internal() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ServerError::from(json_err);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "serialization_error");
    }
}
