//! API error handling
//!
//! Every service error becomes a status code and JSON body here:
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | not found | 404 | `{"message": "..."}` |
//! | validation | 400 | `{"field": ["message", ...]}` |
//! | lookup status | upstream status | `{"message": "Falha na busca pelo cep ...!"}` |
//! | malformed lookup data | 502 | `{"message": "..."}` |
//! | store unreachable | 503 | `{"message": "..."}` |

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::{FieldErrors, PortError};
use domain_address::AddressError;
use domain_person::PersonError;

use crate::dto::MessageResponse;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::NotFound(message)
            | ApiError::Upstream { message, .. }
            | ApiError::BadGateway(message)
            | ApiError::ServiceUnavailable(message)
            | ApiError::Internal(message) => (status, Json(MessageResponse::new(message))).into_response(),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation(errors) => ApiError::Validation(errors),
            PortError::Conflict { field, message } => ApiError::Validation(FieldErrors::single(field, message)),
            PortError::Rejected { message } => ApiError::Validation(FieldErrors::single(FieldErrors::NON_FIELD, message)),
            PortError::Upstream { status, message } => ApiError::Upstream { status, message },
            PortError::Transformation { message } => ApiError::BadGateway(message),
            PortError::Connection { message, .. } => ApiError::ServiceUnavailable(message),
            PortError::Internal { message, .. } => ApiError::Internal(message),
        }
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        let message = err.public_message();
        match err {
            AddressError::NotFound(_) => ApiError::NotFound(message),
            AddressError::UpstreamFailure { status, .. } => ApiError::Upstream { status, message },
            AddressError::Validation(errors) => ApiError::Validation(errors),
            AddressError::MalformedUpstreamData(message) => ApiError::BadGateway(message),
            AddressError::Port(port) => port.into(),
        }
    }
}

impl From<PersonError> for ApiError {
    fn from(err: PersonError) -> Self {
        match err {
            PersonError::NotFound(_) => ApiError::NotFound(err.public_message()),
            PersonError::Validation(errors) => ApiError::Validation(errors),
            PersonError::Port(port) => port.into(),
        }
    }
}

/// Unparsable request bodies are reported under `non_field_errors`
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(FieldErrors::single(FieldErrors::NON_FIELD, rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_not_found_uses_public_message() {
        let err: ApiError = AddressError::NotFound("x".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "O endereço procurado não existe na base atual."));
    }

    #[test]
    fn test_upstream_failure_keeps_status() {
        let err: ApiError = AddressError::UpstreamFailure { status: 400, cep: "123".to_string() }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::Upstream { ref message, .. } if message == "Falha na busca pelo cep 123!"));
    }

    #[test]
    fn test_malformed_lookup_data_is_bad_gateway() {
        let err: ApiError = AddressError::MalformedUpstreamData("missing cep".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_connection_failure_is_unavailable() {
        let err: ApiError = PersonError::Port(PortError::connection("refused")).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
