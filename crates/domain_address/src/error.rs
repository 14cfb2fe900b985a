//! Address domain errors

use thiserror::Error;

use core_kernel::{FieldErrors, PortError};

/// Errors returned by [`crate::AddressService`]
#[derive(Debug, Error)]
pub enum AddressError {
    /// No address with the given identifier
    #[error("Address not found: {0}")]
    NotFound(String),

    /// The payload or filter failed field validation
    #[error("Invalid address data: {0}")]
    Validation(FieldErrors),

    /// The lookup service answered with a non-success status
    #[error("Postal lookup for {cep} failed with status {status}")]
    UpstreamFailure { status: u16, cep: String },

    /// The lookup service answered with data that could not be parsed
    #[error("Malformed postal lookup data: {0}")]
    MalformedUpstreamData(String),

    /// The store or lookup client failed for another reason
    #[error(transparent)]
    Port(PortError),
}

impl AddressError {
    /// Localized message for the public API
    pub fn public_message(&self) -> String {
        match self {
            AddressError::NotFound(_) => "O endereço procurado não existe na base atual.".to_string(),
            AddressError::UpstreamFailure { cep, .. } => format!("Falha na busca pelo cep {}!", cep),
            other => other.to_string(),
        }
    }
}

impl From<PortError> for AddressError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { id, .. } => AddressError::NotFound(id),
            PortError::Validation(errors) => AddressError::Validation(errors),
            PortError::Conflict { field, message } => {
                AddressError::Validation(FieldErrors::single(field, message))
            }
            PortError::Transformation { message } => AddressError::MalformedUpstreamData(message),
            other => AddressError::Port(other),
        }
    }
}

impl From<FieldErrors> for AddressError {
    fn from(errors: FieldErrors) -> Self {
        AddressError::Validation(errors)
    }
}
