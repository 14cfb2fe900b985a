//! Person domain errors

use thiserror::Error;

use core_kernel::{FieldErrors, PortError};

use crate::person::EMAIL_TAKEN;

/// Errors returned by [`crate::PersonService`]
#[derive(Debug, Error)]
pub enum PersonError {
    /// No person with the given identifier
    #[error("Person not found: {0}")]
    NotFound(String),

    /// The payload or filter failed field validation
    #[error("Invalid person data: {0}")]
    Validation(FieldErrors),

    /// The store failed for another reason
    #[error(transparent)]
    Port(PortError),
}

impl PersonError {
    /// Localized message for the public API
    pub fn public_message(&self) -> String {
        match self {
            PersonError::NotFound(_) => "A pessoa procurada não existe na base atual.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<PortError> for PersonError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { id, .. } => PersonError::NotFound(id),
            PortError::Validation(errors) => PersonError::Validation(errors),
            // A unique violation that slipped past the service pre-check
            PortError::Conflict { field, .. } if field == "email" => {
                PersonError::Validation(FieldErrors::single("email", EMAIL_TAKEN))
            }
            PortError::Conflict { field, message } => {
                PersonError::Validation(FieldErrors::single(field, message))
            }
            other => PersonError::Port(other),
        }
    }
}

impl From<FieldErrors> for PersonError {
    fn from(errors: FieldErrors) -> Self {
        PersonError::Validation(errors)
    }
}
