//! Person domain service

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};

use core_kernel::{FieldErrors, PersonId};
use domain_address::AddressPort;

use crate::error::PersonError;
use crate::filter::PersonFilter;
use crate::person::{address_not_found, Person, PersonInput, PersonUpdateInput, EMAIL_TAKEN};
use crate::ports::PersonPort;

/// Service exposing the person operations
///
/// Holds the address port as well, to resolve address references on update.
#[derive(Clone)]
pub struct PersonService {
    persons: Arc<dyn PersonPort>,
    addresses: Arc<dyn AddressPort>,
}

impl PersonService {
    pub fn new(persons: Arc<dyn PersonPort>, addresses: Arc<dyn AddressPort>) -> Self {
        Self { persons, addresses }
    }

    /// Lists persons matching the query parameters
    pub async fn list(&self, params: &HashMap<String, String>) -> Result<Vec<Person>, PersonError> {
        let filter = PersonFilter::from_params(params)?;
        Ok(self.persons.list_persons(&filter).await?)
    }

    /// Validates and persists a new person, with its nested address if given
    ///
    /// Field errors and a duplicate email are reported together.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: PersonInput) -> Result<Person, PersonError> {
        let email = input.email.clone().into_text().ok().flatten();
        let validated = input.into_new();

        let mut errors = match &validated {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors.clone(),
        };
        if let Some(email) = email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            if !errors.contains("email") && self.persons.email_exists(email, None).await? {
                errors.add("email", EMAIL_TAKEN);
            }
        }

        let new = match validated {
            Ok(new) if errors.is_empty() => new,
            _ => return Err(PersonError::Validation(errors)),
        };

        let person = self.persons.create_person(new).await?;
        info!(person_id = %person.id, with_address = person.endereco.is_some(), "Person created");
        Ok(person)
    }

    pub async fn retrieve(&self, id: &str) -> Result<Person, PersonError> {
        let id = parse_id(id)?;
        Ok(self.persons.get_person(id).await?)
    }

    /// Applies a partial update
    ///
    /// An `endereco` value must name an existing address; otherwise nothing
    /// is persisted.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: PersonUpdateInput) -> Result<Person, PersonError> {
        let id = parse_id(id)?;
        let current = self.persons.get_person(id).await?;

        let patch = input.into_patch()?;
        let mut errors = FieldErrors::new();

        if let Some(address_id) = patch.endereco {
            match self.addresses.get_address(address_id).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => errors.add("endereco", address_not_found(&address_id.to_string())),
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(email) = patch.email.as_deref() {
            if email != current.email && self.persons.email_exists(email, Some(id)).await? {
                errors.add("email", EMAIL_TAKEN);
            }
        }

        errors.into_result()?;
        if patch.is_empty() {
            return Ok(current);
        }

        let person = self.persons.update_person(id, patch).await?;
        info!(person_id = %person.id, "Person updated");
        Ok(person)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), PersonError> {
        let id = parse_id(id)?;
        self.persons.delete_person(id).await?;
        info!(person_id = %id, "Person deleted");
        Ok(())
    }

    /// Deletes every person and returns how many were removed
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<u64, PersonError> {
        let count = self.persons.delete_all_persons().await?;
        info!(count, "All persons deleted");
        Ok(count)
    }
}

fn parse_id(raw: &str) -> Result<PersonId, PersonError> {
    raw.parse().map_err(|_| PersonError::NotFound(raw.to_string()))
}
