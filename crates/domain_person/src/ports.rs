//! Person Domain Ports
//!
//! [`PersonPort`] is the person store. It is implemented by
//! `infra_db::adapters::PostgresPersonAdapter` and by the in-memory store in
//! `test_utils`. Stores enforce email uniqueness and the address foreign key
//! themselves; violations come back as `PortError::Conflict`.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PersonId, PortError};

use crate::filter::PersonFilter;
use crate::person::{NewPerson, Person, PersonPatch};

/// Storage operations for person records
#[async_trait]
pub trait PersonPort: DomainPort + HealthCheckable {
    /// Lists persons matching the filter, in insertion order
    async fn list_persons(&self, filter: &PersonFilter) -> Result<Vec<Person>, PortError>;

    /// Persists a new person
    ///
    /// A nested address in `person.endereco` is created in the same
    /// transaction; if the person insert fails, no address is left behind.
    async fn create_person(&self, person: NewPerson) -> Result<Person, PortError>;

    /// Retrieves a person by identifier, or `PortError::NotFound`
    async fn get_person(&self, id: PersonId) -> Result<Person, PortError>;

    /// Applies the supplied fields of `patch`, or `PortError::NotFound`
    async fn update_person(&self, id: PersonId, patch: PersonPatch) -> Result<Person, PortError>;

    async fn delete_person(&self, id: PersonId) -> Result<(), PortError>;

    /// Deletes every person and returns the count
    async fn delete_all_persons(&self) -> Result<u64, PortError>;

    /// Returns true if any person other than `except` uses this email
    async fn email_exists(&self, email: &str, except: Option<PersonId>) -> Result<bool, PortError>;
}
