//! PostgreSQL Person Adapter
//!
//! Implements [`PersonPort`] on top of [`PersonRepository`]. A unique
//! violation on insert or update surfaces as a conflict on `email`; a
//! dangling address reference as a conflict on `endereco`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{AddressId, DomainPort, HealthCheckResult, HealthCheckable, PersonId, PortError};
use domain_person::{NewPerson, Person, PersonFilter, PersonPatch, PersonPort};

use crate::adapters::address::ping;
use crate::error::DatabaseError;
use crate::repositories::PersonRepository;

const ADAPTER_ID: &str = "postgres-person-adapter";

/// PostgreSQL-backed implementation of the PersonPort trait
#[derive(Debug, Clone)]
pub struct PostgresPersonAdapter {
    repository: PersonRepository,
    pool: PgPool,
}

impl PostgresPersonAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PersonRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPersonAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPersonAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl PersonPort for PostgresPersonAdapter {
    #[instrument(skip(self))]
    async fn list_persons(&self, filter: &PersonFilter) -> Result<Vec<Person>, PortError> {
        let rows = self.repository.list(filter).await.map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Listed persons");
        Ok(rows.into_iter().map(Person::from).collect())
    }

    #[instrument(skip(self, person), fields(with_address = person.endereco.is_some()))]
    async fn create_person(&self, person: NewPerson) -> Result<Person, PortError> {
        let row = self
            .repository
            .insert(PersonId::new().into(), AddressId::new().into(), &person)
            .await
            .map_err(db_to_port_error)?;
        Ok(row.into())
    }

    #[instrument(skip(self), fields(person_id = %id))]
    async fn get_person(&self, id: PersonId) -> Result<Person, PortError> {
        let row = self.repository.get_by_id(id.into()).await.map_err(db_to_port_error)?;
        Ok(row.into())
    }

    #[instrument(skip(self, patch), fields(person_id = %id))]
    async fn update_person(&self, id: PersonId, patch: PersonPatch) -> Result<Person, PortError> {
        let row = self
            .repository
            .update(id.into(), &patch)
            .await
            .map_err(db_to_port_error)?;
        Ok(row.into())
    }

    #[instrument(skip(self), fields(person_id = %id))]
    async fn delete_person(&self, id: PersonId) -> Result<(), PortError> {
        self.repository.delete(id.into()).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn delete_all_persons(&self) -> Result<u64, PortError> {
        self.repository.delete_all().await.map_err(db_to_port_error)
    }

    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &str, except: Option<PersonId>) -> Result<bool, PortError> {
        self.repository
            .email_exists(email, except.map(Into::into))
            .await
            .map_err(db_to_port_error)
    }
}

fn db_to_port_error(error: DatabaseError) -> PortError {
    error.into_port_error("email", "endereco")
}
