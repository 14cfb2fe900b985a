//! PostgreSQL Address Adapter
//!
//! Implements [`AddressPort`] on top of [`AddressRepository`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{AddressId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_address::{Address, AddressFilter, AddressPatch, AddressPort, NewAddress};

use crate::error::DatabaseError;
use crate::repositories::AddressRepository;

const ADAPTER_ID: &str = "postgres-address-adapter";

/// PostgreSQL-backed implementation of the AddressPort trait
#[derive(Debug, Clone)]
pub struct PostgresAddressAdapter {
    repository: AddressRepository,
    pool: PgPool,
}

impl PostgresAddressAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AddressRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresAddressAdapter {}

#[async_trait]
impl HealthCheckable for PostgresAddressAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl AddressPort for PostgresAddressAdapter {
    #[instrument(skip(self))]
    async fn list_addresses(&self, filter: &AddressFilter) -> Result<Vec<Address>, PortError> {
        let rows = self.repository.list(filter).await.map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Listed addresses");
        Ok(rows.into_iter().map(Address::from).collect())
    }

    #[instrument(skip(self, address), fields(cep = %address.cep))]
    async fn create_address(&self, address: NewAddress) -> Result<Address, PortError> {
        let id = AddressId::new();
        let row = self
            .repository
            .insert(id.into(), &address)
            .await
            .map_err(db_to_port_error)?;
        Ok(row.into())
    }

    #[instrument(skip(self), fields(address_id = %id))]
    async fn get_address(&self, id: AddressId) -> Result<Address, PortError> {
        let row = self.repository.get_by_id(id.into()).await.map_err(db_to_port_error)?;
        Ok(row.into())
    }

    #[instrument(skip(self, patch), fields(address_id = %id))]
    async fn update_address(&self, id: AddressId, patch: AddressPatch) -> Result<Address, PortError> {
        let row = self
            .repository
            .update(id.into(), &patch)
            .await
            .map_err(db_to_port_error)?;
        Ok(row.into())
    }

    #[instrument(skip(self), fields(address_id = %id))]
    async fn delete_address(&self, id: AddressId) -> Result<(), PortError> {
        self.repository.delete(id.into()).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn delete_all_addresses(&self) -> Result<u64, PortError> {
        self.repository.delete_all().await.map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn find_first_by_cep(&self, cep: &str) -> Result<Option<Address>, PortError> {
        let row = self
            .repository
            .find_first_by_cep(cep)
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(Address::from))
    }
}

fn db_to_port_error(error: DatabaseError) -> PortError {
    error.into_port_error("cep", "endereco")
}

/// Runs `SELECT 1` against the pool and reports the round trip
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}
