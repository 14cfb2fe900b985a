//! Address Domain Ports
//!
//! - [`AddressPort`]: the address store. Implemented by
//!   `infra_db::adapters::PostgresAddressAdapter` and by the in-memory store
//!   in `test_utils`.
//! - [`PostalLookupPort`]: the third-party postal code service. Implemented
//!   by [`crate::adapters::ViaCepAdapter`].
//!
//! Both return [`PortError`] so the service layer does not depend on the
//! adapter in use.

use async_trait::async_trait;

use core_kernel::{AddressId, DomainPort, HealthCheckable, PortError};

use crate::address::{Address, AddressPatch, NewAddress};
use crate::filter::AddressFilter;

/// Storage operations for address records
#[async_trait]
pub trait AddressPort: DomainPort + HealthCheckable {
    /// Lists addresses matching the filter, in insertion order
    async fn list_addresses(&self, filter: &AddressFilter) -> Result<Vec<Address>, PortError>;

    /// Persists a new address and returns it with its generated identifier
    async fn create_address(&self, address: NewAddress) -> Result<Address, PortError>;

    /// Retrieves an address by identifier, or `PortError::NotFound`
    async fn get_address(&self, id: AddressId) -> Result<Address, PortError>;

    /// Applies the supplied fields of `patch`, or `PortError::NotFound`
    async fn update_address(&self, id: AddressId, patch: AddressPatch) -> Result<Address, PortError>;

    /// Deletes an address and every person referencing it
    async fn delete_address(&self, id: AddressId) -> Result<(), PortError>;

    /// Deletes every address (cascading to persons) and returns the count
    async fn delete_all_addresses(&self) -> Result<u64, PortError>;

    /// Returns the earliest-inserted address with exactly this postal code
    async fn find_first_by_cep(&self, cep: &str) -> Result<Option<Address>, PortError>;
}

/// Client for the external postal code lookup service
#[async_trait]
pub trait PostalLookupPort: DomainPort {
    /// Fetches address data for an already normalized postal code
    ///
    /// # Errors
    ///
    /// - `PortError::Upstream` when the service answers with a non-success
    ///   status or reports the code as unknown
    /// - `PortError::Transformation` when the response body cannot be parsed
    /// - `PortError::Connection` when the request could not be sent
    async fn lookup(&self, cep: &str) -> Result<NewAddress, PortError>;
}
