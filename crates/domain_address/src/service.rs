//! Address domain service
//!
//! Orchestrates the address store and the postal lookup client. Handlers in
//! `interface_api` call this service; it never touches HTTP types.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use core_kernel::{AddressId, PortError};

use crate::address::{Address, AddressInput};
use crate::error::AddressError;
use crate::filter::AddressFilter;
use crate::ports::{AddressPort, PostalLookupPort};
use crate::postal_code;

/// Response of a successful lookup by postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub sucesso: bool,
    pub endereco: Address,
}

impl LookupResult {
    fn success(endereco: Address) -> Self {
        Self { sucesso: true, endereco }
    }
}

/// Service exposing the address operations
#[derive(Clone)]
pub struct AddressService {
    addresses: Arc<dyn AddressPort>,
    lookup: Arc<dyn PostalLookupPort>,
}

impl AddressService {
    pub fn new(addresses: Arc<dyn AddressPort>, lookup: Arc<dyn PostalLookupPort>) -> Self {
        Self { addresses, lookup }
    }

    /// Lists addresses matching the query parameters
    pub async fn list(&self, params: &HashMap<String, String>) -> Result<Vec<Address>, AddressError> {
        let filter = AddressFilter::from_params(params)?;
        Ok(self.addresses.list_addresses(&filter).await?)
    }

    /// Validates and persists a new address
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: AddressInput) -> Result<Address, AddressError> {
        let new = input.into_new()?;
        let address = self.addresses.create_address(new).await?;
        info!(address_id = %address.id, cep = %address.cep, "Address created");
        Ok(address)
    }

    pub async fn retrieve(&self, id: &str) -> Result<Address, AddressError> {
        let id = parse_id(id)?;
        Ok(self.addresses.get_address(id).await?)
    }

    /// Applies a partial update
    ///
    /// The identifier is resolved before the payload is validated, so an
    /// unknown identifier is reported as not found even for invalid payloads.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: AddressInput) -> Result<Address, AddressError> {
        let id = parse_id(id)?;
        let current = self.addresses.get_address(id).await?;
        let patch = input.into_patch()?;
        if patch.is_empty() {
            return Ok(current);
        }
        Ok(self.addresses.update_address(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AddressError> {
        let id = parse_id(id)?;
        self.addresses.delete_address(id).await?;
        info!(address_id = %id, "Address deleted");
        Ok(())
    }

    /// Deletes every address and returns how many were removed
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<u64, AddressError> {
        let count = self.addresses.delete_all_addresses().await?;
        info!(count, "All addresses deleted");
        Ok(count)
    }

    /// Returns the stored address for a postal code, fetching it on a miss
    ///
    /// The code is normalized first. A stored match is returned without any
    /// network call; otherwise the lookup client is called once and its
    /// result persisted as a new address.
    #[instrument(skip(self))]
    pub async fn find_or_fetch_by_code(&self, raw_code: &str) -> Result<LookupResult, AddressError> {
        let cep = postal_code::normalize(raw_code);

        if let Some(address) = self.addresses.find_first_by_cep(&cep).await? {
            debug!(address_id = %address.id, "Postal code found in store");
            return Ok(LookupResult::success(address));
        }

        let fetched = self.lookup.lookup(&cep).await.map_err(|e| match e {
            PortError::Upstream { status, .. } => AddressError::UpstreamFailure { status, cep: cep.clone() },
            other => AddressError::from(other),
        })?;

        let address = self.addresses.create_address(fetched).await.map_err(|e| match e {
            PortError::Rejected { message } => AddressError::MalformedUpstreamData(message),
            other => AddressError::from(other),
        })?;
        info!(address_id = %address.id, cep = %address.cep, "Address created from postal lookup");
        Ok(LookupResult::success(address))
    }
}

fn parse_id(raw: &str) -> Result<AddressId, AddressError> {
    raw.parse().map_err(|_| AddressError::NotFound(raw.to_string()))
}
