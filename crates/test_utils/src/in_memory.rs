//! In-memory port implementations
//!
//! [`InMemoryStore`] implements both [`AddressPort`] and [`PersonPort`] over
//! one shared state, so deleting an address cascades to its persons the way
//! the database foreign key does. [`StubPostalLookup`] answers lookups from a
//! fixed table and counts calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use validator::Validate;

use core_kernel::{AddressId, DomainPort, FieldErrors, HealthCheckResult, HealthCheckable, PersonId, PortError};
use domain_address::{Address, AddressFilter, AddressPatch, AddressPort, NewAddress, PostalLookupPort};
use domain_person::{NewPerson, Person, PersonFilter, PersonPatch, PersonPort};

#[derive(Debug, Clone)]
struct StoredPerson {
    id: PersonId,
    nome: String,
    idade: i32,
    email: String,
    endereco: Option<AddressId>,
}

#[derive(Debug, Default)]
struct State {
    // Vecs keep insertion order for listings
    addresses: Vec<Address>,
    persons: Vec<StoredPerson>,
}

impl State {
    fn hydrate(&self, stored: &StoredPerson) -> Person {
        let endereco = stored
            .endereco
            .and_then(|id| self.addresses.iter().find(|a| a.id == id).cloned());
        Person {
            id: stored.id,
            nome: stored.nome.clone(),
            idade: stored.idade,
            email: stored.email.clone(),
            endereco,
        }
    }

    fn email_taken(&self, email: &str, except: Option<PersonId>) -> bool {
        self.persons
            .iter()
            .any(|p| p.email == email && Some(p.id) != except)
    }
}

/// Rejects values that would not fit the `enderecos` columns
fn check_columns(address: &NewAddress) -> Result<(), PortError> {
    address
        .validate()
        .map_err(|e| PortError::rejected(format!("value too long: {}", FieldErrors::from(e))))
}

/// Address and person store held in memory
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    healthy: Arc<AtomicBool>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Makes subsequent health checks report this status
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub async fn address_count(&self) -> usize {
        self.state.read().await.addresses.len()
    }

    pub async fn person_count(&self) -> usize {
        self.state.read().await.persons.len()
    }
}

impl DomainPort for InMemoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        if self.healthy.load(Ordering::SeqCst) {
            HealthCheckResult::healthy("in-memory-store", 0)
        } else {
            HealthCheckResult::unhealthy("in-memory-store", 0, "Store marked unhealthy")
        }
    }
}

#[async_trait]
impl AddressPort for InMemoryStore {
    async fn list_addresses(&self, filter: &AddressFilter) -> Result<Vec<Address>, PortError> {
        let state = self.state.read().await;
        Ok(state.addresses.iter().filter(|a| filter.matches(a)).cloned().collect())
    }

    async fn create_address(&self, address: NewAddress) -> Result<Address, PortError> {
        check_columns(&address)?;
        let address = address.into_address(AddressId::new());
        self.state.write().await.addresses.push(address.clone());
        Ok(address)
    }

    async fn get_address(&self, id: AddressId) -> Result<Address, PortError> {
        let state = self.state.read().await;
        state
            .addresses
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Endereco", id))
    }

    async fn update_address(&self, id: AddressId, patch: AddressPatch) -> Result<Address, PortError> {
        let mut state = self.state.write().await;
        let address = state
            .addresses
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| PortError::not_found("Endereco", id))?;
        *address = address.patched(&patch);
        Ok(address.clone())
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let before = state.addresses.len();
        state.addresses.retain(|a| a.id != id);
        if state.addresses.len() == before {
            return Err(PortError::not_found("Endereco", id));
        }
        state.persons.retain(|p| p.endereco != Some(id));
        Ok(())
    }

    async fn delete_all_addresses(&self) -> Result<u64, PortError> {
        let mut state = self.state.write().await;
        let count = state.addresses.len() as u64;
        state.addresses.clear();
        state.persons.retain(|p| p.endereco.is_none());
        Ok(count)
    }

    async fn find_first_by_cep(&self, cep: &str) -> Result<Option<Address>, PortError> {
        let state = self.state.read().await;
        Ok(state.addresses.iter().find(|a| a.cep == cep).cloned())
    }
}

#[async_trait]
impl PersonPort for InMemoryStore {
    async fn list_persons(&self, filter: &PersonFilter) -> Result<Vec<Person>, PortError> {
        let state = self.state.read().await;
        Ok(state
            .persons
            .iter()
            .map(|p| state.hydrate(p))
            .filter(|p| filter.matches(p))
            .collect())
    }

    async fn create_person(&self, person: NewPerson) -> Result<Person, PortError> {
        let mut state = self.state.write().await;
        if state.email_taken(&person.email, None) {
            return Err(PortError::conflict("email", "duplicate key value violates unique constraint"));
        }
        if let Some(address) = &person.endereco {
            check_columns(address)?;
        }

        let endereco = person.endereco.map(|new| {
            let address = new.into_address(AddressId::new());
            let id = address.id;
            state.addresses.push(address);
            id
        });

        let stored = StoredPerson {
            id: PersonId::new(),
            nome: person.nome,
            idade: person.idade,
            email: person.email,
            endereco,
        };
        let created = state.hydrate(&stored);
        state.persons.push(stored);
        Ok(created)
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, PortError> {
        let state = self.state.read().await;
        state
            .persons
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.hydrate(p))
            .ok_or_else(|| PortError::not_found("Pessoa", id))
    }

    async fn update_person(&self, id: PersonId, patch: PersonPatch) -> Result<Person, PortError> {
        let mut state = self.state.write().await;

        if let Some(email) = &patch.email {
            if state.email_taken(email, Some(id)) {
                return Err(PortError::conflict("email", "duplicate key value violates unique constraint"));
            }
        }
        if let Some(address_id) = patch.endereco {
            if !state.addresses.iter().any(|a| a.id == address_id) {
                return Err(PortError::conflict("endereco", "foreign key violation"));
            }
        }

        let stored = state
            .persons
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PortError::not_found("Pessoa", id))?;
        if let Some(nome) = patch.nome {
            stored.nome = nome;
        }
        if let Some(idade) = patch.idade {
            stored.idade = idade;
        }
        if let Some(email) = patch.email {
            stored.email = email;
        }
        if let Some(endereco) = patch.endereco {
            stored.endereco = Some(endereco);
        }

        let stored = stored.clone();
        Ok(state.hydrate(&stored))
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let before = state.persons.len();
        state.persons.retain(|p| p.id != id);
        if state.persons.len() == before {
            return Err(PortError::not_found("Pessoa", id));
        }
        Ok(())
    }

    async fn delete_all_persons(&self) -> Result<u64, PortError> {
        let mut state = self.state.write().await;
        let count = state.persons.len() as u64;
        state.persons.clear();
        Ok(count)
    }

    async fn email_exists(&self, email: &str, except: Option<PersonId>) -> Result<bool, PortError> {
        Ok(self.state.read().await.email_taken(email, except))
    }
}

#[derive(Debug, Clone)]
enum StubResponse {
    Found(NewAddress),
    Status(u16),
    Malformed,
}

/// Postal lookup answering from a fixed table
///
/// Codes not in the table are reported as unknown (upstream 404).
#[derive(Debug, Clone, Default)]
pub struct StubPostalLookup {
    responses: HashMap<String, StubResponse>,
    calls: Arc<AtomicUsize>,
}

impl StubPostalLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers lookups of `address.cep` with this address
    pub fn with_address(mut self, address: NewAddress) -> Self {
        self.responses.insert(address.cep.clone(), StubResponse::Found(address));
        self
    }

    /// Answers lookups of `cep` with a non-success status
    pub fn with_status(mut self, cep: impl Into<String>, status: u16) -> Self {
        self.responses.insert(cep.into(), StubResponse::Status(status));
        self
    }

    /// Answers lookups of `cep` with an unparsable body
    pub fn with_malformed(mut self, cep: impl Into<String>) -> Self {
        self.responses.insert(cep.into(), StubResponse::Malformed);
        self
    }

    /// Number of lookups performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DomainPort for StubPostalLookup {}

#[async_trait]
impl PostalLookupPort for StubPostalLookup {
    async fn lookup(&self, cep: &str) -> Result<NewAddress, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(cep) {
            Some(StubResponse::Found(address)) => Ok(address.clone()),
            Some(StubResponse::Status(status)) => {
                Err(PortError::upstream(*status, format!("Falha na busca pelo cep {}!", cep)))
            }
            Some(StubResponse::Malformed) => Err(PortError::transformation("missing cep element")),
            None => Err(PortError::upstream(404, format!("Falha na busca pelo cep {}!", cep))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{AddressFixtures, PersonFixtures};

    #[tokio::test]
    async fn test_delete_address_cascades_to_persons() {
        let store = InMemoryStore::new();
        let person = store
            .create_person(PersonFixtures::with_address("a@example.com"))
            .await
            .unwrap();
        let loner = store
            .create_person(PersonFixtures::without_address("b@example.com"))
            .await
            .unwrap();

        let address_id = person.address_id().unwrap();
        store.delete_address(address_id).await.unwrap();

        assert!(store.get_person(person.id).await.unwrap_err().is_not_found());
        assert!(store.get_person(loner.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryStore::new();
        let first = store.create_address(AddressFixtures::teresina()).await.unwrap();
        let second = store.create_address(AddressFixtures::fake()).await.unwrap();

        let all = store.list_addresses(&AddressFilter::default()).await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let store = InMemoryStore::new();
        store.create_person(PersonFixtures::without_address("x@example.com")).await.unwrap();
        let err = store
            .create_person(PersonFixtures::without_address("x@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn test_over_long_address_is_rejected() {
        let store = InMemoryStore::new();
        let address = NewAddress { cidade: "x".repeat(41), ..AddressFixtures::teresina() };
        let err = store.create_address(address).await.unwrap_err();
        assert!(matches!(err, PortError::Rejected { .. }));
        assert_eq!(store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_stub_lookup_counts_calls() {
        let stub = StubPostalLookup::new().with_address(AddressFixtures::teresina());
        assert!(stub.lookup("64082550").await.is_ok());
        assert!(matches!(stub.lookup("00000000").await, Err(PortError::Upstream { status: 404, .. })));
        assert_eq!(stub.calls(), 2);
    }
}
