//! Request/response bodies not owned by a domain crate
//!
//! Addresses and persons serialize straight from their domain types.

use serde::{Deserialize, Serialize};

/// Body of `{"message": "..."}` responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn address_deleted() -> Self {
        Self::new("Endereco deletado com sucesso!")
    }

    pub fn addresses_deleted(count: u64) -> Self {
        Self::new(format!("{} Endereco(s) deletado(s) com sucesso!", count))
    }

    pub fn person_deleted() -> Self {
        Self::new("Pessoa deletado com sucesso!")
    }

    pub fn persons_deleted(count: u64) -> Self {
        Self::new(format!("{} Pessoa(s) deletada(s) com sucesso!", count))
    }
}
