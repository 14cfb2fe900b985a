//! Equality filters for listing addresses
//!
//! List requests pass arbitrary query parameters; each parameter must name a
//! real address field and selects records whose field equals the value.

use std::collections::HashMap;

use core_kernel::{AddressId, FieldErrors};

use crate::address::Address;
use crate::postal_code;

/// Field names accepted as filters
pub const FIELDS: [&str; 7] = ["id", "cep", "uf", "bairro", "cidade", "logradouro", "complemento"];

/// Equality filter over address fields; an empty filter matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFilter {
    pub id: Option<AddressId>,
    pub cep: Option<String>,
    pub uf: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub logradouro: Option<String>,
    pub complemento: Option<String>,
}

impl AddressFilter {
    /// Creates a filter selecting one postal code
    pub fn by_cep(cep: impl Into<String>) -> Self {
        Self {
            cep: Some(postal_code::normalize(&cep.into())),
            ..Default::default()
        }
    }

    /// Builds a filter from request query parameters
    ///
    /// Unknown parameter names and unparsable identifiers are reported as
    /// field errors.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FieldErrors> {
        let mut filter = Self::default();
        let mut errors = FieldErrors::new();

        for (key, value) in params {
            match key.as_str() {
                "id" => match value.parse() {
                    Ok(id) => filter.id = Some(id),
                    Err(_) => errors.add("id", format!("'{}' is not a valid identifier.", value)),
                },
                "cep" => filter.cep = Some(postal_code::normalize(value)),
                "uf" => filter.uf = Some(value.clone()),
                "bairro" => filter.bairro = Some(value.clone()),
                "cidade" => filter.cidade = Some(value.clone()),
                "logradouro" => filter.logradouro = Some(value.clone()),
                "complemento" => filter.complemento = Some(value.clone()),
                other => errors.add(
                    FieldErrors::NON_FIELD,
                    format!("Cannot filter on '{}'. Choices are: {}.", other, FIELDS.join(", ")),
                ),
            }
        }

        errors.into_result().map(|_| filter)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true when every set field equals the address's value
    pub fn matches(&self, address: &Address) -> bool {
        fn eq(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |e| e == actual)
        }

        self.id.map_or(true, |id| id == address.id)
            && eq(&self.cep, &address.cep)
            && eq(&self.uf, &address.uf)
            && eq(&self.bairro, &address.bairro)
            && eq(&self.cidade, &address.cidade)
            && eq(&self.logradouro, &address.logradouro)
            && eq(&self.complemento, &address.complemento)
    }
}
