//! Address records and their validation
//!
//! Field names follow the public JSON contract (`cep`, `uf`, `bairro`,
//! `cidade`, `logradouro`, `complemento`).

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::input::{optional_text, required_text};
use core_kernel::{AddressId, FieldErrors, FieldValue};

use crate::postal_code;

const CEP_DIGITS: &str = "Ensure this field contains only digits.";

/// A stored postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    /// Normalized postal code
    pub cep: String,
    /// State or region code
    pub uf: String,
    /// Neighborhood
    pub bairro: String,
    /// City
    pub cidade: String,
    /// Street or primary address line
    pub logradouro: String,
    /// Secondary address line
    pub complemento: String,
}

impl Address {
    /// Returns a copy with the supplied patch fields applied
    pub fn patched(&self, patch: &AddressPatch) -> Address {
        let mut updated = self.clone();
        if let Some(cep) = &patch.cep {
            updated.cep = cep.clone();
        }
        if let Some(uf) = &patch.uf {
            updated.uf = uf.clone();
        }
        if let Some(bairro) = &patch.bairro {
            updated.bairro = bairro.clone();
        }
        if let Some(cidade) = &patch.cidade {
            updated.cidade = cidade.clone();
        }
        if let Some(logradouro) = &patch.logradouro {
            updated.logradouro = logradouro.clone();
        }
        if let Some(complemento) = &patch.complemento {
            updated.complemento = complemento.clone();
        }
        updated
    }
}

/// Validated data for a new address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewAddress {
    #[validate(length(max = 8, message = "Ensure this field has no more than 8 characters."))]
    pub cep: String,
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub uf: String,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub bairro: String,
    #[validate(length(max = 40, message = "Ensure this field has no more than 40 characters."))]
    pub cidade: String,
    #[validate(length(max = 70, message = "Ensure this field has no more than 70 characters."))]
    pub logradouro: String,
    #[validate(length(max = 70, message = "Ensure this field has no more than 70 characters."))]
    pub complemento: String,
}

impl NewAddress {
    /// Attaches an identifier, producing the stored form
    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            cep: self.cep,
            uf: self.uf,
            bairro: self.bairro,
            cidade: self.cidade,
            logradouro: self.logradouro,
            complemento: self.complemento,
        }
    }
}

/// Validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AddressPatch {
    #[validate(length(max = 8, message = "Ensure this field has no more than 8 characters."))]
    pub cep: Option<String>,
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub uf: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub bairro: Option<String>,
    #[validate(length(max = 40, message = "Ensure this field has no more than 40 characters."))]
    pub cidade: Option<String>,
    #[validate(length(max = 70, message = "Ensure this field has no more than 70 characters."))]
    pub logradouro: Option<String>,
    #[validate(length(max = 70, message = "Ensure this field has no more than 70 characters."))]
    pub complemento: Option<String>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        self.cep.is_none()
            && self.uf.is_none()
            && self.bairro.is_none()
            && self.cidade.is_none()
            && self.logradouro.is_none()
            && self.complemento.is_none()
    }
}

/// Unvalidated address payload as received from a client
///
/// Every field is loosely typed at this stage so that missing, `null` or
/// mistyped fields are reported together with other field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub cep: FieldValue,
    #[serde(default)]
    pub uf: FieldValue,
    #[serde(default)]
    pub bairro: FieldValue,
    #[serde(default)]
    pub cidade: FieldValue,
    #[serde(default)]
    pub logradouro: FieldValue,
    #[serde(default)]
    pub complemento: FieldValue,
}

impl AddressInput {
    /// Validates the payload as a complete new address
    ///
    /// All fields are required and may not be blank. The postal code is
    /// normalized before its length and digits are checked.
    pub fn into_new(self) -> Result<NewAddress, FieldErrors> {
        let mut errors = FieldErrors::new();

        let cep = required_text(&mut errors, "cep", self.cep).map(|c| postal_code::normalize(&c));
        let uf = required_text(&mut errors, "uf", self.uf);
        let bairro = required_text(&mut errors, "bairro", self.bairro);
        let cidade = required_text(&mut errors, "cidade", self.cidade);
        let logradouro = required_text(&mut errors, "logradouro", self.logradouro);
        let complemento = required_text(&mut errors, "complemento", self.complemento);

        let (Some(cep), Some(uf), Some(bairro), Some(cidade), Some(logradouro), Some(complemento)) =
            (cep, uf, bairro, cidade, logradouro, complemento)
        else {
            return Err(errors);
        };

        let new = NewAddress { cep, uf, bairro, cidade, logradouro, complemento };
        if let Err(e) = new.validate() {
            errors.merge(e.into());
        }
        check_cep_digits(&mut errors, &new.cep);
        errors.into_result().map(|_| new)
    }

    /// Validates the payload as a partial update
    pub fn into_patch(self) -> Result<AddressPatch, FieldErrors> {
        let mut errors = FieldErrors::new();

        let patch = AddressPatch {
            cep: optional_text(&mut errors, "cep", self.cep).map(|c| postal_code::normalize(&c)),
            uf: optional_text(&mut errors, "uf", self.uf),
            bairro: optional_text(&mut errors, "bairro", self.bairro),
            cidade: optional_text(&mut errors, "cidade", self.cidade),
            logradouro: optional_text(&mut errors, "logradouro", self.logradouro),
            complemento: optional_text(&mut errors, "complemento", self.complemento),
        };

        if let Err(e) = patch.validate() {
            errors.merge(e.into());
        }
        if let Some(cep) = &patch.cep {
            check_cep_digits(&mut errors, cep);
        }
        errors.into_result().map(|_| patch)
    }
}

fn check_cep_digits(errors: &mut FieldErrors, cep: &str) {
    if !cep.is_empty() && !postal_code::is_digits(cep) && !errors.contains("cep") {
        errors.add("cep", CEP_DIGITS);
    }
}
