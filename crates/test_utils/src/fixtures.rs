//! Pre-built Test Fixtures
//!
//! Fixed records for assertions on exact values, and fake-generated ones
//! for tests that only need something valid.

use fake::faker::address::en::{CityName, SecondaryAddress, StateAbbr, StreetName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::Fake;

use domain_address::{AddressInput, NewAddress};
use domain_person::{AddressPayload, NewPerson, PersonInput};

/// Fixture for address test data
pub struct AddressFixtures;

impl AddressFixtures {
    /// Postal code of [`AddressFixtures::teresina`]
    pub const TERESINA_CEP: &'static str = "64082550";

    /// A complete, valid address in Teresina
    pub fn teresina() -> NewAddress {
        NewAddress {
            cep: Self::TERESINA_CEP.to_string(),
            uf: "PI".to_string(),
            bairro: "Morada do Sol".to_string(),
            cidade: "Teresina".to_string(),
            logradouro: "Rua Alfa".to_string(),
            complemento: "Casa 2".to_string(),
        }
    }

    /// The Teresina address as a client payload, with a formatted postal code
    pub fn teresina_input() -> AddressInput {
        AddressInput {
            cep: "64082-550".into(),
            uf: "PI".into(),
            bairro: "Morada do Sol".into(),
            cidade: "Teresina".into(),
            logradouro: "Rua Alfa".into(),
            complemento: "Casa 2".into(),
        }
    }

    /// A random valid address
    pub fn fake() -> NewAddress {
        NewAddress {
            cep: format!("{:08}", (0..100_000_000u32).fake::<u32>()),
            uf: StateAbbr().fake(),
            bairro: clip(Word().fake(), 50),
            cidade: clip(CityName().fake(), 40),
            logradouro: clip(StreetName().fake(), 70),
            complemento: clip(SecondaryAddress().fake(), 70),
        }
    }

    /// A random valid address as a client payload
    pub fn fake_input() -> AddressInput {
        let address = Self::fake();
        AddressInput {
            cep: address.cep.into(),
            uf: address.uf.into(),
            bairro: address.bairro.into(),
            cidade: address.cidade.into(),
            logradouro: address.logradouro.into(),
            complemento: address.complemento.into(),
        }
    }
}

/// Fixture for person test data
pub struct PersonFixtures;

impl PersonFixtures {
    /// A person living at a new Teresina address
    pub fn with_address(email: &str) -> NewPerson {
        NewPerson {
            endereco: Some(AddressFixtures::teresina()),
            ..Self::without_address(email)
        }
    }

    pub fn without_address(email: &str) -> NewPerson {
        NewPerson {
            nome: clip(Name().fake(), 70),
            idade: (18..90).fake::<i32>(),
            email: email.to_string(),
            endereco: None,
        }
    }

    /// A client payload with a random name and email
    pub fn fake_input() -> PersonInput {
        PersonInput {
            nome: clip(Name().fake(), 70).into(),
            idade: (18..90).fake::<i32>().into(),
            email: SafeEmail().fake::<String>().into(),
            endereco: AddressPayload::Absent,
        }
    }
}

fn clip(value: String, max: usize) -> String {
    value.chars().take(max).collect()
}
