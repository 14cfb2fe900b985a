//! Address Domain
//!
//! Postal addresses keyed by Brazilian postal code (CEP), plus enrichment
//! from the ViaCEP lookup service when a code is not stored yet.
//!
//! # Example
//!
//! ```rust
//! use domain_address::{AddressInput, postal_code};
//!
//! assert_eq!(postal_code::normalize("64082-550"), "64082550");
//!
//! let new = AddressInput {
//!     cep: "64.082-550".into(),
//!     uf: "PI".into(),
//!     bairro: "Morada do Sol".into(),
//!     cidade: "Teresina".into(),
//!     logradouro: "Rua Alfa".into(),
//!     complemento: "Casa 2".into(),
//! }
//! .into_new()
//! .unwrap();
//!
//! assert_eq!(new.cep, "64082550");
//! ```

pub mod address;
pub mod postal_code;
pub mod filter;
pub mod error;
pub mod ports;
pub mod adapters;
pub mod service;

pub use address::{Address, AddressInput, AddressPatch, NewAddress};
pub use filter::AddressFilter;
pub use error::AddressError;
pub use ports::{AddressPort, PostalLookupPort};
pub use adapters::{ViaCepAdapter, ViaCepConfig};
pub use service::{AddressService, LookupResult};
