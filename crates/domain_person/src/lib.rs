//! Person Domain
//!
//! People with a unique email and an optional link to a stored address.
//! A person can be created together with a new nested address; on update,
//! the address is referenced by identifier and must already exist.
//! Deleting an address deletes the persons living there.

pub mod person;
pub mod filter;
pub mod error;
pub mod ports;
pub mod service;

pub use person::{AddressPayload, NewPerson, Person, PersonInput, PersonPatch, PersonUpdateInput, EMAIL_TAKEN};
pub use filter::PersonFilter;
pub use error::PersonError;
pub use ports::PersonPort;
pub use service::PersonService;
