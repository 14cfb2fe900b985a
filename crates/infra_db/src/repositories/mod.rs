//! Repository implementations
//!
//! Repositories encapsulate the SQL for one table each and map between
//! database rows and domain types. Queries are built at runtime, so the
//! crate compiles without a live database.

pub mod address;
pub mod person;

pub use address::{AddressRepository, AddressRow};
pub use person::{PersonRepository, PersonRow};
