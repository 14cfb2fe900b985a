//! Core Kernel - Foundational types for the CEP registry
//!
//! This crate provides the building blocks shared by the address and person
//! domains, the database layer and the HTTP layer:
//! - Strongly-typed record identifiers
//! - The port error type returned by every store and lookup adapter
//! - Field-level validation errors in the `{field: [messages]}` shape
//! - Loosely typed request fields coerced per field

pub mod identifiers;
pub mod input;
pub mod ports;
pub mod validation;

pub use identifiers::{AddressId, PersonId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use input::FieldValue;
pub use validation::{FieldEntry, FieldErrors};
