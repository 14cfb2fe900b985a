//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! CEP registry test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built and fake-generated addresses and persons
//! - `in_memory`: In-memory implementations of the domain ports
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertions on JSON error bodies
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod in_memory;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use in_memory::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
