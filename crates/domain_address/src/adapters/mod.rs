//! External Adapters for the Address Domain
//!
//! - **ViaCepAdapter**: fetches address data for a postal code from the
//!   ViaCEP web service and parses its XML answer.
//!
//! Store adapters live in `infra_db` (PostgreSQL) and `test_utils`
//! (in-memory).

pub mod viacep;

pub use viacep::{ViaCepAdapter, ViaCepConfig};
