//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_person::PersonPort;
//! use infra_db::adapters::PostgresPersonAdapter;
//!
//! let persons: Arc<dyn PersonPort> = Arc::new(PostgresPersonAdapter::new(pool));
//! ```

pub mod address;
pub mod person;

pub use address::PostgresAddressAdapter;
pub use person::PostgresPersonAdapter;
