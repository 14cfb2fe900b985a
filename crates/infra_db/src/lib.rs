//! Infrastructure Database Layer
//!
//! PostgreSQL storage for addresses and persons, using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! map rows, and adapters implement the domain ports on top of them.
//!
//! ```text
//!   AddressPort ──▶ PostgresAddressAdapter ──▶ AddressRepository ──▶ enderecos
//!   PersonPort  ──▶ PostgresPersonAdapter  ──▶ PersonRepository  ──▶ pessoas
//! ```
//!
//! Deleting an address cascades to the persons referencing it through the
//! `pessoas.endereco_id` foreign key.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresAddressAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/cep_registry")).await?;
//! run_migrations(&pool).await?;
//! let addresses = PostgresAddressAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
