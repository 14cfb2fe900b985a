//! Ports and Adapters Infrastructure
//!
//! Each domain crate defines a port trait for the data source it needs
//! (`AddressPort`, `PersonPort`, `PostalLookupPort`). Adapters implement these
//! traits either against PostgreSQL (`infra_db`), against the external postal
//! lookup service, or in memory for tests.
//!
//! ```text
//!        AddressService / PersonService
//!                     │
//!                     ▼
//!     AddressPort · PersonPort · PostalLookupPort
//!           ▲                ▲               ▲
//!    PostgreSQL adapters   InMemoryStore   ViaCepAdapter
//! ```
//!
//! All adapters report failures through [`PortError`] so services can handle
//! errors without knowing which adapter is behind the port.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::validation::FieldErrors;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested record was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Input failed field-level validation
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// The write conflicts with existing data (unique or foreign key constraint)
    #[error("Conflict on {field}: {message}")]
    Conflict {
        field: String,
        message: String,
    },

    /// The store refused a value (length, not-null or check constraint)
    #[error("Rejected by store: {message}")]
    Rejected {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external service answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
    },

    /// Data received from an external system could not be interpreted
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error for a field
    pub fn conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
        PortError::Conflict {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        PortError::Rejected {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Upstream error
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        PortError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

impl From<FieldErrors> for PortError {
    fn from(errors: FieldErrors) -> Self {
        PortError::Validation(errors)
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across request handlers, so they must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Builds a healthy result for the given adapter
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Builds an unhealthy result carrying the failure reason
    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
