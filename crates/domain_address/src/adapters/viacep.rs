//! ViaCEP Adapter
//!
//! Looks up address data for a postal code with a single
//! `GET {base_url}/ws/{cep}/xml/` request. The XML answer looks like:
//!
//! ```xml
//! <xmlcep>
//!   <cep>64082-550</cep>
//!   <logradouro>Rua Alfa</logradouro>
//!   <complemento></complemento>
//!   <bairro>Morada do Sol</bairro>
//!   <localidade>Teresina</localidade>
//!   <uf>PI</uf>
//! </xmlcep>
//! ```
//!
//! Error mapping:
//! - non-200 status -> `PortError::Upstream` with the same status
//! - `<erro>true</erro>` body -> `PortError::Upstream` with 404
//! - unparsable body or missing `cep` -> `PortError::Transformation`
//! - request not sent / body not read -> `PortError::Connection`
//!
//! Requests are never retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, PortError};

use crate::address::NewAddress;
use crate::ports::PostalLookupPort;
use crate::postal_code;

/// Default public ViaCEP endpoint
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// Configuration for the ViaCEP adapter
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// Scheme and host of the service, without trailing slash
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ViaCepConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the lookup URL for a normalized postal code
    pub fn lookup_url(&self, cep: &str) -> String {
        format!("{}/ws/{}/xml/", self.base_url, cep)
    }
}

/// reqwest-backed implementation of [`PostalLookupPort`]
#[derive(Debug, Clone)]
pub struct ViaCepAdapter {
    config: ViaCepConfig,
    client: reqwest::Client,
}

impl ViaCepAdapter {
    /// Creates an adapter with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` if the HTTP client cannot be built
    pub fn new(config: ViaCepConfig) -> Result<Self, PortError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PortError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ViaCepConfig {
        &self.config
    }
}

impl DomainPort for ViaCepAdapter {}

#[async_trait]
impl PostalLookupPort for ViaCepAdapter {
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    async fn lookup(&self, cep: &str) -> Result<NewAddress, PortError> {
        let url = self.config.lookup_url(cep);
        debug!(%url, "Requesting postal code lookup");

        let response = self.client.get(&url).send().await.map_err(|e| PortError::Connection {
            message: format!("Postal lookup request failed: {}", e),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "Postal lookup returned non-success status");
            return Err(PortError::upstream(status.as_u16(), format!("Falha na busca pelo cep {}!", cep)));
        }

        let body = response.text().await.map_err(|e| PortError::Connection {
            message: format!("Failed to read postal lookup response: {}", e),
            source: Some(Box::new(e)),
        })?;

        match parse_response(&body)? {
            LookupBody::Found(address) => Ok(address),
            LookupBody::Unknown => {
                warn!("Postal lookup reported unknown code");
                Err(PortError::upstream(404, format!("Falha na busca pelo cep {}!", cep)))
            }
        }
    }
}

/// Outcome of parsing a ViaCEP XML body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupBody {
    Found(NewAddress),
    /// The service recognised the request but has no such code
    Unknown,
}

#[derive(Debug, Deserialize)]
struct XmlCep {
    #[serde(default)]
    erro: Option<String>,
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

/// Parses a ViaCEP XML body into address data
///
/// The returned postal code is normalized.
pub fn parse_response(xml: &str) -> Result<LookupBody, PortError> {
    let parsed: XmlCep = quick_xml::de::from_str(xml)
        .map_err(|e| PortError::transformation(format!("Malformed postal lookup XML: {}", e)))?;

    if parsed.erro.as_deref().map(str::trim) == Some("true") {
        return Ok(LookupBody::Unknown);
    }

    let cep = postal_code::normalize(&parsed.cep);
    if cep.is_empty() {
        return Err(PortError::transformation("Postal lookup XML has no <cep> element"));
    }

    Ok(LookupBody::Found(NewAddress {
        cep,
        uf: parsed.uf,
        bairro: parsed.bairro,
        cidade: parsed.localidade,
        logradouro: parsed.logradouro,
        complemento: parsed.complemento,
    }))
}
