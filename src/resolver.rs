//! Per-version address resolution with provider fallback, and the dual
//! v4/v6 lookup built on top of it.

use log::{debug, info, warn};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::ResolverConfig;
use crate::error::{InitializationError, ProviderError, ResolveError};
use crate::geo::{AddressRecord, IpVersion};
use crate::provider::{Endpoint, Provider};

/// Resolves public addresses by walking a fixed list of lookup endpoints.
///
/// The resolver holds no state between calls: every lookup starts again at
/// the top of the candidate list.
#[derive(Debug, Clone)]
pub struct Resolver {
    client: Client,
    config: ResolverConfig,
}

/// Which versions a dual lookup produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both versions resolved.
    Complete,
    /// Exactly one version resolved.
    Partial,
}

/// Result of [`Resolver::resolve_both`]. At least one side is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualResolution {
    pub v4: Option<AddressRecord>,
    pub v6: Option<AddressRecord>,
}

impl DualResolution {
    pub fn status(&self) -> Resolution {
        if self.v4.is_some() && self.v6.is_some() {
            Resolution::Complete
        } else {
            Resolution::Partial
        }
    }

    pub fn get(&self, version: IpVersion) -> Option<&AddressRecord> {
        match version {
            IpVersion::V4 => self.v4.as_ref(),
            IpVersion::V6 => self.v6.as_ref(),
        }
    }
}

impl Resolver {
    /// Build a resolver with its own HTTP client.
    pub fn new(config: ResolverConfig) -> Result<Resolver, InitializationError> {
        let mut builder = ClientBuilder::new().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Resolver { client, config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the public address for one IP version.
    ///
    /// Endpoints are tried one at a time in declared order. Any failure,
    /// including an address of the wrong version, moves on to the next one;
    /// the first match is returned without contacting the rest.
    pub async fn resolve(&self, version: IpVersion) -> Result<AddressRecord, ResolveError> {
        for endpoint in self.config.endpoints(version) {
            debug!("IPv{}: trying {}", version, endpoint);
            match self.attempt(endpoint, version).await {
                Ok(record) => {
                    info!(
                        "IPv{} address {} resolved via {}",
                        version, record.address, endpoint.url
                    );
                    return Ok(record);
                }
                Err(e) => debug!("IPv{}: skipping {}: {}", version, endpoint, e),
            }
        }
        warn!("IPv{}: all lookup endpoints exhausted", version);
        Err(ResolveError::NotFound(version))
    }

    /// Resolve v4 and v6 concurrently.
    ///
    /// One side failing never stops the other. Only when both fail is the
    /// aggregate [`ResolveError::Unavailable`] returned.
    pub async fn resolve_both(&self) -> Result<DualResolution, ResolveError> {
        let (v4, v6) = futures::join!(self.resolve(IpVersion::V4), self.resolve(IpVersion::V6));
        match (v4.ok(), v6.ok()) {
            (None, None) => Err(ResolveError::Unavailable),
            (v4, v6) => Ok(DualResolution { v4, v6 }),
        }
    }

    async fn attempt(
        &self,
        endpoint: &Endpoint,
        expected: IpVersion,
    ) -> Result<AddressRecord, ProviderError> {
        let response = self.client.get(&endpoint.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        let body = decode_body(endpoint.provider, &text)?;
        let record = endpoint.provider.normalize(body)?;

        let found = IpVersion::detect(&record.address);
        if found != expected {
            return Err(ProviderError::VersionMismatch { expected, found });
        }
        Ok(record)
    }
}

/// Parse a response body. Bare-address providers may answer in plain text,
/// which is taken as the address itself.
fn decode_body(provider: Provider, text: &str) -> Result<Value, ProviderError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) if provider == Provider::Bare && !text.trim().is_empty() => {
            Ok(Value::String(text.trim().to_owned()))
        }
        Err(e) => Err(ProviderError::Decode(e)),
    }
}
