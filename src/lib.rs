//! ipsight: look up the public IPv4 and IPv6 addresses of this host, with
//! whatever geolocation and network data free lookup services provide.
//!
//! ```no_run
//! use ipsight::{Resolver, ResolverConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let resolver = Resolver::new(ResolverConfig::default())?;
//! let found = resolver.resolve_both().await?;
//! println!("{}", found);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod geo;
pub mod logger;
pub mod provider;
pub mod report;
pub mod resolver;

pub use config::{LogLevel, ResolverConfig};
pub use error::{InitializationError, ProviderError, ResolveError};
pub use geo::{AddressRecord, IpVersion};
pub use provider::{Endpoint, Provider};
pub use resolver::{DualResolution, Resolution, Resolver};
