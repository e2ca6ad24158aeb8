//! Resolver configuration.
//!
//! Everything the resolver needs is passed in here when it is built; nothing
//! is read from the environment.

use std::time::Duration;

use clap::ValueEnum;

use crate::geo::IpVersion;
use crate::provider::{default_endpoints, Endpoint};

pub const DEFAULT_USER_AGENT: &str = concat!("ipsight/", env!("CARGO_PKG_VERSION"));

/// Logging level for the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Candidate lists and transport settings for a [`crate::Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// IPv4 candidates, highest priority first
    pub ipv4: Vec<Endpoint>,
    /// IPv6 candidates, highest priority first
    pub ipv6: Vec<Endpoint>,
    /// Whole-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ResolverConfig {
    pub fn endpoints(&self, version: IpVersion) -> &[Endpoint] {
        match version {
            IpVersion::V4 => &self.ipv4,
            IpVersion::V6 => &self.ipv6,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ipv4: default_endpoints(IpVersion::V4),
            ipv6: default_endpoints(IpVersion::V6),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
