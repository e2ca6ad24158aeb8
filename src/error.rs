//! Error types.
//!
//! Provider errors never leave the resolver; they only explain in the logs why
//! an endpoint was skipped. Callers see `ResolveError` and, when setting up,
//! `InitializationError`.

use thiserror::Error;

use crate::geo::IpVersion;

/// Why a single endpoint produced no usable record.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection, TLS or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body was not the JSON the provider is expected to send.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload itself flagged an error.
    #[error("provider reported an error: {0}")]
    Reported(String),

    /// No address in the payload, or an empty one.
    #[error("response carried no address")]
    MissingAddress,

    /// The address belongs to the other IP version.
    #[error("expected an IPv{expected} address, got IPv{found}")]
    VersionMismatch { expected: IpVersion, found: IpVersion },
}

/// Resolution outcomes reported to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Every endpoint for this version was tried without a match.
    #[error("no IPv{0} address could be resolved")]
    NotFound(IpVersion),

    /// Neither version resolved.
    #[error("Unable to fetch IP address information. Please try again.")]
    Unavailable,
}

/// Failures while setting up the client or the logger.
#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("HTTP client initialization error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// An IP version string that is neither 4 nor 6.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid IP version '{0}', expected 4 or 6")]
pub struct ParseVersionError(pub String);
