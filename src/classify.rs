//! IPv4 address range labels.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PRIVATE_RANGES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^10\.",
        r"^172\.(1[6-9]|2[0-9]|3[0-1])\.",
        r"^192\.168\.",
        r"^127\.",
        r"^169\.254\.",
    ]
    .iter()
    .map(|pattern| compile(pattern))
    .collect()
});

static PRIVATE_172: LazyLock<Regex> = LazyLock::new(|| compile(r"^172\.(1[6-9]|2[0-9]|3[0-1])\."));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|e| panic!("invalid address pattern '{}': {}", pattern, e))
}

/// True for RFC 1918, loopback and link-local IPv4 prefixes.
pub fn is_private_ip(ip: &str) -> bool {
    PRIVATE_RANGES.iter().any(|range| range.is_match(ip))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressClass {
    PrivateRange,
    Loopback,
    LinkLocal,
    PublicRange,
}

impl AddressClass {
    pub fn of(ip: &str) -> AddressClass {
        if ip.starts_with("10.") || ip.starts_with("192.168.") || PRIVATE_172.is_match(ip) {
            AddressClass::PrivateRange
        } else if ip.starts_with("127.") {
            AddressClass::Loopback
        } else if ip.starts_with("169.254.") {
            AddressClass::LinkLocal
        } else {
            AddressClass::PublicRange
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AddressClass::PrivateRange => "Private Range",
            AddressClass::Loopback => "Loopback",
            AddressClass::LinkLocal => "Link-Local",
            AddressClass::PublicRange => "Public Range",
        }
    }
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}
