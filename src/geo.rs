use console::style;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseVersionError;

/// IP protocol version of a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    #[serde(rename = "4")]
    V4,
    #[serde(rename = "6")]
    V6,
}

impl IpVersion {
    /// Classify an address by its text alone: anything containing a colon is
    /// v6, everything else is v4. The address grammar is not checked.
    pub fn detect(address: &str) -> IpVersion {
        if address.contains(':') {
            IpVersion::V6
        } else {
            IpVersion::V4
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::V4 => "4",
            IpVersion::V6 => "6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "v4" | "ipv4" => Ok(IpVersion::V4),
            "6" | "v6" | "ipv6" => Ok(IpVersion::V6),
            _ => Err(ParseVersionError(s.to_owned())),
        }
    }
}

/// One resolved public address plus whatever enrichment its provider sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "ip")]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "postal", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calling_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub asn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub version: IpVersion,
}

impl AddressRecord {
    /// A record carrying only the address and its derived version.
    pub fn new(address: &str) -> AddressRecord {
        AddressRecord {
            address: address.to_owned(),
            city: None,
            region: None,
            country: None,
            country_code: None,
            postal_code: None,
            timezone: None,
            utc_offset: None,
            currency: None,
            languages: None,
            calling_code: None,
            continent_code: None,
            isp: None,
            org: None,
            asn: None,
            network: None,
            latitude: None,
            longitude: None,
            version: IpVersion::detect(address),
        }
    }

    /// Set both coordinates, dropping any value that is not finite.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> AddressRecord {
        self.latitude = Some(latitude).filter(|v| v.is_finite());
        self.longitude = Some(longitude).filter(|v| v.is_finite());
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// "city, region, country" from whichever parts are known.
    pub fn location(&self) -> Option<String> {
        let parts = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Google Maps link for the coordinates. The (0, 0) fallback pair is not
    /// a real position, so it gets no link.
    pub fn maps_url(&self) -> Option<String> {
        match self.coordinates()? {
            (lat, lng) if lat == 0.0 && lng == 0.0 => None,
            (lat, lng) => Some(format!("https://www.google.com/maps?q={},{}", lat, lng)),
        }
    }
}

/// Split a provider's `"lat,lng"` string into two degrees.
///
/// Only the first two comma-separated values are read. A missing, empty,
/// single-valued or unparsable string falls back to
/// `(0.0, 0.0)`; neither half is ever NaN.
pub fn parse_lat_lng(loc: Option<&str>) -> (f64, f64) {
    let loc = match loc.map(str::trim) {
        Some(loc) if !loc.is_empty() => loc,
        _ => "0,0",
    };
    first_two_degrees(loc).unwrap_or((0.0, 0.0))
}

fn first_two_degrees(loc: &str) -> Option<(f64, f64)> {
    let mut parts = loc.split(',').map(|part| part.trim().parse::<f64>().ok());
    let lat = parts.next()??;
    let lng = parts.next()??;
    (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{}: {}",
            style(format!("IPv{}", self.version)).bold().red(),
            style(&self.address).green()
        )?;
        if let Some(location) = self.location() {
            writeln!(f, "Loc: {}", location)?;
        }
        if let Some(isp) = &self.isp {
            writeln!(f, "ISP: {}", isp)?;
        }
        if let Some(org) = &self.org {
            writeln!(f, "Org: {}", org)?;
        }
        Ok(())
    }
}
