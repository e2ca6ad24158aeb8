//! Lookup providers and their response normalization.
//!
//! Every endpoint is declared together with a [`Provider`] tag, and the tag
//! alone picks the normalization function. Response shapes are never sniffed.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::error::ProviderError;
use crate::geo::{parse_lat_lng, AddressRecord, IpVersion};

/// The provider families the resolver knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// ipapi.co: rich geolocation, fields passed through.
    Ipapi,
    /// ipinfo.io: geolocation with a combined `loc` string.
    Ipinfo,
    /// ipify and similar: the address and nothing else.
    Bare,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Ipapi => "ipapi",
            Provider::Ipinfo => "ipinfo",
            Provider::Bare => "bare",
        }
    }

    /// Turn a decoded body into a record.
    pub fn normalize(&self, body: Value) -> Result<AddressRecord, ProviderError> {
        match self {
            Provider::Ipapi => normalize_ipapi(body),
            Provider::Ipinfo => normalize_ipinfo(body),
            Provider::Bare => normalize_bare(body),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub provider: Provider,
    pub url: String,
}

impl Endpoint {
    pub fn new(provider: Provider, url: impl Into<String>) -> Endpoint {
        Endpoint {
            provider,
            url: url.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.provider)
    }
}

pub const IPAPI_URL: &str = "https://ipapi.co/json/";
pub const IPINFO_URL: &str = "https://ipinfo.io/json";
pub const IPIFY_URL: &str = "https://api.ipify.org?format=json";
pub const IPIFY64_URL: &str = "https://api64.ipify.org?format=json";

/// Default IPv4 candidates, highest priority first.
fn default_ipv4_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new(Provider::Ipapi, IPAPI_URL),
        Endpoint::new(Provider::Ipinfo, IPINFO_URL),
        Endpoint::new(Provider::Bare, IPIFY_URL),
    ]
}

/// Default IPv6 candidates. ipinfo.io only answers over v4, so it is absent.
fn default_ipv6_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new(Provider::Bare, IPIFY64_URL),
        Endpoint::new(Provider::Ipapi, IPAPI_URL),
    ]
}

/// The candidate list for a version.
pub fn default_endpoints(version: IpVersion) -> Vec<Endpoint> {
    match version {
        IpVersion::V4 => default_ipv4_endpoints(),
        IpVersion::V6 => default_ipv6_endpoints(),
    }
}

#[derive(Debug, Deserialize)]
struct IpinfoPayload {
    ip: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    loc: Option<String>,
    org: Option<String>,
    postal: Option<String>,
    timezone: Option<String>,
}

/// JSON truthiness, as the error flags are loosely typed.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn error_message(error: &Value, reason: Option<String>) -> String {
    reason
        .or_else(|| error.get("message").and_then(Value::as_str).map(str::to_owned))
        .or_else(|| error.get("title").and_then(Value::as_str).map(str::to_owned))
        .or_else(|| error.as_str().map(str::to_owned))
        .unwrap_or_else(|| error.to_string())
}

fn address_of(ip: Option<String>) -> Result<String, ProviderError> {
    match ip.map(|ip| ip.trim().to_owned()) {
        Some(ip) if !ip.is_empty() => Ok(ip),
        _ => Err(ProviderError::MissingAddress),
    }
}

/// A string field, or a number rendered as text. Other types count as absent.
fn text(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A finite number, or a string holding one.
fn number(body: &Value, key: &str) -> Option<f64> {
    let value = match body.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// ipapi.co: fields are passed through as they arrive. A field of an
/// unexpected type is dropped on its own instead of failing the response.
pub fn normalize_ipapi(body: Value) -> Result<AddressRecord, ProviderError> {
    if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
        return Err(ProviderError::Reported(error_message(
            error,
            text(&body, "reason"),
        )));
    }
    let address = address_of(text(&body, "ip"))?;

    let mut record = AddressRecord::new(&address);
    record.city = text(&body, "city");
    record.region = text(&body, "region");
    record.country = text(&body, "country");
    record.country_code = text(&body, "country_code");
    record.postal_code = text(&body, "postal");
    record.timezone = text(&body, "timezone");
    record.utc_offset = text(&body, "utc_offset");
    record.currency = text(&body, "currency");
    record.languages = text(&body, "languages");
    record.calling_code =
        text(&body, "calling_code").or_else(|| text(&body, "country_calling_code"));
    record.continent_code = text(&body, "continent_code");
    record.isp = text(&body, "isp");
    record.org = text(&body, "org");
    record.asn = text(&body, "asn").or_else(|| text(&body, "as"));
    record.network = text(&body, "network");
    record.latitude = number(&body, "latitude");
    record.longitude = number(&body, "longitude");
    Ok(record)
}

/// ipinfo.io: `loc` is split into coordinates, `org` doubles as the ISP and
/// `country` as the country code.
pub fn normalize_ipinfo(body: Value) -> Result<AddressRecord, ProviderError> {
    let payload: IpinfoPayload = serde_json::from_value(body)?;
    if let Some(error) = payload.error.as_ref().filter(|e| is_truthy(e)) {
        return Err(ProviderError::Reported(error_message(error, None)));
    }
    let address = address_of(payload.ip)?;
    let (latitude, longitude) = parse_lat_lng(payload.loc.as_deref());

    let mut record = AddressRecord::new(&address).with_coordinates(latitude, longitude);
    record.city = payload.city;
    record.region = payload.region;
    record.country_code = payload.country.clone();
    record.country = payload.country;
    record.timezone = payload.timezone;
    record.isp = payload.org.clone();
    record.org = payload.org;
    record.postal_code = payload.postal;
    Ok(record)
}

/// ipify style: either a bare string or `{"ip": "..."}`.
pub fn normalize_bare(body: Value) -> Result<AddressRecord, ProviderError> {
    let ip = match body {
        Value::String(ip) => Some(ip),
        Value::Object(mut map) => match map.remove("ip") {
            Some(Value::String(ip)) => Some(ip),
            _ => None,
        },
        _ => None,
    };
    let address = address_of(ip)?;
    Ok(AddressRecord::new(&address))
}
