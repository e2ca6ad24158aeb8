//! Terminal and JSON rendering of resolved addresses.

use crate::classify::{is_private_ip, AddressClass};
use crate::geo::{AddressRecord, IpVersion};
use crate::resolver::DualResolution;
use console::style;
use serde::Serialize;
use std::fmt;

/// Full terminal rendering of one record, section by section.
pub struct RecordReport<'a>(pub &'a AddressRecord);

fn field(f: &mut fmt::Formatter, label: &str, value: &Option<String>) -> fmt::Result {
    match value {
        Some(value) if !value.is_empty() => {
            writeln!(f, "  {}: {}", style(label).dim(), style(value).green())
        }
        _ => Ok(()),
    }
}

fn heading(f: &mut fmt::Formatter, title: &str) -> fmt::Result {
    writeln!(f, "{}", style(title).bold().cyan())
}

impl fmt::Display for RecordReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let data = self.0;
        writeln!(
            f,
            "{}: {}",
            style(format!("IPv{}", data.version)).bold().red(),
            style(&data.address).green().bold()
        )?;

        if data.city.is_some() || data.region.is_some() || data.country.is_some() {
            heading(f, "Location")?;
            field(f, "City", &data.city)?;
            field(f, "Region", &data.region)?;
            let country = match (&data.country, &data.country_code) {
                (Some(country), Some(code)) if country != code => {
                    Some(format!("{} ({})", country, code))
                }
                (country, _) => country.clone(),
            };
            field(f, "Country", &country)?;
            field(f, "Postal", &data.postal_code)?;
        }

        if data.isp.is_some() || data.org.is_some() || data.asn.is_some() {
            heading(f, "Network")?;
            field(f, "ISP", &data.isp)?;
            field(f, "Organization", &data.org)?;
            field(f, "AS", &data.asn)?;
        }

        if data.timezone.is_some() || data.currency.is_some() || data.calling_code.is_some() {
            heading(f, "Regional")?;
            field(f, "Timezone", &data.timezone)?;
            field(f, "UTC offset", &data.utc_offset)?;
            field(f, "Currency", &data.currency)?;
            field(f, "Calling code", &data.calling_code)?;
            field(f, "Languages", &data.languages)?;
            field(f, "Continent", &data.continent_code)?;
        }

        if let (Some((lat, lng)), Some(url)) = (data.coordinates(), data.maps_url()) {
            heading(f, "Precise location")?;
            field(f, "Latitude", &Some(format!("{}°", lat)))?;
            field(f, "Longitude", &Some(format!("{}°", lng)))?;
            field(f, "Map", &Some(url))?;
        }

        heading(f, "Network details")?;
        field(f, "IP version", &Some(format!("IPv{}", data.version)))?;
        if data.version == IpVersion::V4 {
            let kind = if is_private_ip(&data.address) {
                "Private"
            } else {
                "Public"
            };
            field(f, "Address type", &Some(kind.to_string()))?;
            field(
                f,
                "Address class",
                &Some(AddressClass::of(&data.address).to_string()),
            )?;
        }
        field(f, "Network", &data.network)
    }
}

impl fmt::Display for DualResolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for version in [IpVersion::V4, IpVersion::V6] {
            match self.get(version) {
                Some(record) => write!(f, "{}", RecordReport(record))?,
                None => writeln!(
                    f,
                    "{}: {}",
                    style(format!("IPv{}", version)).bold().red(),
                    style("not available").yellow()
                )?,
            }
            if version == IpVersion::V4 {
                writeln!(f, "-----------------")?;
            }
        }
        Ok(())
    }
}

/// Pretty JSON for any resolved value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
