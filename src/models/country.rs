use crate::errors::{EntsoeError, Result};
use crate::models::resolution::Resolution;
use chrono_tz::Tz;
use serde::Serialize;

/// 国家元数据：ISO 代码、时区、ENTSOE 区域代码及原始分辨率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryMetadata {
    pub name: &'static str,
    pub country_code: &'static str,
    pub timezone: Tz,
    pub entsoe_zone: &'static str,
    /// Native resolution of the country's load data, for downstream resampling.
    pub resolution: Resolution,
}

pub const COUNTRIES: [CountryMetadata; 6] = [
    CountryMetadata {
        name: "france",
        country_code: "FR",
        timezone: chrono_tz::Europe::Paris,
        entsoe_zone: "10YFR-RTE------C",
        resolution: Resolution::Minute60,
    },
    CountryMetadata {
        name: "germany",
        country_code: "DE",
        timezone: chrono_tz::Europe::Berlin,
        entsoe_zone: "10Y1001A1001A83F",
        resolution: Resolution::Minute15,
    },
    CountryMetadata {
        name: "italy",
        country_code: "IT",
        timezone: chrono_tz::Europe::Rome,
        entsoe_zone: "10YIT-GRTN-----B",
        resolution: Resolution::Minute60,
    },
    CountryMetadata {
        name: "norway",
        country_code: "NO",
        timezone: chrono_tz::Europe::Oslo,
        entsoe_zone: "10YNO-0--------C",
        resolution: Resolution::Minute60,
    },
    CountryMetadata {
        name: "spain",
        country_code: "ES",
        timezone: chrono_tz::Europe::Madrid,
        entsoe_zone: "10YES-REE------0",
        resolution: Resolution::Minute60,
    },
    CountryMetadata {
        name: "UK",
        country_code: "GB",
        timezone: chrono_tz::Europe::London,
        entsoe_zone: "10YGB----------A",
        resolution: Resolution::Minute30,
    },
];

pub fn countries() -> &'static [CountryMetadata] {
    &COUNTRIES
}

/// 按国家名查找（不区分大小写）
pub fn country(name: &str) -> Result<&'static CountryMetadata> {
    COUNTRIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EntsoeError::UnknownCountry(name.to_string()))
}

pub fn country_by_code(code: &str) -> Option<&'static CountryMetadata> {
    COUNTRIES.iter().find(|c| c.country_code.eq_ignore_ascii_case(code))
}

pub fn country_by_zone(zone: &str) -> Option<&'static CountryMetadata> {
    COUNTRIES.iter().find(|c| c.entsoe_zone == zone)
}
