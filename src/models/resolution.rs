use crate::errors::{EntsoeError, Result};
use chrono::Duration;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// TimeSeries 块的采样分辨率（ISO8601 风格的时长代码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    #[serde(rename = "PT15M")]
    Minute15,
    #[serde(rename = "PT30M")]
    Minute30,
    #[serde(rename = "PT60M")]
    Minute60,
    #[serde(rename = "P7D")]
    Week,
    #[serde(rename = "P1M")]
    Month,
    #[serde(rename = "P1Y")]
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Minute,
    Day,
    Month,
}

/// Step between two consecutive timestamps of a regular index.
///
/// Minute and day steps are fixed durations. Month steps follow the civil
/// calendar of whatever timezone the index is generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingInterval {
    pub amount: u32,
    pub unit: IntervalUnit,
}

impl SamplingInterval {
    pub const fn new(amount: u32, unit: IntervalUnit) -> Self {
        Self { amount, unit }
    }

    /// 固定时长；按月步进时返回 None
    pub fn fixed_duration(&self) -> Option<Duration> {
        match self.unit {
            IntervalUnit::Minute => Some(Duration::minutes(i64::from(self.amount))),
            IntervalUnit::Day => Some(Duration::days(i64::from(self.amount))),
            IntervalUnit::Month => None,
        }
    }
}

impl Resolution {
    /// Resolve a duration code. Only the exact six codes are accepted.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "PT60M" => Ok(Self::Minute60),
            "P1Y" => Ok(Self::Year),
            "PT15M" => Ok(Self::Minute15),
            "PT30M" => Ok(Self::Minute30),
            "P7D" => Ok(Self::Week),
            "P1M" => Ok(Self::Month),
            _ => Err(EntsoeError::UnsupportedResolution(code.to_string())),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Minute15 => "PT15M",
            Self::Minute30 => "PT30M",
            Self::Minute60 => "PT60M",
            Self::Week => "P7D",
            Self::Month => "P1M",
            Self::Year => "P1Y",
        }
    }

    pub const fn interval(&self) -> SamplingInterval {
        match self {
            Self::Minute15 => SamplingInterval::new(15, IntervalUnit::Minute),
            Self::Minute30 => SamplingInterval::new(30, IntervalUnit::Minute),
            Self::Minute60 => SamplingInterval::new(60, IntervalUnit::Minute),
            Self::Week => SamplingInterval::new(7, IntervalUnit::Day),
            Self::Month => SamplingInterval::new(1, IntervalUnit::Month),
            Self::Year => SamplingInterval::new(12, IntervalUnit::Month),
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute15,
            Self::Minute30,
            Self::Minute60,
            Self::Week,
            Self::Month,
            Self::Year,
        ]
    }
}

/// 代码解析入口，等价于 [`Resolution::from_code`]
pub fn resolution_to_interval(code: &str) -> Result<SamplingInterval> {
    Ok(Resolution::from_code(code)?.interval())
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Resolution {
    type Err = EntsoeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            resolution_to_interval("PT60M").unwrap(),
            SamplingInterval::new(60, IntervalUnit::Minute)
        );
        assert_eq!(
            resolution_to_interval("P1Y").unwrap(),
            SamplingInterval::new(12, IntervalUnit::Month)
        );
        assert_eq!(
            resolution_to_interval("PT15M").unwrap(),
            SamplingInterval::new(15, IntervalUnit::Minute)
        );
        assert_eq!(
            resolution_to_interval("PT30M").unwrap(),
            SamplingInterval::new(30, IntervalUnit::Minute)
        );
        assert_eq!(
            resolution_to_interval("P7D").unwrap(),
            SamplingInterval::new(7, IntervalUnit::Day)
        );
        assert_eq!(
            resolution_to_interval("P1M").unwrap(),
            SamplingInterval::new(1, IntervalUnit::Month)
        );
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        for code in ["PT5M", "pt60m", " PT60M", "P1D", ""] {
            match Resolution::from_code(code) {
                Err(EntsoeError::UnsupportedResolution(c)) => assert_eq!(c, code),
                other => panic!("expected unsupported resolution for {:?}, got {:?}", code, other),
            }
        }
    }

    #[test]
    fn test_code_round_trips_through_display() {
        for res in Resolution::all() {
            assert_eq!(res.to_string().parse::<Resolution>().unwrap(), *res);
        }
    }

    #[test]
    fn test_fixed_duration() {
        assert_eq!(Resolution::Minute15.interval().fixed_duration(), Some(Duration::minutes(15)));
        assert_eq!(Resolution::Week.interval().fixed_duration(), Some(Duration::days(7)));
        assert_eq!(Resolution::Month.interval().fixed_duration(), None);
        assert_eq!(Resolution::Year.interval().fixed_duration(), None);
    }
}
