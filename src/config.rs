use chrono_tz::Tz;
use std::time::Duration;

/// ENTSOE Transparency Platform API 地址
pub const DEFAULT_BASE_URL: &str = "https://transparency.entsoe.eu/api";

/// 实际负荷 (realised)
pub const DEFAULT_PROCESS_TYPE: &str = "A16";

pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub process_type: String,
    pub timezone: Option<Tz>,  // 按区号查询时用于构建时间索引的时区
}

impl Config {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            process_type: DEFAULT_PROCESS_TYPE.to_string(),
            timezone: None,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_process_type(mut self, process_type: &str) -> Self {
        self.process_type = process_type.to_string();
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }
}
