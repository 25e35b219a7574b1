use crate::client::base::EntsoeTransport;
use crate::client::entsoe::EntsoeClient;
use crate::client::query::country_load_params;
use crate::config::Config;
use crate::errors::Result;
use crate::models::country::country;
use crate::models::series::LoadSeries;
use crate::parser::parse_response;
use crate::util::PeriodBoundary;
use chrono_tz::Tz;
use log::info;
use std::sync::Arc;

/// 负荷数据服务：构建查询、发送请求、解析响应
pub struct LoadService {
    config: Config,
    transport: Arc<dyn EntsoeTransport + Send + Sync>,
}

impl LoadService {
    pub fn new(config: Config, transport: Arc<dyn EntsoeTransport + Send + Sync>) -> Self {
        Self { config, transport }
    }

    /// 使用默认 HTTP 客户端创建服务
    pub fn with_client(config: Config) -> Result<Self> {
        let client = EntsoeClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load of one bidding zone over `[start, end)`.
    ///
    /// `process_type` falls back to the configured default (`A16`). The index
    /// is built in UTC unless the config carries a timezone.
    pub async fn query_country_load<S, E>(
        &self,
        entsoe_zone: &str,
        start: &S,
        end: &E,
        process_type: Option<&str>,
    ) -> Result<LoadSeries>
    where
        S: PeriodBoundary + ?Sized,
        E: PeriodBoundary + ?Sized,
    {
        self.query_load(entsoe_zone, start, end, process_type, self.config.timezone).await
    }

    /// Load of a country from the reference table, indexed in its own timezone.
    pub async fn query_country<S, E>(
        &self,
        name: &str,
        start: &S,
        end: &E,
        process_type: Option<&str>,
    ) -> Result<LoadSeries>
    where
        S: PeriodBoundary + ?Sized,
        E: PeriodBoundary + ?Sized,
    {
        let meta = country(name)?;
        self.query_load(meta.entsoe_zone, start, end, process_type, Some(meta.timezone)).await
    }

    async fn query_load<S, E>(
        &self,
        entsoe_zone: &str,
        start: &S,
        end: &E,
        process_type: Option<&str>,
        tz: Option<Tz>,
    ) -> Result<LoadSeries>
    where
        S: PeriodBoundary + ?Sized,
        E: PeriodBoundary + ?Sized,
    {
        let process_type = process_type.unwrap_or(self.config.process_type.as_str());
        let params = country_load_params(entsoe_zone, start, end, process_type)?;
        info!("查询区域 {} 负荷数据: {} - {}", entsoe_zone, params[2].1, params[3].1);

        let text = self.transport.query(&params).await?;
        let series = parse_response(&text, tz)?;

        info!("成功获取 {} 个数据点", series.len());
        Ok(series)
    }
}
