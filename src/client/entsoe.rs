use crate::client::base::EntsoeTransport;
use crate::config::Config;
use crate::errors::{EntsoeError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Request};

/// ENTSOE Transparency Platform HTTP 客户端
pub struct EntsoeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl EntsoeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EntsoeError::RequestError(e))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// 构建请求（不发送），securityToken 附加在末尾
    pub fn build_request(&self, params: &[(&'static str, String)]) -> Result<Request> {
        let request = self.client
            .get(&self.base_url)
            .query(params)
            .query(&[("securityToken", self.api_key.as_str())])
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl EntsoeTransport for EntsoeClient {
    async fn query(&self, params: &[(&'static str, String)]) -> Result<String> {
        let request = self.build_request(params)?;
        debug!("GET {} ({} 个参数)", self.base_url, params.len() + 1);

        let response = self.client
            .execute(request)
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        debug!("成功获取响应, {} 字节", text.len());
        Ok(text)
    }
}
