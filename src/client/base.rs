use crate::errors::Result;
use async_trait::async_trait;

/// Query parameters of one API request, in insertion order.
pub type QueryParams = Vec<(&'static str, String)>;

/// Transport for ENTSOE API requests
#[async_trait]
pub trait EntsoeTransport {
    /// Issue one GET with the given parameters and return the raw body.
    /// Implementations attach the API key themselves.
    async fn query(&self, params: &[(&'static str, String)]) -> Result<String>;
}
