// 公开导出的模块，供外部使用
pub mod models;
pub mod parser;
pub mod client;
pub mod services;
pub mod config;
pub mod errors;
pub mod util;

// 重新导出常用类型，方便使用
pub use models::country::{countries, country, CountryMetadata};
pub use models::resolution::{Resolution, SamplingInterval};
pub use models::series::{LoadPoint, LoadSeries, TimeSeriesBlock};
pub use parser::{build_datetime_index, parse_response};
pub use client::base::EntsoeTransport;
pub use client::entsoe::EntsoeClient;
pub use services::load_service::LoadService;
pub use config::Config;
pub use util::datetime_to_str;
pub use errors::{Result, EntsoeError};
