//! ENTSOE XML 响应解析：时间索引构建与 TimeSeries 块合并

pub mod index;
pub mod response;

pub use index::build_datetime_index;
pub use response::{extract_timeseries, parse_block, parse_response, parse_values};
