use thiserror::Error;
use std::num::{ParseFloatError, ParseIntError};

#[derive(Error, Debug)]
pub enum EntsoeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Arrow error: {0}")]
    ArrowError(String),

    #[error("Unsupported resolution '{0}': expected one of PT15M, PT30M, PT60M, P7D, P1M, P1Y")]
    UnsupportedResolution(String),

    #[error("Missing <{0}> element in TimeSeries block")]
    MissingElement(&'static str),

    #[error("TimeSeries block has {points} points but its period yields {timestamps} timestamps")]
    LengthMismatch { points: usize, timestamps: usize },

    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse int error: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Parse float error: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, EntsoeError>;

// 用于从字符串创建错误
impl From<String> for EntsoeError {
    fn from(s: String) -> Self {
        EntsoeError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for EntsoeError {
    fn from(s: &str) -> Self {
        EntsoeError::Unknown(s.to_string())
    }
}
