// src/services/error.rs
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("network error talking to the market-data provider: {message}")]
    Network { message: String, timed_out: bool },

    #[error("market-data provider rejected the credentials (HTTP {0})")]
    Auth(u16),

    #[error("market-data provider returned HTTP {0}")]
    Upstream(u16),

    #[error("malformed history data: {0}")]
    Malformed(String),

    #[error("no history available for {0}")]
    EmptyHistory(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network {
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}
