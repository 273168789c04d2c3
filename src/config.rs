// src/config.rs
use chrono::NaiveDate;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::models::is_valid_ticker;

pub const DEFAULT_BASE_URL: &str = "https://sandbox.tradier.com";
pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const INTERNET_STOCKS: [&str; 11] = [
    "FB", "GOOGL", "YELP", "LNKD", "AMZN", "NFLX", "EBAY", "YHOO", "TWTR", "EXPE", "PCLN",
];

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default()
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("TOKEN is not set; a Tradier bearer token is required")]
    MissingToken,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub base_url: String,
    pub start_date: NaiveDate,
    pub tickers: Vec<String>,
    pub timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn with_token(api_token: impl Into<String>) -> Self {
        Config {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            start_date: default_start_date(),
            tickers: INTERNET_STOCKS.iter().map(|t| t.to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get("TOKEN").ok_or(ConfigError::MissingToken)?;
        let mut config = Config::with_token(token);

        if let Some(url) = get("TRADIER_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(start) = get("HISTORY_START") {
            config.start_date = NaiveDate::parse_from_str(&start, "%Y-%m-%d").map_err(|_| {
                ConfigError::InvalidValue { key: "HISTORY_START", value: start.clone() }
            })?;
        }

        if let Some(list) = get("TICKERS") {
            let tickers: Vec<String> = list
                .split(',')
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect();
            if tickers.is_empty() {
                return Err(ConfigError::InvalidValue { key: "TICKERS", value: list });
            }
            if let Some(bad) = tickers.iter().find(|t| !is_valid_ticker(t)) {
                return Err(ConfigError::InvalidValue { key: "TICKERS", value: bad.clone() });
            }
            config.tickers = tickers;
        }

        if let Some(secs) = get("FETCH_TIMEOUT_SECS") {
            let parsed: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FETCH_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            if parsed == 0 {
                return Err(ConfigError::InvalidValue { key: "FETCH_TIMEOUT_SECS", value: secs });
            }
            config.timeout = Duration::from_secs(parsed);
        }

        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port.clone() })?;
        }

        Ok(config)
    }
}
