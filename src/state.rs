// src/state.rs
use crate::config::Config;
use crate::services::error::FetchError;
use crate::services::tradier::HistoryClient;

#[derive(Clone)]
pub struct AppState {
    pub history: HistoryClient,
    pub tickers: Vec<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(AppState {
            history: HistoryClient::new(config)?,
            tickers: config.tickers.clone(),
        })
    }
}
