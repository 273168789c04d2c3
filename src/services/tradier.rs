// src/services/tradier.rs
use chrono::NaiveDate;
use log::{debug, error, info};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::models::DailyBar;

use super::error::FetchError;

#[derive(Debug, Deserialize)]
struct RawDay {
    date: NaiveDate,
    close: f64,
    volume: u64,
}

// a single trading day comes back as an object, not an array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DayList {
    Many(Vec<RawDay>),
    One(RawDay),
}

#[derive(Clone)]
pub struct HistoryClient {
    client: Client,
    base_url: String,
    token: String,
    start_date: NaiveDate,
}

impl HistoryClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .https_only(config.base_url.starts_with("https://"))
            .build()?;

        Ok(HistoryClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            start_date: config.start_date,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub async fn fetch_history(&self, ticker: &str) -> Result<Vec<DailyBar>, FetchError> {
        self.fetch_history_since(ticker, self.start_date).await
    }

    pub async fn fetch_history_since(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<Vec<DailyBar>, FetchError> {
        let url = format!("{}/v1/markets/history", self.base_url);
        let start_param = start.format("%Y-%m-%d").to_string();
        info!("Fetching history for {} since {}", ticker, start_param);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", ticker), ("start", start_param.as_str())])
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                error!("Request for {} failed: {}", ticker, e);
                FetchError::from(e)
            })?;

        let status = response.status();
        debug!("Provider answered {} for {}", status, ticker);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!("Provider rejected credentials for {}: {}", ticker, status);
            return Err(FetchError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            error!("Provider returned {} for {}", status, ticker);
            return Err(FetchError::Upstream(status.as_u16()));
        }

        let body = response.text().await?;
        let bars = parse_history(ticker, &body)?;
        info!("Got {} daily bars for {}", bars.len(), ticker);
        Ok(bars)
    }
}

/// Parses a history response body into bars, keeping provider order.
pub fn parse_history(ticker: &str, body: &str) -> Result<Vec<DailyBar>, FetchError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("response is not JSON: {}", e)))?;

    let history = parsed
        .get("history")
        .ok_or_else(|| FetchError::Malformed("missing \"history\" key".to_string()))?;

    // Unknown symbols and empty ranges come back as `"history": null`.
    if history.is_null() {
        return Err(FetchError::EmptyHistory(ticker.to_string()));
    }

    let day = history
        .get("day")
        .ok_or_else(|| FetchError::Malformed("missing \"history.day\" key".to_string()))?;

    if day.is_null() {
        return Err(FetchError::EmptyHistory(ticker.to_string()));
    }

    let days = match DayList::deserialize(day) {
        Ok(DayList::Many(days)) => days,
        Ok(DayList::One(day)) => vec![day],
        Err(e) => return Err(FetchError::Malformed(format!("bad \"history.day\" entry: {}", e))),
    };

    if days.is_empty() {
        return Err(FetchError::EmptyHistory(ticker.to_string()));
    }

    let mut bars: Vec<DailyBar> = Vec::with_capacity(days.len());
    for raw in days {
        if !raw.close.is_finite() || raw.close <= 0.0 {
            return Err(FetchError::Malformed(format!(
                "non-positive close {} on {}",
                raw.close, raw.date
            )));
        }
        if let Some(prev) = bars.last() {
            if raw.date <= prev.date {
                return Err(FetchError::Malformed(format!(
                    "dates out of order: {} after {}",
                    raw.date, prev.date
                )));
            }
        }
        bars.push(DailyBar { date: raw.date, close: raw.close, volume: raw.volume });
    }

    Ok(bars)
}
