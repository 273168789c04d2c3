// src/bin/fetch_all.rs
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};

use internet_extremes::config::Config;
use internet_extremes::services::extremes::select_extremes;
use internet_extremes::services::returns::compute_returns;
use internet_extremes::services::tradier::HistoryClient;

/// Fetches every configured ticker one after another and logs its best and
/// worst days. Exits non-zero if any ticker failed.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("failed to load configuration")?;
    let client = HistoryClient::new(&config).context("failed to build HTTP client")?;

    let mut failures = 0;
    for (idx, ticker) in config.tickers.iter().enumerate() {
        let bars = match client.fetch_history(ticker).await {
            Ok(bars) => bars,
            Err(e) => {
                error!("{}: {}. fetch failed: {}", idx + 1, ticker, e);
                failures += 1;
                continue;
            }
        };
        info!("{}: {}. got {} days of tradier data.", idx + 1, ticker, bars.len());

        let returns = match compute_returns(&bars) {
            Ok(returns) => returns,
            Err(e) => {
                error!("{}: bad history: {}", ticker, e);
                failures += 1;
                continue;
            }
        };

        let extremes = select_extremes(&returns);
        for r in &extremes.worst {
            info!("{} worst {} {:+.2}%", ticker, r.date, r.value * 100.0);
        }
        for r in &extremes.best {
            info!("{} best  {} {:+.2}%", ticker, r.date, r.value * 100.0);
        }
        if extremes.is_truncated() {
            info!("{}: only {} daily returns available", ticker, extremes.available);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} tickers failed", failures, config.tickers.len());
    }
    Ok(())
}
