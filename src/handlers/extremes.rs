// src/handlers/extremes.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{ExtremesReport, RankedExtremes};
use crate::services::extremes::select_extremes;
use crate::services::returns::compute_returns;
use crate::state::AppState;

use super::error::ApiError;
use super::ticker::normalize_ticker;

pub async fn load_extremes(
    state: &AppState,
    raw_ticker: &str,
) -> Result<(String, RankedExtremes), ApiError> {
    let ticker = normalize_ticker(raw_ticker)?;

    let bars = state.history.fetch_history(&ticker).await.map_err(|e| {
        error!("Failed to fetch history for {}: {}", ticker, e);
        ApiError::from(e)
    })?;

    let returns = compute_returns(&bars).map_err(|e| {
        error!("Failed to compute returns for {}: {}", ticker, e);
        ApiError::from(e)
    })?;

    let extremes = select_extremes(&returns);
    info!(
        "{}: selected {} of {} daily returns",
        ticker,
        extremes.len(),
        extremes.available
    );
    Ok((ticker, extremes))
}

/// `GET /data/:ticker`: ISO date to fractional return.
pub async fn get_extremes_data(raw_ticker: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for extremes data: {}", raw_ticker);
    let (_, extremes) = load_extremes(&state, &raw_ticker)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&extremes.to_map()))
}

/// `GET /api/v1/extremes/:ticker`: worst and best lists with counts.
pub async fn get_extremes_report(raw_ticker: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for extremes report: {}", raw_ticker);
    let (ticker, extremes) = load_extremes(&state, &raw_ticker)
        .await
        .map_err(warp::reject::custom)?;
    let report = ExtremesReport::new(&ticker, state.history.start_date(), extremes);
    Ok(warp::reply::json(&report))
}

pub async fn get_tickers(state: Arc<AppState>) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&state.tickers))
}
