// src/routes.rs
use log::{info, warn};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::extremes::{get_extremes_data, get_extremes_report, get_tickers};
use crate::handlers::view::{get_chart_page, get_index_page};
use crate::state::AppState;

// Every failure becomes a JSON body with the matching status
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        warn!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let index_route = warp::path::end()
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_index_page);

    let tickers_route = warp::path!("api" / "v1" / "tickers")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_tickers);

    let report_route = warp::path!("api" / "v1" / "extremes" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_extremes_report);

    let data_route = warp::path!("data" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_extremes_data);

    let chart_route = warp::path!(String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_chart_page);

    info!("All routes configured successfully.");

    index_route
        .or(tickers_route)
        .or(report_route)
        .or(data_route)
        .or(chart_route)
        .recover(handle_rejection)
}
