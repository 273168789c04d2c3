// src/handlers/view.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Html;
use warp::Rejection;

use crate::services::chart::build_chart;
use crate::state::AppState;

use super::error::ApiError;
use super::extremes::load_extremes;

const CHART_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>__TICKER__ best and worst days</title>
  <script src="https://code.highcharts.com/highcharts.js"></script>
</head>
<body>
  <div id="container" style="min-width: 310px; height: 500px; margin: 0 auto"></div>
  <p>__SUMMARY__</p>
  <script>
    Highcharts.chart('container', {
      chart: { type: 'scatter', zoomType: 'xy' },
      title: { text: 'Ticker: __TICKER__' },
      subtitle: { text: 'Data Source: Tradier API' },
      xAxis: { type: 'datetime' },
      yAxis: { title: { text: 'Return (%)' } },
      legend: { layout: 'vertical', align: 'left', verticalAlign: 'top', x: 100, y: 70, floating: true, borderWidth: 1 },
      plotOptions: {
        scatter: {
          marker: { radius: 10 },
          tooltip: { headerFormat: '<b>{series.name}</b><br>', pointFormat: '{point.x:%Y-%m-%d}: {point.y} %' }
        }
      },
      series: __SERIES__
    });
  </script>
</body>
</html>
"#;

/// `GET /:ticker`: scatter chart of the selected days.
pub async fn get_chart_page(raw_ticker: String, state: Arc<AppState>) -> Result<Html<String>, Rejection> {
    info!("Handling chart request for {}", raw_ticker);
    let (ticker, extremes) = load_extremes(&state, &raw_ticker)
        .await
        .map_err(warp::reject::custom)?;

    let series = serde_json::to_string(&build_chart(&extremes)).map_err(|e| {
        error!("Failed to serialize chart series for {}: {}", ticker, e);
        warp::reject::custom(ApiError::internal(e.to_string()))
    })?;

    let summary = if extremes.is_truncated() {
        format!(
            "Only {} daily returns available since {}; showing all of them.",
            extremes.available,
            state.history.start_date()
        )
    } else {
        format!(
            "Five best and five worst of {} daily returns since {}.",
            extremes.available,
            state.history.start_date()
        )
    };

    let page = CHART_PAGE
        .replace("__TICKER__", &ticker)
        .replace("__SUMMARY__", &summary)
        .replace("__SERIES__", &series);
    Ok(warp::reply::html(page))
}

/// `GET /`: links to every configured ticker.
pub async fn get_index_page(state: Arc<AppState>) -> Result<Html<String>, Rejection> {
    let items: String = state
        .tickers
        .iter()
        .map(|t| format!("    <li><a href=\"/{t}\">{t}</a></li>\n", t = t))
        .collect();
    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Internet stocks</title></head>\n<body>\n  <ul>\n{}  </ul>\n</body>\n</html>\n",
        items
    );
    Ok(warp::reply::html(page))
}
