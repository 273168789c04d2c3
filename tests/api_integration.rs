// Runs the real reqwest client and the warp routes against a fake provider
// served in-process.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;
use warp::Filter;

use internet_extremes::config::Config;
use internet_extremes::routes::routes;
use internet_extremes::services::error::FetchError;
use internet_extremes::services::tradier::HistoryClient;
use internet_extremes::state::AppState;

const TOKEN: &str = "test-token";

const FOUR_DAYS: &str = r#"{"history":{"day":[
    {"date":"2014-01-02","open":99.0,"high":101.0,"low":98.0,"close":100.0,"volume":1000},
    {"date":"2014-01-03","open":99.0,"high":101.0,"low":89.0,"close":90.0,"volume":1200},
    {"date":"2014-01-06","open":91.0,"high":121.0,"low":90.0,"close":120.0,"volume":3000},
    {"date":"2014-01-07","open":118.0,"high":119.0,"low":59.0,"close":60.0,"volume":9000}
]}}"#;

/// History endpoint that answers `body` when the request asks for JSON with
/// the right token and start date, `null` history for ZZZZ and 401 for any
/// other token.
fn spawn_provider(body: &'static str) -> SocketAddr {
    spawn_provider_since(body, "2010-01-01")
}

fn spawn_provider_since(body: &'static str, start: &'static str) -> SocketAddr {
    let route = warp::path!("v1" / "markets" / "history")
        .and(warp::get())
        .and(warp::header::exact("accept", "application/json"))
        .and(warp::query::<HashMap<String, String>>())
        .and(warp::header::optional::<String>("authorization"))
        .map(move |query: HashMap<String, String>, auth: Option<String>| {
            if auth.as_deref() != Some("Bearer test-token") {
                return warp::reply::with_status(r#"{"fault":"invalid token"}"#, StatusCode::UNAUTHORIZED);
            }
            if query.get("start").map(String::as_str) != Some(start) {
                return warp::reply::with_status(r#"{"fault":"bad start"}"#, StatusCode::BAD_REQUEST);
            }
            if query.get("symbol").map(String::as_str) == Some("ZZZZ") {
                return warp::reply::with_status(r#"{"history":null}"#, StatusCode::OK);
            }
            warp::reply::with_status(body, StatusCode::OK)
        });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn spawn_status(status: StatusCode) -> SocketAddr {
    let route = warp::path!("v1" / "markets" / "history")
        .map(move || warp::reply::with_status("oops", status));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn spawn_slow_provider(delay: Duration) -> SocketAddr {
    let route = warp::path!("v1" / "markets" / "history").and_then(move || async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Infallible>(FOUR_DAYS)
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn config_for(addr: SocketAddr, token: &str) -> Config {
    let mut config = Config::with_token(token);
    config.base_url = format!("http://{}", addr);
    config
}

fn state_for(addr: SocketAddr, token: &str) -> Arc<AppState> {
    Arc::new(AppState::new(&config_for(addr, token)).unwrap())
}

fn json_body(resp: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(resp.body()).unwrap()
}

#[tokio::test]
async fn test_client_fetches_bars_in_order() {
    let addr = spawn_provider(FOUR_DAYS);
    let client = HistoryClient::new(&config_for(addr, TOKEN)).unwrap();

    let bars = client.fetch_history("FB").await.unwrap();
    assert_eq!(bars.len(), 4);
    assert_eq!(bars[0].close, 100.0);
    assert_eq!(bars[3].volume, 9000);
    assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn test_client_sends_explicit_start_date() {
    let addr = spawn_provider_since(FOUR_DAYS, "2013-05-01");
    let client = HistoryClient::new(&config_for(addr, TOKEN)).unwrap();

    let start = NaiveDate::from_ymd_opt(2013, 5, 1).unwrap();
    let bars = client.fetch_history_since("FB", start).await.unwrap();
    assert_eq!(bars.len(), 4);

    // the configured 2010-01-01 start is refused by this provider
    let err = client.fetch_history("FB").await.unwrap_err();
    assert_eq!(err, FetchError::Upstream(400));
}

#[tokio::test]
async fn test_client_uses_configured_start_date() {
    let addr = spawn_provider_since(FOUR_DAYS, "2012-05-18");
    let mut config = config_for(addr, TOKEN);
    config.start_date = NaiveDate::from_ymd_opt(2012, 5, 18).unwrap();
    let client = HistoryClient::new(&config).unwrap();

    assert_eq!(client.fetch_history("FB").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_data_route_decodes_percent_encoded_ticker() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/data/%66b").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(&resp).as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_client_reports_auth_on_401() {
    let addr = spawn_provider(FOUR_DAYS);
    let client = HistoryClient::new(&config_for(addr, "wrong-token")).unwrap();

    let err = client.fetch_history("FB").await.unwrap_err();
    assert_eq!(err, FetchError::Auth(401));
}

#[tokio::test]
async fn test_client_reports_auth_on_403() {
    let addr = spawn_status(StatusCode::FORBIDDEN);
    let client = HistoryClient::new(&config_for(addr, TOKEN)).unwrap();

    let err = client.fetch_history("FB").await.unwrap_err();
    assert_eq!(err, FetchError::Auth(403));
}

#[tokio::test]
async fn test_client_reports_empty_history_for_unknown_ticker() {
    let addr = spawn_provider(FOUR_DAYS);
    let client = HistoryClient::new(&config_for(addr, TOKEN)).unwrap();

    let err = client.fetch_history("ZZZZ").await.unwrap_err();
    assert_eq!(err, FetchError::EmptyHistory("ZZZZ".to_string()));
}

#[tokio::test]
async fn test_client_reports_upstream_status() {
    let addr = spawn_status(StatusCode::INTERNAL_SERVER_ERROR);
    let client = HistoryClient::new(&config_for(addr, TOKEN)).unwrap();

    let err = client.fetch_history("FB").await.unwrap_err();
    assert_eq!(err, FetchError::Upstream(500));
}

#[tokio::test]
async fn test_client_times_out() {
    let addr = spawn_slow_provider(Duration::from_secs(3));
    let mut config = config_for(addr, TOKEN);
    config.timeout = Duration::from_millis(200);
    let client = HistoryClient::new(&config).unwrap();

    match client.fetch_history("FB").await.unwrap_err() {
        FetchError::Network { timed_out, .. } => assert!(timed_out),
        other => panic!("expected a network timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_reports_refused_connection() {
    let mut config = Config::with_token(TOKEN);
    config.base_url = "http://127.0.0.1:1".to_string();
    let client = HistoryClient::new(&config).unwrap();

    match client.fetch_history("FB").await.unwrap_err() {
        FetchError::Network { timed_out, .. } => assert!(!timed_out),
        other => panic!("expected a network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_data_route_returns_date_map() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/data/fb").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(&resp);
    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 3);
    assert!((map["2014-01-03"].as_f64().unwrap() + 0.10).abs() < 1e-9);
    assert!((map["2014-01-06"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-9);
    assert!((map["2014-01-07"].as_f64().unwrap() + 0.50).abs() < 1e-9);
}

#[tokio::test]
async fn test_data_route_maps_auth_failure_to_401() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, "wrong-token"));

    let resp = warp::test::request().method("GET").path("/data/FB").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(json_body(&resp)["error"].as_str().unwrap().contains("credentials"));
}

#[tokio::test]
async fn test_data_route_unknown_ticker_is_404() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/data/zzzz").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_data_route_rejects_invalid_ticker() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/data/b4d").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_upstream_is_502() {
    let addr = spawn_provider(r#"{"history":{"day":"nope"}}"#);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/data/fb").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_report_route_flags_small_sample() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/extremes/nflx")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(&resp);
    assert_eq!(body["ticker"], "NFLX");
    assert_eq!(body["start"], "2010-01-01");
    assert_eq!(body["available"], 3);
    assert_eq!(body["selected"], 3);
    assert_eq!(body["truncated"], true);
    assert_eq!(body["worst"][0]["date"], "2014-01-07");
    assert_eq!(body["best"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_chart_page_embeds_series() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/amzn").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = String::from_utf8(resp.body().to_vec()).unwrap();
    assert!(html.contains("Ticker: AMZN"));
    assert!(html.contains(r#""name":"Loss""#));
    assert!(html.contains(r#""name":"Gain""#));
    assert!(html.contains("Only 3 daily returns available"));
}

#[tokio::test]
async fn test_tickers_and_index_routes() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/api/v1/tickers").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tickers = json_body(&resp);
    assert_eq!(tickers.as_array().unwrap().len(), 11);
    assert_eq!(tickers[1], "GOOGL");

    let resp = warp::test::request().method("GET").path("/").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(resp.body().to_vec()).unwrap();
    assert!(html.contains(r#"<a href="/GOOGL">GOOGL</a>"#));
}

#[tokio::test]
async fn test_unknown_nested_path_is_404() {
    let addr = spawn_provider(FOUR_DAYS);
    let api = routes(state_for(addr, TOKEN));

    let resp = warp::test::request().method("GET").path("/a/b/c").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
