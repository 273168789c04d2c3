// src/services/chart.rs
use serde::Serialize;

use crate::models::{DailyReturn, RankedExtremes};

pub const LOSS_COLOR: &str = "rgba(223, 83, 83, .5)";
pub const GAIN_COLOR: &str = "rgba(119, 152, 191, .5)";

// points are [utc_millis, percent]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub color: &'static str,
    pub data: Vec<[f64; 2]>,
}

pub fn build_chart(extremes: &RankedExtremes) -> Vec<ChartSeries> {
    // zero counts as a gain
    let mut losses: Vec<&DailyReturn> = extremes.iter().filter(|r| r.value < 0.0).collect();
    let mut gains: Vec<&DailyReturn> = extremes.iter().filter(|r| r.value >= 0.0).collect();
    losses.sort_by_key(|r| r.date);
    gains.sort_by_key(|r| r.date);

    vec![
        ChartSeries { name: "Loss", color: LOSS_COLOR, data: losses.into_iter().map(to_point).collect() },
        ChartSeries { name: "Gain", color: GAIN_COLOR, data: gains.into_iter().map(to_point).collect() },
    ]
}

fn to_point(r: &DailyReturn) -> [f64; 2] {
    let millis = r
        .date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default();
    let percent = (r.value * 10_000.0).round() / 100.0;
    [millis as f64, percent]
}
