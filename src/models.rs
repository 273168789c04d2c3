// src/models.rs
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

static TICKER_PATTERN: OnceLock<Regex> = OnceLock::new();

// 1-10 uppercase ASCII letters
pub fn is_valid_ticker(ticker: &str) -> bool {
    TICKER_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z]{1,10}$").expect("ticker pattern compiles"))
        .is_match(ticker)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

// 0.015 is +1.5%
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    #[serde(rename = "return")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnSeries {
    entries: Vec<DailyReturn>,
}

impl ReturnSeries {
    pub(crate) fn from_entries(entries: Vec<DailyReturn>) -> Self {
        ReturnSeries { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyReturn> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[DailyReturn] {
        &self.entries
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.entries
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| self.entries[idx].value)
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        to_date_map(self.entries.iter())
    }
}

/// `worst` runs most negative first, `best` most positive first. The two
/// lists never share a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedExtremes {
    pub worst: Vec<DailyReturn>,
    pub best: Vec<DailyReturn>,
    pub available: usize,
    pub per_side: usize,
}

impl RankedExtremes {
    // entries actually selected, at most 2 * per_side
    pub fn len(&self) -> usize {
        self.worst.len() + self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worst.is_empty() && self.best.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.len() < self.per_side * 2
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyReturn> {
        self.worst.iter().chain(self.best.iter())
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        to_date_map(self.iter())
    }
}

#[derive(Debug, Serialize)]
pub struct ExtremesReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub available: usize,
    pub selected: usize,
    pub truncated: bool,
    pub worst: Vec<DailyReturn>,
    pub best: Vec<DailyReturn>,
}

impl ExtremesReport {
    pub fn new(ticker: &str, start: NaiveDate, extremes: RankedExtremes) -> Self {
        ExtremesReport {
            ticker: ticker.to_string(),
            start,
            available: extremes.available,
            selected: extremes.len(),
            truncated: extremes.is_truncated(),
            worst: extremes.worst,
            best: extremes.best,
        }
    }
}

fn to_date_map<'a>(entries: impl Iterator<Item = &'a DailyReturn>) -> BTreeMap<String, f64> {
    entries
        .map(|r| (r.date.format("%Y-%m-%d").to_string(), r.value))
        .collect()
}
