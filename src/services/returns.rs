// src/services/returns.rs
use log::warn;

use crate::models::{DailyBar, DailyReturn, ReturnSeries};

use super::error::FetchError;

/// Day-over-day fractional returns, `close[i] / close[i-1] - 1`.
///
/// Bars must be strictly ascending by date. The first bar yields no entry,
/// so `n` bars give `n - 1` returns and one or zero bars give an empty
/// series. Unordered or duplicate dates and a non-positive prior close are
/// reported as `Malformed`.
pub fn compute_returns(bars: &[DailyBar]) -> Result<ReturnSeries, FetchError> {
    let mut entries = Vec::with_capacity(bars.len().saturating_sub(1));

    for pair in bars.windows(2) {
        let (prior, current) = (&pair[0], &pair[1]);

        if current.date <= prior.date {
            warn!("Bars out of order: {} follows {}", current.date, prior.date);
            return Err(FetchError::Malformed(format!(
                "bars not strictly ascending: {} follows {}",
                current.date, prior.date
            )));
        }
        if !prior.close.is_finite() || prior.close <= 0.0 {
            warn!("Unusable prior close {} on {}", prior.close, prior.date);
            return Err(FetchError::Malformed(format!(
                "prior close {} on {} cannot be divided by",
                prior.close, prior.date
            )));
        }

        let value = current.close / prior.close - 1.0;
        if !value.is_finite() {
            return Err(FetchError::Malformed(format!(
                "non-finite return on {} (close {})",
                current.date, current.close
            )));
        }

        entries.push(DailyReturn { date: current.date, value });
    }

    Ok(ReturnSeries::from_entries(entries))
}
