// src/services/extremes.rs
use crate::models::{DailyReturn, RankedExtremes, ReturnSeries};

pub const EXTREMES_PER_SIDE: usize = 5;

pub fn select_extremes(returns: &ReturnSeries) -> RankedExtremes {
    select_extremes_with(returns, EXTREMES_PER_SIDE)
}

pub fn select_extremes_with(returns: &ReturnSeries, per_side: usize) -> RankedExtremes {
    // stable, so equal returns stay in date order
    let mut ranked: Vec<DailyReturn> = returns.as_slice().to_vec();
    ranked.sort_by(|a, b| a.value.total_cmp(&b.value));

    let n = ranked.len();
    let worst_end = per_side.min(n);
    // overlap stays with worst
    let best_start = n.saturating_sub(per_side).max(worst_end);

    let worst = ranked[..worst_end].to_vec();
    let best = ranked[best_start..].iter().rev().copied().collect();

    RankedExtremes {
        worst,
        best,
        available: n,
        per_side,
    }
}
