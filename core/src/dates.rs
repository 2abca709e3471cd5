//! Transaction date sampling inside a campaign window.
//!
//! Every offset is clamped into the closed window [start, end];
//! out-of-range draws are clamped, never resampled.

use crate::{config::DateDistribution, rng::SimRng};
use chrono::{Duration, NaiveDate};

/// Draw `n` dates inside [start, end] following `distribution`.
pub fn sample_dates(
    n: usize,
    distribution: DateDistribution,
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut SimRng,
) -> Vec<NaiveDate> {
    let window_days = (end - start).num_days().max(0);
    (0..n)
        .map(|_| {
            let offset = sample_offset(distribution, window_days, rng);
            start + Duration::days(offset)
        })
        .collect()
}

/// A day offset in [0, window_days].
fn sample_offset(distribution: DateDistribution, window_days: i64, rng: &mut SimRng) -> i64 {
    let mean = window_days as f64 / 2.0;
    let raw = match distribution {
        DateDistribution::Exponential => rng.exponential(mean).floor() as i64,
        DateDistribution::InvertedExponential => window_days - rng.exponential(mean).floor() as i64,
        DateDistribution::Uniform | DateDistribution::Unrecognized => {
            rng.uniform_inclusive(0, window_days)
        }
    };
    raw.clamp(0, window_days)
}
