//! Order statistics for box and range plots.
//!
//! Values are rounded to the measurement's precision *before* any statistic
//! is computed, so a reported quartile can never fall outside the rounded
//! min/max.

use serde::Serialize;

/// Default decimal precision for measurement statistics.
pub const DEFAULT_PRECISION: u32 = 2;

pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Linear interpolation between order statistics at fraction `p` in [0, 1].
///
/// Position `h = p * (n - 1)`; the result interpolates between the
/// surrounding order statistics. A single value is every percentile of
/// itself.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let h = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let fraction = h - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Per-cell summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
    /// Tukey whisker: `Q1 - 1.5 * IQR`, clipped to the observed minimum.
    pub lower_whisker: f64,
    /// Tukey whisker: `Q3 + 1.5 * IQR`, clipped to the observed maximum.
    pub upper_whisker: f64,
    /// Standard error of the mean; `None` below two values.
    pub std_err: Option<f64>,
}

/// Summarize one cell's values at the given decimal precision.
///
/// Non-finite values are discarded; an empty cell yields `None`. A
/// single-point cell reports degenerate statistics (median = min = max,
/// IQR = 0) rather than failing.
pub fn summarize(values: &[f64], precision: u32) -> Option<SummaryStats> {
    let mut rounded: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .map(|v| round_to(v, precision))
        .collect();
    if rounded.is_empty() {
        return None;
    }
    rounded.sort_by(f64::total_cmp);

    let count = rounded.len();
    let min = rounded[0];
    let max = rounded[count - 1];
    let mean = rounded.iter().sum::<f64>() / count as f64;
    let median = percentile(&rounded, 0.5).expect("non-empty");
    let lower_quartile = percentile(&rounded, 0.25).expect("non-empty");
    let upper_quartile = percentile(&rounded, 0.75).expect("non-empty");
    let iqr = upper_quartile - lower_quartile;
    let lower_whisker = (lower_quartile - 1.5 * iqr).max(min);
    let upper_whisker = (upper_quartile + 1.5 * iqr).min(max);

    let std_err = if count > 1 {
        let variance = rounded
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        Some((variance / count as f64).sqrt())
    } else {
        None
    };

    Some(SummaryStats {
        count,
        min,
        max,
        mean: round_to(mean, precision),
        median: round_to(median, precision),
        lower_quartile: round_to(lower_quartile, precision),
        upper_quartile: round_to(upper_quartile, precision),
        lower_whisker: round_to(lower_whisker, precision),
        upper_whisker: round_to(upper_whisker, precision),
        std_err: std_err.map(|se| round_to(se, precision)),
    })
}
