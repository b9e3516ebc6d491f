use serde::{Deserialize, Serialize};

use crate::domain::entities::bar::BarSeries;

/// Derived per-bar series, aligned 1:1 with the bar sequence by index.
///
/// Entries are `None` until the underlying window has enough data; no NaN
/// sentinels anywhere, so downstream logic can't mistake "undefined" for a
/// real level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    /// Short exponential average (window 5 by default)
    pub short_ema: Vec<Option<f64>>,
    /// Medium exponential average (window 20 by default)
    pub medium_ema: Vec<Option<f64>>,
    /// Long exponential average (window 60 by default)
    pub long_ema: Vec<Option<f64>>,
    /// Trailing-window minimum of lows
    pub support: Vec<Option<f64>>,
    /// Trailing-window maximum of highs
    pub resistance: Vec<Option<f64>>,
    /// Least-squares slope of closes over the trailing slope window
    pub slope: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.short_ema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_ema.is_empty()
    }

    /// Whether every column has the same length. Output of
    /// `IndicatorEngine::compute` always is; a hand-built or deserialized
    /// series may not be, and consumers refuse ragged input.
    pub fn is_aligned(&self) -> bool {
        let n = self.short_ema.len();
        self.medium_ema.len() == n
            && self.long_ema.len() == n
            && self.support.len() == n
            && self.resistance.len() == n
            && self.slope.len() == n
    }
}

/// Computes every derived series from one pass over a bar sequence.
///
/// Pure: no side effects, identical inputs always yield identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorEngine {
    pub short_window: usize,
    pub medium_window: usize,
    pub long_window: usize,
    /// Support/resistance trailing window
    pub sr_window: usize,
    /// Trend slope regression window
    pub slope_window: usize,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        IndicatorEngine {
            short_window: 5,
            medium_window: 20,
            long_window: 60,
            sr_window: 20,
            slope_window: 20,
        }
    }
}

impl IndicatorEngine {
    pub fn new(
        short_window: usize,
        medium_window: usize,
        long_window: usize,
        sr_window: usize,
        slope_window: usize,
    ) -> Self {
        IndicatorEngine {
            short_window,
            medium_window,
            long_window,
            sr_window,
            slope_window,
        }
    }

    pub fn compute(&self, bars: &BarSeries) -> IndicatorSeries {
        if bars.is_empty() {
            return IndicatorSeries::default();
        }
        let closes = bars.closes();
        let lows: Vec<f64> = bars.bars().iter().map(|b| b.low.value()).collect();
        let highs: Vec<f64> = bars.bars().iter().map(|b| b.high.value()).collect();

        IndicatorSeries {
            short_ema: ema(&closes, self.short_window),
            medium_ema: ema(&closes, self.medium_window),
            long_ema: ema(&closes, self.long_window),
            support: rolling(&lows, self.sr_window, f64::min),
            resistance: rolling(&highs, self.sr_window, f64::max),
            slope: rolling_slope(&closes, self.slope_window),
        }
    }
}

/// Exponential average with smoothing factor 2/(window+1), seeded at index
/// window-1 with the simple average of the first `window` values.
fn ema(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let multiplier = 2.0 / (window as f64 + 1.0);

    // First value is the SMA of the initial window
    let seed: f64 = values[..window].iter().sum::<f64>() / window as f64;
    out[window - 1] = Some(seed);

    let mut current = seed;
    for (i, &val) in values.iter().enumerate().skip(window) {
        current = (val - current) * multiplier + current;
        out[i] = Some(current);
    }
    out
}

/// Trailing-window fold (min for support, max for resistance); undefined
/// until the window is full.
fn rolling(values: &[f64], window: usize, fold: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mut acc = slice[0];
        for &v in &slice[1..] {
            acc = fold(acc, v);
        }
        out[i] = Some(acc);
    }
    out
}

/// Ordinary least-squares slope of the trailing window ending at each index,
/// against integer positions 0..k-1. Needs at least 2 points; a degenerate
/// or singular fit yields `None`, never a panic.
fn rolling_slope(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 {
        return out;
    }
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        out[i] = ols_slope(&values[start..=i]);
    }
    out
}

fn ols_slope(y: &[f64]) -> Option<f64> {
    let n = y.len();
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = y.iter().sum::<f64>() / n_f;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (yi - mean_y);
        denominator += dx * dx;
    }
    if denominator <= f64::EPSILON {
        return None;
    }
    let slope = numerator / denominator;
    if slope.is_finite() {
        Some(slope)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::bar::Bar;
    use chrono::NaiveDate;

    fn series_from_closes(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let d = start + chrono::Days::new(i as u64);
                Bar::new(d, c, c + 1.0, (c - 1.0).max(0.0), c, 1000.0).unwrap()
            })
            .collect();
        BarSeries::new(bars).unwrap()
    }

    #[test]
    fn test_series_length_matches_input() {
        let bars = series_from_closes(&[100.0; 30]);
        let series = IndicatorEngine::default().compute(&bars);
        assert_eq!(series.len(), 30);
        assert_eq!(series.medium_ema.len(), 30);
        assert_eq!(series.support.len(), 30);
        assert_eq!(series.slope.len(), 30);
    }

    #[test]
    fn test_empty_bars_give_empty_series() {
        let bars = BarSeries::new(vec![]).unwrap();
        let series = IndicatorEngine::default().compute(&bars);
        assert!(series.is_empty());
    }

    #[test]
    fn test_ema_undefined_before_window_full() {
        let values = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!(values[2].is_some());
    }

    #[test]
    fn test_ema_seeded_with_simple_average() {
        let values = ema(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(values[2], Some(2.0));
    }

    #[test]
    fn test_ema_too_few_values_all_undefined() {
        let values = ema(&[1.0, 2.0], 5);
        assert!(values.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_ema_converges_on_constant_input() {
        let closes = vec![50.0; 200];
        let values = ema(&closes, 20);
        let last = values.last().unwrap().unwrap();
        assert!((last - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_support_is_trailing_min_of_lows() {
        let bars = series_from_closes(&[10.0, 5.0, 8.0, 12.0, 20.0]);
        let engine = IndicatorEngine {
            sr_window: 3,
            ..IndicatorEngine::default()
        };
        let series = engine.compute(&bars);
        assert_eq!(series.support[0], None);
        assert_eq!(series.support[1], None);
        // lows are close - 1
        assert_eq!(series.support[2], Some(4.0));
        assert_eq!(series.support[3], Some(4.0));
        assert_eq!(series.support[4], Some(7.0));
    }

    #[test]
    fn test_resistance_is_trailing_max_of_highs() {
        let bars = series_from_closes(&[10.0, 5.0, 8.0, 12.0, 20.0]);
        let engine = IndicatorEngine {
            sr_window: 3,
            ..IndicatorEngine::default()
        };
        let series = engine.compute(&bars);
        // highs are close + 1
        assert_eq!(series.resistance[2], Some(11.0));
        assert_eq!(series.resistance[4], Some(21.0));
    }

    #[test]
    fn test_slope_undefined_with_single_point() {
        let slopes = rolling_slope(&[100.0], 20);
        assert_eq!(slopes[0], None);
    }

    #[test]
    fn test_slope_defined_from_second_point() {
        let slopes = rolling_slope(&[100.0, 101.0, 102.0], 20);
        assert_eq!(slopes[0], None);
        assert!((slopes[1].unwrap() - 1.0).abs() < 1e-9);
        assert!((slopes[2].unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_slope_of_linear_closes_equals_increment() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + 0.5 * i as f64).collect();
        let slopes = rolling_slope(&closes, 20);
        let last = slopes.last().unwrap().unwrap();
        assert!((last - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_slope_of_flat_closes_is_zero() {
        let slopes = rolling_slope(&[100.0; 30], 20);
        let last = slopes.last().unwrap().unwrap();
        assert!(last.abs() < 1e-9);
    }

    #[test]
    fn test_ols_slope_degenerate_cases() {
        assert_eq!(ols_slope(&[]), None);
        assert_eq!(ols_slope(&[1.0]), None);
        assert!(ols_slope(&[1.0, 1.0]).is_some());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let bars = series_from_closes(&(0..80).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let engine = IndicatorEngine::default();
        assert_eq!(engine.compute(&bars), engine.compute(&bars));
    }

    #[test]
    fn test_computed_series_is_aligned_but_ragged_one_is_not() {
        let bars = series_from_closes(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let mut series = IndicatorEngine::default().compute(&bars);
        assert!(series.is_aligned());

        series.slope.pop();
        assert!(!series.is_aligned());
    }
}
