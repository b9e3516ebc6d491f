use tracing::debug;

use crate::domain::entities::bar::BarSeries;
use crate::domain::entities::signals::{CrossoverDirection, CrossoverEvent};
use crate::domain::services::indicators::IndicatorSeries;

/// Finds the bars where the short and medium exponential averages flip order.
///
/// Scans consecutive bar pairs; both averages must be defined at both
/// indices, so the leading undefined stretch produces no signal rather than
/// a fault. At most one event per index, bullish checked first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossoverDetector;

impl CrossoverDetector {
    pub fn detect(&self, bars: &BarSeries, series: &IndicatorSeries) -> Vec<CrossoverEvent> {
        let mut events = Vec::new();
        if bars.len() != series.len() || !series.is_aligned() {
            return events;
        }
        for i in 1..bars.len() {
            let (Some(short_prev), Some(medium_prev), Some(short), Some(medium)) = (
                series.short_ema[i - 1],
                series.medium_ema[i - 1],
                series.short_ema[i],
                series.medium_ema[i],
            ) else {
                continue;
            };

            let direction = if short_prev <= medium_prev && short > medium {
                CrossoverDirection::Bullish
            } else if short_prev >= medium_prev && short < medium {
                CrossoverDirection::Bearish
            } else {
                continue;
            };

            let bar = &bars[i];
            debug!(
                index = i,
                date = %bar.date,
                close = bar.close.value(),
                direction = ?direction,
                "Detected crossover"
            );
            events.push(CrossoverEvent {
                index: i,
                date: bar.date,
                price: bar.close,
                direction,
            });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::bar::Bar;
    use crate::domain::services::indicators::IndicatorEngine;
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

    fn detect(closes: &[f64]) -> Vec<CrossoverEvent> {
        let bars = series_from_closes(closes);
        let series = IndicatorEngine::default().compute(&bars);
        CrossoverDetector.detect(&bars, &series)
    }

    #[test]
    fn test_flat_closes_produce_no_crossovers() {
        assert!(detect(&[100.0; 60]).is_empty());
    }

    #[test]
    fn test_flat_then_rise_produces_bullish_crossover() {
        let mut closes = vec![100.0; 60];
        closes.extend((1..=30).map(|i| 100.0 + i as f64));
        let events = detect(&closes);
        let bullish: Vec<_> = events.iter().filter(|e| e.is_bullish()).collect();
        assert_eq!(bullish.len(), 1);
        // Fires near the start of the rise
        assert!(bullish[0].index >= 60 && bullish[0].index < 65);
    }

    #[test]
    fn test_rise_then_fall_produces_both_directions() {
        let mut closes = vec![100.0; 40];
        closes.extend((1..=30).map(|i| 100.0 + i as f64));
        closes.extend((1..=30).map(|i| 130.0 - 2.0 * i as f64));
        let events = detect(&closes);
        assert!(events.iter().any(|e| e.direction == CrossoverDirection::Bullish));
        assert!(events.iter().any(|e| e.direction == CrossoverDirection::Bearish));
    }

    #[test]
    fn test_events_are_chronological_with_unique_indices() {
        let mut closes = vec![100.0; 40];
        for cycle in 0..4 {
            let base = 100.0 + cycle as f64;
            closes.extend((1..=15).map(|i| base + i as f64));
            closes.extend((1..=15).map(|i| base + 15.0 - 1.5 * i as f64));
        }
        let events = detect(&closes);
        for pair in events.windows(2) {
            assert!(pair[0].index < pair[1].index);
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut closes = vec![100.0; 60];
        closes.extend((1..=30).map(|i| 100.0 + i as f64));
        let bars = series_from_closes(&closes);
        let series = IndicatorEngine::default().compute(&bars);
        let first = CrossoverDetector.detect(&bars, &series);
        let second = CrossoverDetector.detect(&bars, &series);
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_bars_only_no_signal() {
        assert!(detect(&[100.0, 101.0]).is_empty());
    }

    #[test]
    fn test_mismatched_lengths_yield_nothing() {
        let bars = series_from_closes(&[100.0; 30]);
        let events = CrossoverDetector.detect(&bars, &IndicatorSeries::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_ragged_series_yields_nothing() {
        let mut closes = vec![100.0; 60];
        closes.extend((1..=30).map(|i| 100.0 + i as f64));
        let bars = series_from_closes(&closes);
        let mut series = IndicatorEngine::default().compute(&bars);
        series.medium_ema.truncate(10);
        let events = CrossoverDetector.detect(&bars, &series);
        assert!(events.is_empty());
    }
}
