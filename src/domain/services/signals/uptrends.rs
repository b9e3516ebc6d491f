use tracing::debug;

use crate::domain::entities::bar::BarSeries;
use crate::domain::entities::signals::UptrendSegment;
use crate::domain::services::indicators::IndicatorSeries;

/// Identifies sustained gentle climbs: maximal runs of bars whose rolling
/// slope stays inside `[min_slope, max_slope]` inclusive.
///
/// A run closes the moment a bar falls outside the band (or its slope is
/// undefined) or the sequence ends; a run still open at the last bar is
/// closed there and evaluated like any other. Runs shorter than
/// `min_duration_bars` are discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UptrendDetector {
    pub min_slope: f64,
    pub max_slope: f64,
    pub min_duration_bars: usize,
}

impl Default for UptrendDetector {
    fn default() -> Self {
        UptrendDetector {
            min_slope: 0.1,
            max_slope: 2.0,
            min_duration_bars: 10,
        }
    }
}

impl UptrendDetector {
    pub fn detect(&self, bars: &BarSeries, series: &IndicatorSeries) -> Vec<UptrendSegment> {
        let mut segments = Vec::new();
        if bars.len() != series.len() || !series.is_aligned() {
            return segments;
        }
        let mut run_start: Option<usize> = None;

        for i in 0..bars.len() {
            let admitted = series.slope[i]
                .map(|s| s >= self.min_slope && s <= self.max_slope)
                .unwrap_or(false);

            if admitted {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                self.close_run(bars, series, start, i, &mut segments);
            }
        }
        if let Some(start) = run_start {
            self.close_run(bars, series, start, bars.len(), &mut segments);
        }
        segments
    }

    /// Evaluate the run spanning indices [start, end).
    fn close_run(
        &self,
        bars: &BarSeries,
        series: &IndicatorSeries,
        start: usize,
        end: usize,
        segments: &mut Vec<UptrendSegment>,
    ) {
        let duration = end - start;
        if duration < self.min_duration_bars {
            return;
        }
        let slope_sum: f64 = series.slope[start..end].iter().flatten().sum();
        let segment = UptrendSegment {
            start_date: bars[start].date,
            end_date: bars[end - 1].date,
            duration_bars: duration,
            avg_slope: slope_sum / duration as f64,
            start_price: bars[start].close,
            end_price: bars[end - 1].close,
        };
        debug!(
            start = %segment.start_date,
            end = %segment.end_date,
            duration_bars = duration,
            avg_slope = segment.avg_slope,
            "Recorded gentle uptrend segment"
        );
        segments.push(segment);
    }
}
