use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::errors::{AnalysisError, ValidationError};
use crate::domain::value_objects::price::Price;

/// One trading day's open/high/low/close/volume summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        if !volume.is_finite() {
            return Err(ValidationError::InvalidVolume(
                "volume must be finite".to_string(),
            ));
        }
        if volume < 0.0 {
            return Err(ValidationError::InvalidVolume(
                "volume must be non-negative".to_string(),
            ));
        }
        Ok(Bar {
            date,
            open: Price::new(open)?,
            high: Price::new(high)?,
            low: Price::new(low)?,
            close: Price::new(close)?,
            volume,
        })
    }
}

/// An immutable, strictly date-ordered sequence of daily bars.
///
/// Every indicator and detector takes a `BarSeries`, so ordering and value
/// validity are checked once at the boundary and never again downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Strict constructor: rejects the whole sequence on the first
    /// out-of-order or duplicate date.
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::NonIncreasingDates { index: i + 1 });
            }
        }
        Ok(BarSeries { bars })
    }

    /// Lenient constructor: keeps the first bar of any misordered pair and
    /// drops the rest, for callers fed by messy upstream sources.
    pub fn normalized(bars: Vec<Bar>) -> Self {
        let total = bars.len();
        let mut kept: Vec<Bar> = Vec::with_capacity(total);
        for bar in bars {
            match kept.last() {
                Some(prev) if bar.date <= prev.date => {
                    warn!(
                        date = %bar.date,
                        prev_date = %prev.date,
                        "Dropping out-of-order bar"
                    );
                }
                _ => kept.push(bar),
            }
        }
        if kept.len() < total {
            warn!(dropped = total - kept.len(), kept = kept.len(), "Normalized bar sequence");
        }
        BarSeries { bars: kept }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close.value()).collect()
    }
}

impl std::ops::Index<usize> for BarSeries {
    type Output = Bar;

    fn index(&self, index: usize) -> &Bar {
        &self.bars[index]
    }
}
