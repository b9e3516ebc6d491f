use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::price::Price;

/// Which way the short average crossed the medium average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverDirection {
    /// Short average moved from at-or-below to above (golden cross)
    Bullish,
    /// Short average moved from at-or-above to below (death cross)
    Bearish,
}

/// The bar where the short and medium exponential averages flipped order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    /// Index into the bar sequence the event was detected on
    pub index: usize,
    pub date: NaiveDate,
    /// Close at the crossover bar
    pub price: Price,
    pub direction: CrossoverDirection,
}

impl CrossoverEvent {
    pub fn is_bullish(&self) -> bool {
        self.direction == CrossoverDirection::Bullish
    }
}

/// A sustained run of bars whose rolling price slope stayed inside the
/// gentle-uptrend admission band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UptrendSegment {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_bars: usize,
    /// Mean rolling slope over the segment's bars
    pub avg_slope: f64,
    pub start_price: Price,
    pub end_price: Price,
}

impl UptrendSegment {
    /// Close-to-close gain over the segment, in percent.
    pub fn percent_gain(&self) -> f64 {
        let start = self.start_price.value();
        if start == 0.0 {
            return 0.0;
        }
        (self.end_price.value() - start) / start * 100.0
    }
}

/// Forward-looking headroom measured from a bullish crossover to the highest
/// subsequent high. Backtest-style: only meaningful on historical data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitPotential {
    pub crossover_date: NaiveDate,
    pub crossover_price: Price,
    pub peak_date: NaiveDate,
    pub peak_price: Price,
    /// (peak - crossover) / crossover * 100
    pub percent_gain: f64,
    /// Calendar days from crossover to the first bar attaining the peak
    pub days_to_peak: i64,
}

/// Everything the signal pipeline derives from one bar sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalReport {
    pub crossovers: Vec<CrossoverEvent>,
    pub uptrends: Vec<UptrendSegment>,
    pub profit_potentials: Vec<ProfitPotential>,
}

impl SignalReport {
    pub fn bullish_crossovers(&self) -> impl Iterator<Item = &CrossoverEvent> {
        self.crossovers.iter().filter(|c| c.is_bullish())
    }

    /// Mean percent gain across all measured profit potentials, if any.
    pub fn avg_profit_potential(&self) -> Option<f64> {
        if self.profit_potentials.is_empty() {
            return None;
        }
        let sum: f64 = self.profit_potentials.iter().map(|p| p.percent_gain).sum();
        Some(sum / self.profit_potentials.len() as f64)
    }
}
