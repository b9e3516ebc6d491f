use tracing::debug;

use crate::domain::entities::bar::BarSeries;
use crate::domain::entities::signals::{CrossoverEvent, ProfitPotential};

/// Measures the forward headroom of each bullish crossover: the highest high
/// among all strictly later bars, and how long it took to get there.
///
/// Look-ahead by construction, so only meaningful on historical data. A
/// bullish event at the very last bar has no future to measure and is
/// skipped rather than fabricated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitPotentialAnalyzer;

impl ProfitPotentialAnalyzer {
    pub fn analyze(
        &self,
        bars: &BarSeries,
        crossovers: &[CrossoverEvent],
    ) -> Vec<ProfitPotential> {
        let mut potentials = Vec::new();

        for event in crossovers.iter().filter(|e| e.is_bullish()) {
            let future = &bars.bars()[(event.index + 1).min(bars.len())..];
            let Some(first) = future.first() else {
                debug!(date = %event.date, "Bullish crossover at last bar, no forward window");
                continue;
            };

            let mut peak = first;
            for bar in &future[1..] {
                // Earliest bar wins ties
                if bar.high > peak.high {
                    peak = bar;
                }
            }

            let crossover_price = event.price.value();
            let percent_gain = (peak.high.value() - crossover_price) / crossover_price * 100.0;
            let days_to_peak = peak.date.signed_duration_since(event.date).num_days();

            debug!(
                crossover = %event.date,
                peak = %peak.date,
                percent_gain,
                days_to_peak,
                "Measured profit potential"
            );
            potentials.push(ProfitPotential {
                crossover_date: event.date,
                crossover_price: event.price,
                peak_date: peak.date,
                peak_price: peak.high,
                percent_gain,
                days_to_peak,
            });
        }
        potentials
    }
}
