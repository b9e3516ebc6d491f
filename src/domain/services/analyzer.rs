use tracing::debug;

use crate::domain::entities::bar::BarSeries;
use crate::domain::entities::screening::ScreeningResult;
use crate::domain::entities::signals::SignalReport;
use crate::domain::errors::AnalysisError;
use crate::domain::services::indicators::{IndicatorEngine, IndicatorSeries};
use crate::domain::services::scoring::{QualityScorer, ScoreWeights};
use crate::domain::services::signals::{
    CrossoverDetector, ProfitPotentialAnalyzer, UptrendDetector,
};

/// Single-symbol pipeline: indicators, then events, then forward profit,
/// then the composite score.
///
/// Everything is recomputed from scratch per call; nothing is cached or
/// mutated between invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolAnalyzer {
    pub indicators: IndicatorEngine,
    pub crossovers: CrossoverDetector,
    pub uptrends: UptrendDetector,
    pub profit: ProfitPotentialAnalyzer,
    pub scorer: QualityScorer,
}

impl SymbolAnalyzer {
    pub fn new(indicators: IndicatorEngine, uptrends: UptrendDetector, weights: ScoreWeights) -> Self {
        SymbolAnalyzer {
            indicators,
            crossovers: CrossoverDetector,
            uptrends,
            profit: ProfitPotentialAnalyzer,
            scorer: QualityScorer::new(weights),
        }
    }

    pub fn compute_indicators(&self, bars: &BarSeries) -> IndicatorSeries {
        self.indicators.compute(bars)
    }

    /// Derive all signals from one bar sequence.
    pub fn compute_signals(&self, bars: &BarSeries) -> SignalReport {
        let series = self.indicators.compute(bars);
        self.compute_signals_with(bars, &series)
    }

    fn compute_signals_with(&self, bars: &BarSeries, series: &IndicatorSeries) -> SignalReport {
        let crossovers = self.crossovers.detect(bars, series);
        let uptrends = self.uptrends.detect(bars, series);
        let profit_potentials = self.profit.analyze(bars, &crossovers);
        SignalReport {
            crossovers,
            uptrends,
            profit_potentials,
        }
    }

    /// Score a symbol's bars without building a full result.
    pub fn score_symbol(&self, bars: &BarSeries) -> f64 {
        let series = self.indicators.compute(bars);
        let signals = self.compute_signals_with(bars, &series);
        self.scorer.score(bars, &series, &signals)
    }

    /// Run the full pipeline and package a screening result for one symbol.
    pub fn analyze(&self, symbol: &str, bars: &BarSeries) -> Result<ScreeningResult, AnalysisError> {
        let last = bars
            .last()
            .ok_or_else(|| AnalysisError::InvalidInput("empty bar sequence".to_string()))?;
        let current_price = last.close;

        let series = self.indicators.compute(bars);
        let signals = self.compute_signals_with(bars, &series);
        let score = self.scorer.score(bars, &series, &signals);

        debug!(
            symbol,
            bar_count = bars.len(),
            crossover_count = signals.crossovers.len(),
            uptrend_count = signals.uptrends.len(),
            score,
            "Analyzed symbol"
        );
        Ok(ScreeningResult::new(
            symbol.to_string(),
            current_price,
            score,
            signals,
        ))
    }
}
