use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::bar::BarSeries;
use crate::domain::entities::signals::SignalReport;
use crate::domain::services::indicators::IndicatorSeries;

/// Empirical scoring constants, kept configurable rather than hard-wired.
///
/// The split (30/25/25/20), the 15x slope multiplier, the /2 profit scaling
/// and the two distinct recency windows carry no documented derivation; they
/// are tunable knobs, not invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Cap on the trend-quality contribution
    pub trend_quality_cap: f64,
    /// Multiplier applied to the mean uptrend slope
    pub slope_multiplier: f64,
    /// An uptrend counts as recent if it ended within this many calendar days
    pub recent_trend_days: i64,
    /// Flat bonus for a recent bullish crossover
    pub recent_crossover_bonus: f64,
    /// A bullish crossover counts as recent within this many calendar days
    pub recent_crossover_days: i64,
    /// Cap on the profit-potential contribution
    pub profit_cap: f64,
    /// Mean percent gain is divided by this before capping
    pub profit_divisor: f64,
    /// Points per satisfied technical-posture condition
    pub posture_step: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            trend_quality_cap: 30.0,
            slope_multiplier: 15.0,
            recent_trend_days: 30,
            recent_crossover_bonus: 25.0,
            recent_crossover_days: 20,
            profit_cap: 25.0,
            profit_divisor: 2.0,
            posture_step: 5.0,
        }
    }
}

/// Combines signal output into one composite quality score in [0, 100].
///
/// Four independently capped contributions, summed then clamped. Pure:
/// identical inputs always produce an identical score.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer {
    pub weights: ScoreWeights,
}

impl QualityScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        QualityScorer { weights }
    }

    pub fn score(
        &self,
        bars: &BarSeries,
        series: &IndicatorSeries,
        signals: &SignalReport,
    ) -> f64 {
        let Some(last_bar) = bars.last() else {
            return 0.0;
        };
        let w = &self.weights;

        let trend_quality = self.trend_quality(last_bar.date, signals);
        let crossover_bonus = self.recent_crossover_bonus(last_bar.date, signals);
        let profit = self.profit_contribution(signals);
        let posture = self.technical_posture(bars, series);

        let total = (trend_quality + crossover_bonus + profit + posture).clamp(0.0, 100.0);
        debug!(
            trend_quality,
            crossover_bonus,
            profit,
            posture,
            total,
            recent_trend_days = w.recent_trend_days,
            recent_crossover_days = w.recent_crossover_days,
            "Composite quality score"
        );
        total
    }

    /// Mean slope of uptrends that ended within the trailing recency window,
    /// scaled and capped; zero when no recent segment exists.
    pub fn trend_quality(&self, last_date: chrono::NaiveDate, signals: &SignalReport) -> f64 {
        let w = &self.weights;
        let recent: Vec<f64> = signals
            .uptrends
            .iter()
            .filter(|t| {
                last_date.signed_duration_since(t.end_date).num_days() <= w.recent_trend_days
            })
            .map(|t| t.avg_slope)
            .collect();
        if recent.is_empty() {
            return 0.0;
        }
        let avg_slope = recent.iter().sum::<f64>() / recent.len() as f64;
        (avg_slope * w.slope_multiplier).min(w.trend_quality_cap)
    }

    /// Full flat bonus if any bullish crossover fell inside its recency
    /// window; nothing partial.
    pub fn recent_crossover_bonus(&self, last_date: chrono::NaiveDate, signals: &SignalReport) -> f64 {
        let w = &self.weights;
        let has_recent = signals.bullish_crossovers().any(|c| {
            last_date.signed_duration_since(c.date).num_days() <= w.recent_crossover_days
        });
        if has_recent {
            w.recent_crossover_bonus
        } else {
            0.0
        }
    }

    pub fn profit_contribution(&self, signals: &SignalReport) -> f64 {
        let w = &self.weights;
        match signals.avg_profit_potential() {
            Some(avg) => (avg / w.profit_divisor).min(w.profit_cap),
            None => 0.0,
        }
    }

    /// One step each for close above short/medium/long average, plus one for
    /// a strict short > medium > long ordering. Undefined averages count as
    /// condition-not-met.
    pub fn technical_posture(&self, bars: &BarSeries, series: &IndicatorSeries) -> f64 {
        if bars.is_empty() || series.len() != bars.len() || !series.is_aligned() {
            return 0.0;
        }
        let i = bars.len() - 1;
        let close = bars[i].close.value();
        let step = self.weights.posture_step;
        let mut points = 0.0;

        let short = series.short_ema[i];
        let medium = series.medium_ema[i];
        let long = series.long_ema[i];

        if short.map(|s| close > s).unwrap_or(false) {
            points += step;
        }
        if medium.map(|m| close > m).unwrap_or(false) {
            points += step;
        }
        if long.map(|l| close > l).unwrap_or(false) {
            points += step;
        }
        if let (Some(s), Some(m), Some(l)) = (short, medium, long) {
            if s > m && m > l {
                points += step;
            }
        }
        points
    }
}
