use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::signals::SignalReport;
use crate::domain::errors::AnalysisError;
use crate::domain::value_objects::price::Price;

/// Result of analyzing one symbol during a screening run.
///
/// Immutable once produced; the screener only filters and reorders the
/// collection, never the results themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub symbol: String,
    /// Close of the most recent bar
    pub current_price: Price,
    /// Composite quality score in [0.0, 100.0]
    pub score: f64,
    pub signals: SignalReport,
    /// Timestamp when this screening was performed
    pub screened_at: DateTime<Utc>,
}

impl ScreeningResult {
    pub fn new(symbol: String, current_price: Price, score: f64, signals: SignalReport) -> Self {
        debug_assert!(
            (0.0..=100.0).contains(&score),
            "score must be in [0.0, 100.0], got {}",
            score
        );
        ScreeningResult {
            symbol,
            current_price,
            score,
            signals,
            screened_at: Utc::now(),
        }
    }

    /// Short human-readable description of what made this symbol stand out,
    /// for result listings.
    pub fn feature_summary(&self) -> String {
        let mut features = Vec::new();
        if self.signals.bullish_crossovers().next().is_some() {
            features.push("golden cross".to_string());
        }
        if !self.signals.uptrends.is_empty() {
            features.push("gentle uptrend".to_string());
        }
        if let Some(avg) = self.signals.avg_profit_potential() {
            if avg > 10.0 {
                features.push(format!("high profit headroom ({:.1}%)", avg));
            }
        }
        if features.is_empty() {
            "no standout signals".to_string()
        } else {
            features.join(", ")
        }
    }
}

/// A symbol whose pipeline failed; never aborts the run it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: AnalysisError,
}

/// Outcome of a whole screening run: ranked survivors plus per-symbol
/// failures, reported separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Results at or above the minimum score, descending by score,
    /// ties broken by symbol ascending
    pub ranked: Vec<ScreeningResult>,
    pub failures: Vec<SymbolFailure>,
}

impl ScreeningReport {
    pub fn top(&self, n: usize) -> &[ScreeningResult] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

impl std::fmt::Display for ScreeningReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Screening results ({} symbols) ===", self.ranked.len())?;
        for (rank, result) in self.ranked.iter().enumerate() {
            writeln!(
                f,
                "{:<4} {:<12} {:<10} {:<8.1} {}",
                rank + 1,
                result.symbol,
                result.current_price,
                result.score,
                result.feature_summary()
            )?;
        }
        if !self.failures.is_empty() {
            writeln!(f, "--- {} failed ---", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "{}: {}", failure.symbol, failure.error)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::signals::{CrossoverDirection, CrossoverEvent};
    use chrono::NaiveDate;

    fn result_with_score(symbol: &str, score: f64) -> ScreeningResult {
        ScreeningResult::new(
            symbol.to_string(),
            Price::new(100.0).unwrap(),
            score,
            SignalReport::default(),
        )
    }

    #[test]
    fn test_feature_summary_no_signals() {
        let result = result_with_score("2330.TW", 0.0);
        assert_eq!(result.feature_summary(), "no standout signals");
    }

    #[test]
    fn test_feature_summary_mentions_golden_cross() {
        let mut result = result_with_score("2330.TW", 50.0);
        result.signals.crossovers.push(CrossoverEvent {
            index: 3,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            price: Price::new(100.0).unwrap(),
            direction: CrossoverDirection::Bullish,
        });
        assert!(result.feature_summary().contains("golden cross"));
    }

    #[test]
    fn test_report_top_clamps_to_len() {
        let report = ScreeningReport {
            ranked: vec![result_with_score("A", 80.0), result_with_score("B", 70.0)],
            failures: vec![],
        };
        assert_eq!(report.top(5).len(), 2);
        assert_eq!(report.top(1)[0].symbol, "A");
    }

    #[test]
    fn test_report_display_lists_failures() {
        let report = ScreeningReport {
            ranked: vec![],
            failures: vec![SymbolFailure {
                symbol: "9999.TW".to_string(),
                error: AnalysisError::InvalidInput("empty".to_string()),
            }],
        };
        let text = report.to_string();
        assert!(text.contains("9999.TW"));
        assert!(text.contains("1 failed"));
    }
}
