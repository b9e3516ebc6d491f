use crate::domain::repositories::bar_provider::BarWindow;
use crate::domain::services::indicators::IndicatorEngine;
use crate::domain::services::scoring::ScoreWeights;
use crate::domain::services::signals::UptrendDetector;

/// Configuration for a screening run
#[derive(Debug, Clone, Copy)]
pub struct ScreenerConfig {
    /// History requested from the bar provider per symbol
    pub window: BarWindow,
    pub indicators: IndicatorEngine,
    pub uptrend: UptrendDetector,
    pub weights: ScoreWeights,
    /// Results scoring below this are dropped from the ranking
    pub min_score: f64,
    /// Maximum symbol pipelines running at once
    pub max_concurrency: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        ScreenerConfig {
            window: BarWindow::default(),
            indicators: IndicatorEngine::default(),
            uptrend: UptrendDetector::default(),
            weights: ScoreWeights::default(),
            min_score: 60.0,
            max_concurrency: 5,
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from environment variables, keeping defaults for
    /// anything unset or out of range.
    pub fn from_env() -> ScreenerConfig {
        let mut config = ScreenerConfig::default();

        if let Ok(min_score) = std::env::var("SCREENER_MIN_SCORE") {
            match min_score.parse::<f64>() {
                Ok(value) if (0.0..=100.0).contains(&value) => {
                    config.min_score = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SCREENER_MIN_SCORE value: {} (must be between 0 and 100), using default: {}",
                        value,
                        config.min_score
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SCREENER_MIN_SCORE '{}': {}, using default: {}",
                        min_score,
                        e,
                        config.min_score
                    );
                }
            }
        }

        if let Ok(workers) = std::env::var("SCREENER_MAX_CONCURRENCY") {
            match workers.parse::<usize>() {
                Ok(value) if (1..=64).contains(&value) => {
                    config.max_concurrency = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SCREENER_MAX_CONCURRENCY value: {} (must be between 1 and 64), using default: {}",
                        value,
                        config.max_concurrency
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SCREENER_MAX_CONCURRENCY '{}': {}, using default: {}",
                        workers,
                        e,
                        config.max_concurrency
                    );
                }
            }
        }

        if let Ok(span) = std::env::var("SCREENER_WINDOW_DAYS") {
            match span.parse::<u32>() {
                Ok(value) if (30..=3650).contains(&value) => {
                    config.window.span_days = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SCREENER_WINDOW_DAYS value: {} (must be between 30 and 3650), using default: {}",
                        value,
                        config.window.span_days
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SCREENER_WINDOW_DAYS '{}': {}, using default: {}",
                        span,
                        e,
                        config.window.span_days
                    );
                }
            }
        }

        if let Ok(min_slope) = std::env::var("SCREENER_UPTREND_MIN_SLOPE") {
            match min_slope.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    config.uptrend.min_slope = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SCREENER_UPTREND_MIN_SLOPE value: {} (must be finite), using default: {}",
                        value,
                        config.uptrend.min_slope
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SCREENER_UPTREND_MIN_SLOPE '{}': {}, using default: {}",
                        min_slope,
                        e,
                        config.uptrend.min_slope
                    );
                }
            }
        }

        if let Ok(max_slope) = std::env::var("SCREENER_UPTREND_MAX_SLOPE") {
            match max_slope.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= config.uptrend.min_slope => {
                    config.uptrend.max_slope = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SCREENER_UPTREND_MAX_SLOPE value: {} (must be finite and at least the minimum slope {}), using default: {}",
                        value,
                        config.uptrend.min_slope,
                        config.uptrend.max_slope
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SCREENER_UPTREND_MAX_SLOPE '{}': {}, using default: {}",
                        max_slope,
                        e,
                        config.uptrend.max_slope
                    );
                }
            }
        }

        if let Ok(min_duration) = std::env::var("SCREENER_UPTREND_MIN_BARS") {
            match min_duration.parse::<usize>() {
                Ok(value) if value >= 2 => {
                    config.uptrend.min_duration_bars = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid SCREENER_UPTREND_MIN_BARS value: {} (must be at least 2), using default: {}",
                        value,
                        config.uptrend.min_duration_bars
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse SCREENER_UPTREND_MIN_BARS '{}': {}, using default: {}",
                        min_duration,
                        e,
                        config.uptrend.min_duration_bars
                    );
                }
            }
        }

        config
    }
}
