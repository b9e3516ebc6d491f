//! Bar Provider Trait
//!
//! This module defines the `BarProvider` trait, the single inbound contract
//! the engine has with the outside world: given a symbol and a requested
//! window, return an ordered sequence of daily bars or fail. Retries,
//! multi-source fallback and synthetic/demo substitution all live behind this
//! seam; the engine treats whatever comes back as just another bar sequence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::bar::Bar;

/// Common result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors a bar provider may report for a single symbol
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data returned for {symbol} over {span_days} days")]
    EmptyWindow { symbol: String, span_days: u32 },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Provider error: {0}")]
    ProviderSpecific(String),
}

/// Bar granularity of a requested window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarInterval {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for BarInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarInterval::Daily => write!(f, "1d"),
            BarInterval::Weekly => write!(f, "1wk"),
            BarInterval::Monthly => write!(f, "1mo"),
        }
    }
}

/// A requested span of history at a given granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarWindow {
    pub span_days: u32,
    pub interval: BarInterval,
}

impl BarWindow {
    pub fn new(span_days: u32, interval: BarInterval) -> Self {
        BarWindow { span_days, interval }
    }

    /// Six months of daily bars, the screener's default request.
    pub fn six_months_daily() -> Self {
        BarWindow {
            span_days: 180,
            interval: BarInterval::Daily,
        }
    }
}

impl Default for BarWindow {
    fn default() -> Self {
        Self::six_months_daily()
    }
}

/// External bar source, injected into the screener at call time.
///
/// Implementations own all connectivity concerns (sessions, retries,
/// fallback sources). The engine never holds provider state of its own.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Name of this provider, for logging
    fn name(&self) -> &str;

    /// Fetch ordered bars for one symbol over the requested window
    async fn fetch(&self, symbol: &str, window: &BarWindow) -> ProviderResult<Vec<Bar>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_six_months_daily() {
        let window = BarWindow::default();
        assert_eq!(window.span_days, 180);
        assert_eq!(window.interval, BarInterval::Daily);
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(BarInterval::Daily.to_string(), "1d");
        assert_eq!(BarInterval::Weekly.to_string(), "1wk");
        assert_eq!(BarInterval::Monthly.to_string(), "1mo");
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::EmptyWindow {
            symbol: "2330.TW".to_string(),
            span_days: 180,
        };
        assert_eq!(err.to_string(), "No data returned for 2330.TW over 180 days");
    }
}
