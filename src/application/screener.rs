use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::ScreenerConfig;
use crate::domain::entities::bar::BarSeries;
use crate::domain::entities::screening::{ScreeningReport, ScreeningResult, SymbolFailure};
use crate::domain::errors::AnalysisError;
use crate::domain::repositories::bar_provider::{BarProvider, BarWindow};
use crate::domain::services::analyzer::SymbolAnalyzer;

/// Screens a universe of symbols concurrently and ranks the survivors.
///
/// The bar provider is injected at construction; the screener holds no
/// connectivity state of its own. Each symbol runs its full pipeline on one
/// worker, failures stay scoped to their symbol, and the ranking is applied
/// only after every pipeline has finished.
pub struct StockScreener {
    provider: Arc<dyn BarProvider>,
    analyzer: SymbolAnalyzer,
    config: ScreenerConfig,
}

impl StockScreener {
    pub fn new(provider: Arc<dyn BarProvider>, config: ScreenerConfig) -> Self {
        StockScreener {
            provider,
            analyzer: SymbolAnalyzer::new(config.indicators, config.uptrend, config.weights),
            config,
        }
    }

    pub fn with_defaults(provider: Arc<dyn BarProvider>) -> Self {
        Self::new(provider, ScreenerConfig::default())
    }

    /// Screen the given symbols, at most `max_concurrency` at a time.
    ///
    /// Returns survivors at or above `min_score` sorted descending by score
    /// (ties by symbol ascending), plus every per-symbol failure. A worker
    /// that dies before reporting is recorded as a failure for its symbol.
    pub async fn screen(&self, symbols: &[String]) -> ScreeningReport {
        info!(
            symbol_count = symbols.len(),
            min_score = self.config.min_score,
            max_concurrency = self.config.max_concurrency,
            provider = self.provider.name(),
            "Starting screening run"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks: JoinSet<(usize, Result<ScreeningResult, AnalysisError>)> = JoinSet::new();

        for (index, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.clone();
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let analyzer = self.analyzer;
            let window = self.config.window;

            tasks.spawn(async move {
                // Closed semaphore is unreachable; treat it as an aborted task
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            index,
                            Err(AnalysisError::TaskAborted("worker pool closed".to_string())),
                        )
                    }
                };
                let outcome = run_pipeline(provider, analyzer, window, &symbol).await;
                (index, outcome)
            });
        }

        // Workers report into their symbol's slot; a slot still empty after
        // the join loop means the worker died before reporting (e.g. a
        // panicking provider) and is charged to that symbol below.
        let mut outcomes: Vec<Option<Result<ScreeningResult, AnalysisError>>> =
            (0..symbols.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(join_err) => {
                    error!(error = %join_err, "Screening worker aborted");
                }
            }
        }

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (symbol, outcome) in symbols.iter().zip(outcomes) {
            match outcome {
                Some(Ok(result)) => {
                    debug!(symbol = %symbol, score = result.score, "Symbol screened");
                    results.push(result);
                }
                Some(Err(err)) => {
                    warn!(symbol = %symbol, error = %err, "Symbol pipeline failed");
                    failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        error: err,
                    });
                }
                None => {
                    warn!(symbol = %symbol, "Worker died before reporting");
                    failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        error: AnalysisError::TaskAborted(format!(
                            "worker panicked for {}",
                            symbol
                        )),
                    });
                }
            }
        }

        let min_score = self.config.min_score;
        let mut ranked: Vec<ScreeningResult> =
            results.into_iter().filter(|r| r.score >= min_score).collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        info!(
            ranked = ranked.len(),
            failed = failures.len(),
            "Screening run complete"
        );
        ScreeningReport { ranked, failures }
    }
}

/// One symbol's pipeline: fetch, validate, analyze.
async fn run_pipeline(
    provider: Arc<dyn BarProvider>,
    analyzer: SymbolAnalyzer,
    window: BarWindow,
    symbol: &str,
) -> Result<ScreeningResult, AnalysisError> {
    let raw_bars = provider
        .fetch(symbol, &window)
        .await
        .map_err(|e| AnalysisError::ProviderFailure {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

    let bars = BarSeries::new(raw_bars)?;

    // The analysis stage is pure; contain any unexpected numerical panic to
    // this symbol instead of poisoning the run.
    std::panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(symbol, &bars)))
        .unwrap_or_else(|_| {
            Err(AnalysisError::TaskAborted(format!(
                "analysis panicked for {}",
                symbol
            )))
        })
}
