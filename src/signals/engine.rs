//! Signal engine: indicator snapshot in, strongest candidate out.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::MarketDataError;
use crate::indicators::IndicatorEngine;
use crate::models::indicators::IndicatorSet;
use crate::models::signal::SignalCandidate;
use crate::services::market_data::MarketDataSource;
use crate::signals::rules::{self, SignalConfig};

/// Evaluates the watch-list against the rule set each cycle.
pub struct SignalEngine {
    source: Arc<dyn MarketDataSource>,
    indicators: IndicatorEngine,
    config: SignalConfig,
    watch_list: Vec<String>,
    lookback_bars: usize,
}

impl SignalEngine {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        indicators: IndicatorEngine,
        config: SignalConfig,
        watch_list: Vec<String>,
        lookback_bars: usize,
    ) -> Self {
        Self {
            source,
            indicators,
            config,
            watch_list,
            lookback_bars,
        }
    }

    pub fn watch_list(&self) -> &[String] {
        &self.watch_list
    }

    /// Run every rule in documented order: RSI, MACD, Bollinger, EMA.
    pub fn evaluate_rules(&self, set: &IndicatorSet) -> Vec<SignalCandidate> {
        [
            rules::rsi_rule(set, &self.config),
            rules::macd_rule(set),
            rules::bollinger_rule(set),
            rules::ema_rule(set),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Pick the single strongest candidate. Ties break in rule order:
    /// the first candidate seen at the winning tier is kept.
    pub fn strongest(&self, set: &IndicatorSet) -> Option<SignalCandidate> {
        let mut best: Option<SignalCandidate> = None;
        for candidate in self.evaluate_rules(set) {
            let stronger = match &best {
                Some(current) => candidate.strength > current.strength,
                None => true,
            };
            if stronger {
                best = Some(candidate);
            }
        }
        best
    }

    /// Analyze one symbol: fetch, compute indicators, select.
    ///
    /// An empty snapshot is "no data" and yields `Ok(None)`; only a source
    /// failure surfaces as an error.
    pub async fn analyze(&self, symbol: &str) -> Result<Option<SignalCandidate>, MarketDataError> {
        let snapshot = self.source.fetch(symbol, self.lookback_bars).await?;
        if snapshot.is_empty() {
            debug!(symbol = %symbol, "no market data for {}, skipping", symbol);
            return Ok(None);
        }

        let Some(set) = self.indicators.compute(&snapshot) else {
            return Ok(None);
        };

        Ok(self.strongest(&set))
    }

    /// Analyze the whole watch-list. A failure on one symbol is logged and
    /// skipped; the remaining symbols are still analyzed.
    pub async fn analyze_all(&self) -> Vec<SignalCandidate> {
        let mut candidates = Vec::new();
        for symbol in &self.watch_list {
            match self.analyze(symbol).await {
                Ok(Some(candidate)) => {
                    debug!(
                        symbol = %symbol,
                        strategy = %candidate.strategy,
                        direction = ?candidate.direction,
                        strength = ?candidate.strength,
                        "candidate selected for {}",
                        symbol
                    );
                    candidates.push(candidate);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "analysis failed for {}, skipping", symbol);
                }
            }
        }
        candidates
    }
}
