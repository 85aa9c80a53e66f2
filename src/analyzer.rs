use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    DecisionRule, EnrichedHistory, HistoryProvider, HistoryRequest, Period, PriceHistory,
    Recommendation, Result, SignalConfig, Symbol,
};

/// Enriched history of a symbol with the recommendation for its latest bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    pub history: EnrichedHistory,
    pub recommendation: Recommendation,
}

impl Analysis {
    /// Enriches `history` and evaluates the decision rule on it.
    ///
    /// The rule sees the bar count of `history`, so the full lookback counts
    /// towards the minimum history even while the longest windows warm up.
    #[must_use]
    pub fn compute(history: &PriceHistory, config: &SignalConfig) -> Self {
        let enriched = EnrichedHistory::from_history(history, config.pipeline);
        let recommendation = DecisionRule::new(config.decision).evaluate(&enriched);

        Self {
            history: enriched,
            recommendation,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        self.history.symbol()
    }
}

/// Fetches, enriches and evaluates one symbol at a time.
///
/// `as_of` fixes the last date of every request so repeated analyses see the
/// same window.
///
/// ```
/// use chrono::{Days, NaiveDate};
/// use quantedge_signal::{Analyzer, InMemoryProvider, Period, PriceBar, Symbol};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let bars = (0..10)
///     .map(|day| PriceBar {
///         date: start + Days::new(day),
///         open: 10.0, high: 10.0, low: 10.0, close: 10.0, volume: 0,
///     })
///     .collect();
/// let spy = Symbol::new("SPY").unwrap();
/// let provider = InMemoryProvider::new().with_bars(spy.clone(), bars);
///
/// let analyzer = Analyzer::new(provider, start + Days::new(9));
/// let analysis = analyzer.analyze(&spy, Period::OneMonth).unwrap();
/// assert_eq!(analysis.history.len(), 10);
/// assert_eq!(analysis.recommendation.to_string(), "Not worth it. HOLD.");
/// ```
#[derive(Debug)]
pub struct Analyzer<P> {
    provider: P,
    config: SignalConfig,
    as_of: NaiveDate,
}

impl<P: HistoryProvider> Analyzer<P> {
    #[must_use]
    pub fn new(provider: P, as_of: NaiveDate) -> Self {
        Self {
            provider,
            config: SignalConfig::default(),
            as_of,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SignalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    #[must_use]
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches `period` of daily bars for `symbol` and evaluates them.
    ///
    /// # Errors
    ///
    /// - [`Error::NoData`](crate::Error::NoData) when the provider has no
    ///   bars for the request.
    /// - Provider failures and invalid bars as returned by
    ///   [`PriceHistory::new`].
    pub fn analyze(&self, symbol: &Symbol, period: Period) -> Result<Analysis> {
        let request = HistoryRequest::new(symbol.clone(), period, self.as_of);
        let bars = self.provider.fetch_history(&request)?;
        debug!(%symbol, %period, bars = bars.len(), "history fetched");

        let history = PriceHistory::new(symbol.clone(), period, bars).inspect_err(|e| {
            warn!(%symbol, %period, error = %e, "history rejected");
        })?;

        let analysis = Analysis::compute(&history, &self.config);
        info!(
            %symbol,
            %period,
            bars = history.len(),
            action = %analysis.recommendation.action(),
            "analysis complete"
        );

        Ok(analysis)
    }
}
