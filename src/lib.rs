//! Trend-following trade signals from daily price history.
//!
//! A [`HistoryProvider`] supplies daily [`PriceBar`]s. The
//! [`IndicatorPipeline`] enriches them with fast and slow [`Sma`]s, daily
//! returns and [`Volatility`], and support/resistance [`KeyLevels`]. The
//! [`DecisionRule`] then turns the latest row into a [`Recommendation`]:
//! BUY with entry, take-profit and stop-loss, or HOLD.
//!
//! Indicators are streaming: they accept any type implementing [`Ohlcv`] and
//! return `None` until their window is full. Each indicator type exposes
//! [`new`](Sma::new), [`compute`](Sma::compute), and [`value`](Sma::value) as
//! inherent methods, so no trait import is needed. Import [`Indicator`] only
//! for generic code.
//!
//! [`Analyzer`] ties the pieces together for one symbol and period:
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use quantedge_signal::{Analyzer, CsvHistoryProvider, Period, Symbol};
//!
//! let provider = CsvHistoryProvider::new("data/history");
//! let analyzer = Analyzer::new(provider, NaiveDate::from_ymd_opt(2024, 3, 25).unwrap());
//!
//! let analysis = analyzer.analyze(&Symbol::new("SPY")?, Period::OneYear)?;
//! println!("{}", analysis.recommendation);
//! # Ok::<(), quantedge_signal::Error>(())
//! ```

mod analyzer;
mod config;
mod csv_provider;
mod decision;
mod error;
mod history;
mod indicator;
mod key_levels;
mod ohlcv;
mod period;
mod pipeline;
mod price_source;
mod price_window;
mod provider;
mod sma;
mod symbol;
mod volatility;

pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price, Timestamp};
pub use crate::price_source::PriceSource;

pub use crate::key_levels::{KeyLevels, KeyLevelsConfig, KeyLevelsConfigBuilder, KeyLevelsValue};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use crate::volatility::{Volatility, VolatilityConfig, VolatilityConfigBuilder};

pub use crate::history::{PriceBar, PriceHistory};
pub use crate::period::Period;
pub use crate::symbol::Symbol;

pub use crate::pipeline::{
    Column, EnrichedBar, EnrichedHistory, IndicatorPipeline, IndicatorRow, PipelineConfig,
    PipelineConfigBuilder,
};

pub use crate::decision::{
    Action, DecisionConfig, DecisionConfigBuilder, DecisionRule, HoldReason, RISK_REWARD_RATIO,
    Recommendation, TradePlan,
};

pub use crate::csv_provider::{CsvHistoryProvider, CsvSymbolDirectory};
pub use crate::provider::{
    CachedHistoryProvider, HistoryProvider, HistoryRequest, InMemoryProvider, SymbolDirectory,
};

pub use crate::analyzer::{Analysis, Analyzer};
pub use crate::config::SignalConfig;

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, kline: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, kline)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Volatility, VolatilityConfig, f64);
impl_indicator_methods!(KeyLevels, KeyLevelsConfig, KeyLevelsValue);

#[cfg(test)]
mod test_util;
