use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{EnrichedBar, EnrichedHistory, Price};

/// Reward-to-risk ratio quoted with every BUY.
///
/// A fixed literal, not derived from the take-profit and stop-loss distances.
pub const RISK_REWARD_RATIO: u32 = 2;

/// Thresholds of the [`DecisionRule`].
///
/// Defaults: at least 200 bars of history, volatility below 0.02, take-profit
/// and stop-loss 2 % away from the entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    min_history: usize,
    max_volatility: f64,
    take_profit: f64,
    stop_loss: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            min_history: 200,
            max_volatility: 0.02,
            take_profit: 0.02,
            stop_loss: 0.02,
        }
    }
}

impl DecisionConfig {
    #[must_use]
    pub fn builder() -> DecisionConfigBuilder {
        DecisionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Bars required before any BUY is considered.
    #[must_use]
    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Volatility must stay strictly below this value for a BUY.
    #[must_use]
    pub fn max_volatility(&self) -> f64 {
        self.max_volatility
    }

    /// Take-profit distance as a fraction of the entry price.
    #[must_use]
    pub fn take_profit(&self) -> f64 {
        self.take_profit
    }

    /// Stop-loss distance as a fraction of the entry price.
    #[must_use]
    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    /// Checks that thresholds are finite and fractions lie in `(0, 1)`.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.max_volatility.is_finite() && self.max_volatility > 0.0) {
            return Err(format!(
                "max_volatility must be positive, got {}",
                self.max_volatility
            ));
        }

        for (name, value) in [("take_profit", self.take_profit), ("stop_loss", self.stop_loss)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(format!("{name} must be between 0 and 1, got {value}"));
            }
        }

        Ok(())
    }
}

/// Builder for [`DecisionConfig`], starting from the defaults.
pub struct DecisionConfigBuilder {
    config: DecisionConfig,
}

impl DecisionConfigBuilder {
    #[must_use]
    pub fn min_history(mut self, bars: usize) -> Self {
        self.config.min_history = bars;
        self
    }

    #[must_use]
    pub fn max_volatility(mut self, max_volatility: f64) -> Self {
        self.config.max_volatility = max_volatility;
        self
    }

    #[must_use]
    pub fn take_profit(mut self, fraction: f64) -> Self {
        self.config.take_profit = fraction;
        self
    }

    #[must_use]
    pub fn stop_loss(mut self, fraction: f64) -> Self {
        self.config.stop_loss = fraction;
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    ///
    /// Panics if a threshold is out of range.
    #[must_use]
    pub fn build(self) -> DecisionConfig {
        if let Err(reason) = self.config.validate() {
            panic!("{reason}");
        }
        self.config
    }
}

/// Action of a [`Recommendation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Hold,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
        })
    }
}

/// Why a [`Recommendation`] is HOLD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldReason {
    /// Fewer bars than the rule requires.
    InsufficientHistory,
    /// A required indicator is undefined on the latest row.
    MissingIndicators,
    /// Indicators are available but the BUY conditions do not all hold.
    ConditionsNotMet,
}

impl Display for HoldReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InsufficientHistory => "insufficient history",
            Self::MissingIndicators => "missing indicators",
            Self::ConditionsNotMet => "conditions not met",
        })
    }
}

/// Entry, exits and reward/risk of a BUY.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TradePlan {
    entry_price: Price,
    take_profit: Price,
    stop_loss: Price,
    risk_reward_ratio: u32,
}

impl TradePlan {
    #[inline]
    #[must_use]
    pub fn entry_price(&self) -> Price {
        self.entry_price
    }

    #[inline]
    #[must_use]
    pub fn take_profit(&self) -> Price {
        self.take_profit
    }

    #[inline]
    #[must_use]
    pub fn stop_loss(&self) -> Price {
        self.stop_loss
    }

    /// Always [`RISK_REWARD_RATIO`].
    #[inline]
    #[must_use]
    pub fn risk_reward_ratio(&self) -> u32 {
        self.risk_reward_ratio
    }
}

/// Outcome of the [`DecisionRule`].
///
/// The trade fields are only present on [`Recommendation::Buy`]; the
/// accessors return `None` for a HOLD.
///
/// Displays as the message shown to the user:
///
/// ```text
/// BUY at $105.00 | TP: $107.10 | SL: $102.90 | RR: 2:1
/// Not worth it. HOLD.
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy(TradePlan),
    Hold { reason: HoldReason },
}

impl Recommendation {
    #[must_use]
    pub fn hold(reason: HoldReason) -> Self {
        Self::Hold { reason }
    }

    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::Buy(_) => Action::Buy,
            Self::Hold { .. } => Action::Hold,
        }
    }

    #[must_use]
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::Buy(_))
    }

    #[must_use]
    pub fn trade_plan(&self) -> Option<&TradePlan> {
        match self {
            Self::Buy(plan) => Some(plan),
            Self::Hold { .. } => None,
        }
    }

    #[must_use]
    pub fn hold_reason(&self) -> Option<HoldReason> {
        match self {
            Self::Buy(_) => None,
            Self::Hold { reason } => Some(*reason),
        }
    }

    #[must_use]
    pub fn entry_price(&self) -> Option<Price> {
        self.trade_plan().map(TradePlan::entry_price)
    }

    #[must_use]
    pub fn take_profit(&self) -> Option<Price> {
        self.trade_plan().map(TradePlan::take_profit)
    }

    #[must_use]
    pub fn stop_loss(&self) -> Option<Price> {
        self.trade_plan().map(TradePlan::stop_loss)
    }

    #[must_use]
    pub fn risk_reward_ratio(&self) -> Option<u32> {
        self.trade_plan().map(TradePlan::risk_reward_ratio)
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy(plan) => write!(
                f,
                "BUY at ${:.2} | TP: ${:.2} | SL: ${:.2} | RR: {}:1",
                plan.entry_price, plan.take_profit, plan.stop_loss, plan.risk_reward_ratio
            ),
            Self::Hold { .. } => f.write_str("Not worth it. HOLD."),
        }
    }
}

/// Threshold rule turning the latest enriched row into a [`Recommendation`].
///
/// BUY when the fast SMA is above the slow SMA, volatility is below
/// [`max_volatility`](DecisionConfig::max_volatility) and the close is above
/// support. Anything else, including too short a history or an undefined
/// indicator, is HOLD.
///
/// # Example
///
/// ```
/// use quantedge_signal::{DecisionRule, HoldReason, Recommendation};
/// # use quantedge_signal::{EnrichedBar, IndicatorRow, PriceBar};
/// # use chrono::NaiveDate;
/// # let row = EnrichedBar {
/// #     bar: PriceBar {
/// #         date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
/// #         open: 104.0, high: 106.0, low: 103.0, close: 105.0, volume: 1,
/// #     },
/// #     indicators: IndicatorRow {
/// #         sma_fast: Some(110.0), sma_slow: Some(100.0), daily_return: Some(0.0),
/// #         volatility: Some(0.01), resistance: Some(120.0), support: Some(100.0),
/// #     },
/// # };
///
/// let rule = DecisionRule::default();
///
/// let buy = rule.decide(250, &row);
/// assert_eq!(buy.to_string(), "BUY at $105.00 | TP: $107.10 | SL: $102.90 | RR: 2:1");
///
/// let hold = rule.decide(199, &row);
/// assert_eq!(hold, Recommendation::hold(HoldReason::InsufficientHistory));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecisionRule {
    config: DecisionConfig,
}

impl DecisionRule {
    #[must_use]
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Evaluates the latest row of `history`.
    #[must_use]
    pub fn evaluate(&self, history: &EnrichedHistory) -> Recommendation {
        match history.latest() {
            Some(latest) => self.decide(history.len(), latest),
            None => Recommendation::hold(HoldReason::InsufficientHistory),
        }
    }

    /// Evaluates `latest`, the final row of a history of `bar_count` bars.
    #[must_use]
    pub fn decide(&self, bar_count: usize, latest: &EnrichedBar) -> Recommendation {
        if bar_count < self.config.min_history {
            return Recommendation::hold(HoldReason::InsufficientHistory);
        }

        let ind = &latest.indicators;
        let close = latest.close();

        let (Some(sma_fast), Some(sma_slow), Some(volatility), Some(support)) =
            (ind.sma_fast, ind.sma_slow, ind.volatility, ind.support)
        else {
            return Recommendation::hold(HoldReason::MissingIndicators);
        };

        if [sma_fast, sma_slow, volatility, close, support]
            .iter()
            .any(|v| v.is_nan())
        {
            return Recommendation::hold(HoldReason::MissingIndicators);
        }

        if sma_fast > sma_slow && volatility < self.config.max_volatility && close > support {
            Recommendation::Buy(TradePlan {
                entry_price: close,
                take_profit: close * (1.0 + self.config.take_profit),
                stop_loss: close * (1.0 - self.config.stop_loss),
                risk_reward_ratio: RISK_REWARD_RATIO,
            })
        } else {
            Recommendation::hold(HoldReason::ConditionsNotMet)
        }
    }
}
