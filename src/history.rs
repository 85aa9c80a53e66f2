use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Ohlcv, Period, Price, Result, Symbol, Timestamp};

/// One trading session of a symbol.
///
/// Field names (de)serialize to the `Date,Open,High,Low,Close,Volume` header
/// layout of daily history exports; extra columns such as `Adj Close` are
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: u64,
}

impl PriceBar {
    fn validate(&self) -> Result<()> {
        let prices = [
            (self.open, "open must be a positive finite price"),
            (self.high, "high must be a positive finite price"),
            (self.low, "low must be a positive finite price"),
            (self.close, "close must be a positive finite price"),
        ];

        for (price, reason) in prices {
            if !(price.is_finite() && price > 0.0) {
                return Err(Error::InvalidBar {
                    date: self.date,
                    reason,
                });
            }
        }

        if self.low > self.high {
            return Err(Error::InvalidBar {
                date: self.date,
                reason: "low is above high",
            });
        }

        Ok(())
    }
}

impl Ohlcv for PriceBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    /// Days since [`NaiveDate::MIN`], so consecutive sessions advance the
    /// indicator windows.
    fn open_time(&self) -> Timestamp {
        self.date
            .signed_duration_since(NaiveDate::MIN)
            .num_days()
            .unsigned_abs()
    }

    #[allow(clippy::cast_precision_loss)]
    fn volume(&self) -> f64 {
        self.volume as f64
    }
}

/// Daily bars of one symbol over a lookback period.
///
/// Never empty, dates strictly ascending, every price positive and finite.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceHistory {
    symbol: Symbol,
    period: Period,
    bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// Validates provider output into a history.
    ///
    /// # Errors
    ///
    /// - [`Error::NoData`] when `bars` is empty.
    /// - [`Error::UnorderedBars`] when a date does not follow its predecessor.
    /// - [`Error::InvalidBar`] when a price is non-positive or not finite, or
    ///   the low is above the high.
    pub fn new(symbol: Symbol, period: Period, bars: Vec<PriceBar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::NoData { symbol });
        }

        for bar in &bars {
            bar.validate()?;
        }

        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(Error::UnorderedBars {
                previous: pair[0].date,
                date: pair[1].date,
            });
        }

        Ok(Self {
            symbol,
            period,
            bars,
        })
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns `false`; a `PriceHistory` always holds at least one bar.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent session.
    #[must_use]
    pub fn latest(&self) -> &PriceBar {
        self.bars
            .last()
            .expect("PriceHistory invariant violation: history is never empty")
    }

    #[must_use]
    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}
