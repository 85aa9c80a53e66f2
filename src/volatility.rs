use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, PriceSource,
    price_window::{PriceWindow, PriceWindowWithSumOfSquares},
};

/// Configuration for the rolling [`Volatility`] indicator.
///
/// # Example
///
/// ```
/// use quantedge_signal::{IndicatorConfig, VolatilityConfig};
/// use std::num::NonZero;
///
/// let config = VolatilityConfig::new(NonZero::new(30).unwrap());
/// assert_eq!(config.length(), 30);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct VolatilityConfig {
    length: usize,
}

impl IndicatorConfig for VolatilityConfig {
    type Builder = VolatilityConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        VolatilityConfigBuilder { length: None }
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl VolatilityConfig {
    /// Volatility over `length` daily returns.
    ///
    /// # Panics
    ///
    /// Panics if `length` is 1: a sample standard deviation needs two values.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for VolatilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VolatilityConfig({})", self.length)
    }
}

/// Builder for [`VolatilityConfig`].
pub struct VolatilityConfigBuilder {
    length: Option<usize>,
}

impl IndicatorConfigBuilder<VolatilityConfig> for VolatilityConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    fn build(self) -> VolatilityConfig {
        let length = self.length.expect("length is required");
        assert!(length >= 2, "volatility length must be at least 2");
        VolatilityConfig { length }
    }
}

/// Rolling volatility of daily returns.
///
/// Sample standard deviation (`n - 1` denominator) of the last *n* simple
/// returns `close / prev_close - 1`. The first bar has no return, so a
/// 30-bar volatility is first defined on the 31st bar.
///
/// Keeps a running sum and sum of squares of returns for O(1) updates.
///
/// # Example
///
/// ```
/// use quantedge_signal::{Volatility, VolatilityConfig};
/// use std::num::NonZero;
/// # use quantedge_signal::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let mut vol = Volatility::new(VolatilityConfig::new(NonZero::new(2).unwrap()));
///
/// assert_eq!(vol.compute(&Bar(100.0, 1)), None);
/// assert_eq!(vol.compute(&Bar(110.0, 2)), None);
/// // returns +10% and -10%
/// let sd = vol.compute(&Bar(99.0, 3)).unwrap();
/// assert!((sd - 0.02_f64.sqrt()).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Volatility {
    config: VolatilityConfig,
    length_reciprocal: f64,
    dof_reciprocal: f64,
    window: PriceWindowWithSumOfSquares,
    current: Option<f64>,
}

impl Volatility {
    /// Daily return of the latest bar, `None` on the first bar.
    #[inline]
    #[must_use]
    pub fn daily_return(&self) -> Option<f64> {
        self.window.latest()
    }
}

impl Indicator for Volatility {
    type Config = VolatilityConfig;
    type Output = f64;

    fn new(config: Self::Config) -> Self {
        let window = PriceWindow::with_sum_of_squares(config.length, PriceSource::Return);

        #[allow(clippy::cast_precision_loss)]
        let length = config.length as f64;

        Self {
            config,
            length_reciprocal: 1.0 / length,
            dof_reciprocal: 1.0 / (length - 1.0),
            window,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<f64> {
        self.window.add(ohlcv);

        self.current = match (self.window.sum(), self.window.sum_of_squares()) {
            (Some(sum), Some(sum_of_squares)) => {
                let mean = sum * self.length_reciprocal;

                // Sample variance = (sum_of_squares - sum * mean) / (n - 1)
                let variance = sum.mul_add(-mean, sum_of_squares) * self.dof_reciprocal;

                Some(variance.max(0.0).sqrt())
            }
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<f64> {
        self.current
    }
}

impl Display for Volatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VOL({})", self.config.length)
    }
}
