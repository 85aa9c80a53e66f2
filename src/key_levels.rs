use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    price_window::PriceWindow,
};

/// Configuration for the [`KeyLevels`] indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct KeyLevelsConfig {
    length: usize,
}

impl IndicatorConfig for KeyLevelsConfig {
    type Builder = KeyLevelsConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        KeyLevelsConfigBuilder { length: None }
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl KeyLevelsConfig {
    /// Support and resistance over the last `length` bars.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for KeyLevelsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyLevelsConfig({})", self.length)
    }
}

/// Builder for [`KeyLevelsConfig`].
pub struct KeyLevelsConfigBuilder {
    length: Option<usize>,
}

impl IndicatorConfigBuilder<KeyLevelsConfig> for KeyLevelsConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> KeyLevelsConfig {
        KeyLevelsConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// Key price levels: rolling support and resistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyLevelsValue {
    support: Price,
    resistance: Price,
}

impl KeyLevelsValue {
    /// Lowest low of the window.
    #[inline]
    #[must_use]
    pub fn support(&self) -> Price {
        self.support
    }

    /// Highest high of the window.
    #[inline]
    #[must_use]
    pub fn resistance(&self) -> Price {
        self.resistance
    }

    /// Trading range: `resistance − support`.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Price {
        self.resistance - self.support
    }
}

impl Display for KeyLevelsValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KL(s: {}, r: {})", self.support, self.resistance)
    }
}

/// Rolling support and resistance levels.
///
/// Support is the minimum low and resistance the maximum high over the last
/// *n* bars. Both appear once the window holds *n* bars.
///
/// # Example
///
/// ```
/// use quantedge_signal::{KeyLevels, KeyLevelsConfig};
/// use std::num::NonZero;
/// # use quantedge_signal::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.1 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.1 }
/// #     fn open_time(&self) -> Timestamp { self.2 }
/// # }
///
/// let mut levels = KeyLevels::new(KeyLevelsConfig::new(NonZero::new(2).unwrap()));
///
/// assert!(levels.compute(&Bar(9.0, 11.0, 1)).is_none());
/// let value = levels.compute(&Bar(10.0, 14.0, 2)).unwrap();
/// assert_eq!(value.support(), 9.0);
/// assert_eq!(value.resistance(), 14.0);
/// ```
#[derive(Clone, Debug)]
pub struct KeyLevels {
    config: KeyLevelsConfig,
    highs: PriceWindow,
    lows: PriceWindow,
    current: Option<KeyLevelsValue>,
}

impl Indicator for KeyLevels {
    type Config = KeyLevelsConfig;
    type Output = KeyLevelsValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            highs: PriceWindow::new(config.length, PriceSource::High),
            lows: PriceWindow::new(config.length, PriceSource::Low),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<KeyLevelsValue> {
        self.highs.add(ohlcv);
        self.lows.add(ohlcv);

        self.current = match (self.lows.min(), self.highs.max()) {
            (Some(support), Some(resistance)) => Some(KeyLevelsValue {
                support,
                resistance,
            }),
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<KeyLevelsValue> {
        self.current
    }
}

impl Display for KeyLevels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KL({})", self.config.length)
    }
}
