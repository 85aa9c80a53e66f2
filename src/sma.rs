use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    price_window::PriceWindow,
};

/// Window length and price source of a simple moving average.
///
/// The trend filter runs two of these over daily closes: a 50-session fast
/// average and a 200-session slow one.
///
/// ```rust
/// use quantedge_signal::{IndicatorConfig, PriceSource, SmaConfig};
/// use std::num::NonZero;
///
/// let slow = SmaConfig::close(NonZero::new(200).unwrap());
/// assert_eq!(slow.length(), 200);
/// assert_eq!(slow.source(), PriceSource::Close);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    sessions: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.sessions
    }
}

impl SmaConfig {
    /// Average of the last `sessions` closes.
    #[must_use]
    pub fn close(sessions: NonZero<usize>) -> Self {
        Self::builder().length(sessions).build()
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.sessions, self.source)
    }
}

/// Builder for [`SmaConfig`]. Averages closes unless another
/// [`source`](Self::source) is set; the window length has no default.
pub struct SmaConfigBuilder {
    sessions: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            sessions: None,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn length(mut self, sessions: NonZero<usize>) -> Self {
        self.sessions = Some(sessions.get());
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            sessions: self.sessions.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple moving average over the trailing sessions of a daily series.
///
/// Each session carries the same weight. The average is undefined until the
/// window holds a full set of sessions, so `SMA_50` first appears on the 50th
/// session and `SMA_200` on the 200th. Feeding a bar dated like the latest
/// one replaces that session instead of opening a new one.
///
/// ```rust
/// use chrono::{Days, NaiveDate};
/// use quantedge_signal::{PriceBar, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let first = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let session = |day: u64, close: f64| PriceBar {
///     date: first + Days::new(day),
///     open: close,
///     high: close,
///     low: close,
///     close,
///     volume: 1_000,
/// };
///
/// let mut sma_50 = Sma::new(SmaConfig::close(NonZero::new(50).unwrap()));
/// for day in 0..49 {
///     assert_eq!(sma_50.compute(&session(day, 500.0)), None);
/// }
///
/// let mean = sma_50.compute(&session(49, 550.0)).unwrap();
/// assert!((mean - 501.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    window: PriceWindow,
    session_weight: f64,
    mean: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: PriceWindow::new(config.sessions, config.source),
            #[allow(clippy::cast_precision_loss)]
            session_weight: 1.0 / config.sessions as f64,
            mean: None,
        }
    }

    #[inline]
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<Price> {
        self.window.add(kline);
        self.mean = self.window.sum().map(|sum| sum * self.session_weight);
        self.mean
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.mean
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.sessions, self.config.source)
    }
}
