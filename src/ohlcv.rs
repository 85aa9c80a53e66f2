/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// For daily bars this is the number of days since
/// [`NaiveDate::MIN`](chrono::NaiveDate::MIN), see
/// [`PriceBar`](crate::PriceBar). Must be non-decreasing between consecutive
/// calls to [`Indicator::compute`](crate::Indicator::compute).
pub type Timestamp = u64;

/// OHLCV bar data used as input to all indicators.
///
/// [`PriceBar`](crate::PriceBar) implements it for daily history; implement it
/// on your own candle type to stream bars into an indicator or an
/// [`IndicatorPipeline`](crate::IndicatorPipeline) without conversion.
///
/// # Bar boundaries
///
/// Indicators detect new bars by comparing [`open_time`](Ohlcv::open_time)
/// values: the same timestamp repaints the current bar (an intraday update of
/// the latest session), a new timestamp advances the window.
///
/// # Example
///
/// ```
/// use quantedge_signal::{Ohlcv, Price, Timestamp};
///
/// struct Session {
///     o: f64, h: f64, l: f64, c: f64,
///     day: u64,
/// }
///
/// impl Ohlcv for Session {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.day }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    ///
    /// Values must be non-decreasing between calls. Behaviour is undefined if
    /// `open_time` decreases.
    fn open_time(&self) -> Timestamp;

    /// Traded volume. Defaults to `0.0`; none of the indicators read it.
    fn volume(&self) -> f64 {
        0.0
    }
}
