use crate::{Ohlcv, Price, PriceSource, Timestamp};
use std::collections::VecDeque;

/// Fixed-length trailing window over values extracted from a bar stream.
///
/// Advances on a new `open_time` and repaints the newest value when the same
/// `open_time` is fed again. Bars whose source value is undefined (the first
/// bar of a [`PriceSource::Return`] window) occupy no slot.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow<const SUM_OF_SQUARES: bool = false> {
    size: usize,
    window: VecDeque<Price>,
    /// Running sum of values in the window. Maintained incrementally via
    /// add/subtract, may accumulate FP rounding drift over very long runs,
    /// but negligible for typical window sizes on daily data.
    sum: Price,
    sum_of_squares: f64,
    /// Close of the current bar. Becomes `prev_close` when the window
    /// advances, so repaints keep returning against the same previous close.
    cur_close: Option<Price>,
    prev_close: Option<Price>,
    /// Whether the current bar pushed a value that a repaint must replace.
    cur_counted: bool,
    source: PriceSource,
    last_open_time: Option<Timestamp>,
}

pub(crate) type PriceWindowWithSumOfSquares = PriceWindow<true>;

impl PriceWindow {
    pub fn new(size: usize, source: PriceSource) -> Self {
        Self::empty(size, source)
    }
}

impl PriceWindow<true> {
    pub fn with_sum_of_squares(size: usize, source: PriceSource) -> Self {
        Self::empty(size, source)
    }
}

impl<const SUM_OF_SQUARES: bool> PriceWindow<SUM_OF_SQUARES> {
    fn empty(size: usize, source: PriceSource) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            sum: 0.0,
            sum_of_squares: 0.0,
            cur_close: None,
            prev_close: None,
            cur_counted: false,
            source,
            last_open_time: None,
        }
    }

    #[inline]
    pub fn add(&mut self, ohlcv: &impl Ohlcv) {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t <= ohlcv.open_time()),
            "open_time must be non-decreasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let is_next_bar = self.last_open_time.is_none_or(|t| t < ohlcv.open_time());

        if is_next_bar {
            self.prev_close = self.cur_close;
            self.last_open_time = Some(ohlcv.open_time());
        } else if self.cur_counted {
            let old_price = self.window.pop_back().expect(
                "PriceWindow invariant violation: attempted to pop from empty window during update",
            );
            self.forget(old_price);
        }

        self.cur_close = Some(ohlcv.close());
        self.cur_counted = false;

        let Some(price) = self.source.extract(ohlcv, self.prev_close) else {
            return;
        };

        if self.is_ready() {
            let old_price = self.window.pop_front().expect(
                "PriceWindow invariant violation: window should be full when is_ready() is true",
            );
            self.forget(old_price);
        }

        self.window.push_back(price);
        self.sum += price;
        if SUM_OF_SQUARES {
            self.sum_of_squares += price * price;
        }
        self.cur_counted = true;
    }

    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready().then_some(self.sum)
    }

    #[inline]
    pub fn sum_of_squares(&self) -> Option<Price> {
        assert!(SUM_OF_SQUARES, "sum_of_squares requires PriceWindow<true>");
        self.is_ready().then_some(self.sum_of_squares)
    }

    /// Largest value in the full window.
    pub fn max(&self) -> Option<Price> {
        self.is_ready()
            .then(|| self.window.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Smallest value in the full window.
    pub fn min(&self) -> Option<Price> {
        self.is_ready()
            .then(|| self.window.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// Value contributed by the current bar, even before the window fills.
    #[inline]
    pub fn latest(&self) -> Option<Price> {
        if self.cur_counted {
            self.window.back().copied()
        } else {
            None
        }
    }

    #[inline]
    fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }

    #[inline]
    fn forget(&mut self, old_price: Price) {
        self.sum -= old_price;
        if SUM_OF_SQUARES {
            self.sum_of_squares -= old_price * old_price;
        }
    }
}
