use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Value extracted from an [`Ohlcv`] bar before it enters an indicator window.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// Simple daily return: `close / prev_close - 1`.
    ///
    /// Undefined on the first bar, which has no previous close.
    Return,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Option<Price> {
        match self {
            Self::Open => Some(ohlcv.open()),
            Self::High => Some(ohlcv.high()),
            Self::Low => Some(ohlcv.low()),
            Self::Close => Some(ohlcv.close()),
            Self::Return => prev_close.map(|prev| ohlcv.close() / prev - 1.0),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, assert_approx};

    fn bar() -> Bar {
        Bar::new(10.0, 30.0, 5.0, 20.0)
    }

    #[test]
    fn extract_open() {
        assert_eq!(PriceSource::Open.extract(&bar(), None), Some(10.0));
    }

    #[test]
    fn extract_high() {
        assert_eq!(PriceSource::High.extract(&bar(), None), Some(30.0));
    }

    #[test]
    fn extract_low() {
        assert_eq!(PriceSource::Low.extract(&bar(), None), Some(5.0));
    }

    #[test]
    fn extract_close() {
        assert_eq!(PriceSource::Close.extract(&bar(), None), Some(20.0));
    }

    #[test]
    fn price_sources_ignore_prev_close() {
        assert_eq!(PriceSource::Close.extract(&bar(), Some(99.0)), Some(20.0));
    }

    mod daily_return {
        use super::*;

        #[test]
        fn undefined_without_prev_close() {
            assert_eq!(PriceSource::Return.extract(&bar(), None), None);
        }

        #[test]
        fn gain_over_prev_close() {
            // 20 / 16 - 1 = 0.25
            assert_eq!(PriceSource::Return.extract(&bar(), Some(16.0)), Some(0.25));
        }

        #[test]
        fn loss_over_prev_close() {
            // 20 / 25 - 1 = -0.2
            let result = PriceSource::Return.extract(&bar(), Some(25.0)).unwrap();
            assert_approx!(result, -0.2);
        }

        #[test]
        fn flat_close_is_zero() {
            assert_eq!(PriceSource::Return.extract(&bar(), Some(20.0)), Some(0.0));
        }
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(PriceSource::Return.to_string(), "Return");
    }
}
