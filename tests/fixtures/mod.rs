#![allow(dead_code)]

use chrono::NaiveDate;
use quantedge_signal::{Period, PriceBar, PriceHistory, Symbol};
use serde::{Deserialize, de::DeserializeOwned};

/// Reference value keyed by session date.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub date: NaiveDate,
    pub expected: f64,
}

/// Reference support/resistance keyed by session date.
#[derive(Debug, Deserialize)]
pub struct RefKeyLevels {
    pub date: NaiveDate,
    pub support: f64,
    pub resistance: f64,
}

pub const DATA_DIR: &str = "tests/fixtures/data";
const OHLCV_PATH: &str = "tests/fixtures/data/spy-1d.csv";

/// Last session in the reference history.
pub fn last_session() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
}

/// Load the reference daily bars.
pub fn load_reference_bars() -> Vec<PriceBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Reference bars wrapped in a history covering everything.
pub fn reference_history() -> PriceHistory {
    PriceHistory::new(
        Symbol::new("SPY").unwrap(),
        Period::Max,
        load_reference_bars(),
    )
    .expect("reference history is valid")
}

/// Load single-value reference data (SMA, volatility).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load support/resistance reference data.
pub fn load_key_levels_ref(path: &str) -> Vec<RefKeyLevels> {
    load_records(path, "invalid key levels reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Creates perturbed versions of a bar to simulate intraday updates of the
/// current session.
///
/// Returns 2 intermediate bars (with shifted close/high/low) followed
/// by the original bar. All share the same date.
pub fn repaint_sequence(bar: &PriceBar) -> Vec<PriceBar> {
    vec![
        // Opening print: close near open
        PriceBar {
            high: bar.open * 1.001,
            low: bar.open * 0.999,
            close: bar.open * 1.0005,
            volume: bar.volume / 3,
            ..*bar
        },
        // Midday: partial movement toward final values
        PriceBar {
            high: bar.open.midpoint(bar.high),
            low: bar.open.midpoint(bar.low),
            close: bar.open.midpoint(bar.close),
            volume: bar.volume / 2,
            ..*bar
        },
        // Close: real values
        *bar,
    ]
}

pub fn assert_values_match(
    bar_idx: usize,
    closed: Option<f64>,
    repainted: Option<f64>,
    tolerance: f64,
) {
    match (closed, repainted) {
        (None, None) => {} // both warming up, fine
        (Some(c), Some(r)) => {
            let diff = (c - r).abs();
            assert!(
                diff <= tolerance,
                "diverged at bar {bar_idx}: closed={c:.10}, repainted={r:.10}, diff={diff:.2e}"
            );
        }
        (c, r) => {
            panic!("warm-up mismatch at bar {bar_idx}: closed={c:?}, repainted={r:?}");
        }
    }
}

/// Generate reference match + repaint tests for a single-value indicator.
///
/// Usage: `reference_test!(sma_50, Sma, SmaConfig::close(nz(50)), "tests/fixtures/data/sma-50-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use quantedge_signal::*;
            use std::num::NonZero;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_bars();
                let reference = load_ref_values($ref_path);
                let config = $config;
                let mut ind = <$ind>::new(config);

                let mut ref_idx = 0;
                for bar in &bars {
                    ind.compute(bar);

                    if ref_idx < reference.len() && bar.date == reference[ref_idx].date {
                        let value = ind.value().unwrap_or_else(|| {
                            panic!("{} returned None at {}", stringify!($name), bar.date)
                        });
                        assert_near(
                            value,
                            reference[ref_idx].expected,
                            $tolerance,
                            &format!("{} at row {ref_idx} ({})", stringify!($name), bar.date),
                        );
                        ref_idx += 1;
                    } else {
                        assert_eq!(
                            ind.value(),
                            None,
                            "{} defined before reference starts at {}",
                            stringify!($name),
                            bar.date
                        );
                    }
                }

                assert_eq!(
                    ref_idx,
                    reference.len(),
                    "not all reference values checked: {ref_idx}/{}",
                    reference.len()
                );
            }

            #[test]
            fn repaint_matches_closed() {
                let bars = load_reference_bars();
                let config = $config;
                let mut closed = <$ind>::new(config);
                let mut repainted = <$ind>::new(config);

                for (i, bar) in bars.iter().enumerate() {
                    closed.compute(bar);
                    for tick in repaint_sequence(bar) {
                        repainted.compute(&tick);
                    }
                    assert_values_match(i, closed.value(), repainted.value(), $tolerance);
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
