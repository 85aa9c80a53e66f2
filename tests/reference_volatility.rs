mod fixtures;

use fixtures::{assert_near, load_ref_values};
use quantedge_signal::{Volatility, VolatilityConfig};
use std::num::NonZero;

use crate::fixtures::{
    assert_values_match, load_reference_bars, reference_test, repaint_sequence,
};

const REF_PATH: &str = "tests/fixtures/data/volatility-30.csv";

/// Tolerance: 1e-9 on a daily standard deviation around 0.01.
/// Sum-of-squares variance loses a few digits to cancellation, still far
/// inside the 0.02 decision threshold.
const TOLERANCE: f64 = 1e-9;

#[test]
fn volatility_30_matches_reference() {
    let bars = load_reference_bars();
    let reference = load_ref_values(REF_PATH);

    let mut vol = Volatility::new(VolatilityConfig::new(NonZero::new(30).unwrap()));

    let mut ref_idx = 0;
    for bar in &bars {
        vol.compute(bar);

        if ref_idx < reference.len() && bar.date == reference[ref_idx].date {
            let value = vol
                .value()
                .unwrap_or_else(|| panic!("volatility returned None at {}", bar.date));
            assert_near(
                value,
                reference[ref_idx].expected,
                TOLERANCE,
                &format!("VOL(30) at row {ref_idx} ({})", bar.date),
            );
            ref_idx += 1;
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
fn daily_return_tracks_close_to_close_change() {
    let bars = load_reference_bars();
    let mut vol = Volatility::new(VolatilityConfig::new(NonZero::new(30).unwrap()));

    vol.compute(&bars[0]);
    assert_eq!(vol.daily_return(), None);

    for pair in bars.windows(2) {
        vol.compute(&pair[1]);
        let expected = pair[1].close / pair[0].close - 1.0;
        assert_near(
            vol.daily_return().unwrap(),
            expected,
            1e-15,
            &format!("daily return at {}", pair[1].date),
        );
    }
}

#[test]
fn volatility_30_repaint_matches_closed() {
    let bars = load_reference_bars();

    let config = VolatilityConfig::new(NonZero::new(30).unwrap());
    let mut closed = Volatility::new(config);
    let mut repainted = Volatility::new(config);

    for (i, bar) in bars.iter().enumerate() {
        closed.compute(bar);

        for tick in repaint_sequence(bar) {
            repainted.compute(&tick);
        }

        assert_values_match(i, closed.value(), repainted.value(), TOLERANCE);
        assert_values_match(i, closed.daily_return(), repainted.daily_return(), 1e-15);
    }
}

reference_test!(
    volatility_30_macro,
    Volatility,
    VolatilityConfig::new(nz(30)),
    "tests/fixtures/data/volatility-30.csv",
    1e-9
);
