mod fixtures;

use fixtures::{assert_near, load_key_levels_ref};
use quantedge_signal::{KeyLevels, KeyLevelsConfig, KeyLevelsValue};
use std::num::NonZero;

use crate::fixtures::{load_reference_bars, repaint_sequence};

const REF_PATH: &str = "tests/fixtures/data/key-levels-30.csv";

/// Support and resistance are exact picks from the input; only the CSV
/// round trip of the price can differ.
const TOLERANCE: f64 = 1e-9;

fn assert_levels_match(
    bar_idx: usize,
    closed: Option<KeyLevelsValue>,
    repainted: Option<KeyLevelsValue>,
) {
    match (closed, repainted) {
        (None, None) => {}
        (Some(c), Some(r)) => {
            for (level, cv, rv) in [
                ("support", c.support(), r.support()),
                ("resistance", c.resistance(), r.resistance()),
            ] {
                let diff = (cv - rv).abs();
                assert!(
                    diff <= TOLERANCE,
                    "{level} diverged at bar {bar_idx}: closed={cv:.10}, repainted={rv:.10}, diff={diff:.2e}"
                );
            }
        }
        (c, r) => {
            panic!("warm-up mismatch at bar {bar_idx}: closed={c:?}, repainted={r:?}");
        }
    }
}

#[test]
fn key_levels_30_match_reference() {
    let bars = load_reference_bars();
    let reference = load_key_levels_ref(REF_PATH);

    let mut levels = KeyLevels::new(KeyLevelsConfig::new(NonZero::new(30).unwrap()));

    let mut ref_idx = 0;
    for bar in &bars {
        levels.compute(bar);

        if ref_idx < reference.len() && bar.date == reference[ref_idx].date {
            let value = levels
                .value()
                .unwrap_or_else(|| panic!("key levels returned None at {}", bar.date));
            let expected = &reference[ref_idx];
            let context = format!("KL(30) at row {ref_idx} ({})", bar.date);
            assert_near(value.support(), expected.support, TOLERANCE, &context);
            assert_near(value.resistance(), expected.resistance, TOLERANCE, &context);
            ref_idx += 1;
        } else {
            assert!(levels.value().is_none(), "defined early at {}", bar.date);
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
fn support_never_above_resistance() {
    let bars = load_reference_bars();
    let mut levels = KeyLevels::new(KeyLevelsConfig::new(NonZero::new(30).unwrap()));

    for bar in &bars {
        if let Some(value) = levels.compute(bar) {
            assert!(value.support() <= value.resistance(), "inverted at {}", bar.date);
            assert!(value.range() >= 0.0);
        }
    }
}

#[test]
fn key_levels_30_repaint_matches_closed() {
    let bars = load_reference_bars();

    let config = KeyLevelsConfig::new(NonZero::new(30).unwrap());
    let mut closed = KeyLevels::new(config);
    let mut repainted = KeyLevels::new(config);

    for (i, bar) in bars.iter().enumerate() {
        closed.compute(bar);

        for tick in repaint_sequence(bar) {
            repainted.compute(&tick);
        }

        assert_levels_match(i, closed.value(), repainted.value());
    }
}
