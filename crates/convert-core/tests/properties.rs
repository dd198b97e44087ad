//! Property tests for the unit conversion engine

use convert_core::{categories, convert, Category};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

/// Every ordered pair of units in every category
fn unit_pairs() -> Vec<(Category, &'static str, &'static str)> {
    categories()
        .flat_map(|c| {
            c.units
                .iter()
                .flat_map(move |a| c.units.iter().map(move |b| (c.category, a.id, b.id)))
        })
        .collect()
}

#[test]
fn round_trip_representative_values() {
    for (category, from, to) in unit_pairs() {
        for x in [1.0, 100.0, 0.001, -40.0] {
            let there = convert(category, x, from, to).unwrap();
            let back = convert(category, there, to, from).unwrap();
            assert!(
                close(back, x),
                "{} {} -> {} -> {}: got {}",
                x,
                from,
                to,
                from,
                back
            );
        }
    }
}

#[test]
fn pair_count() {
    // 8² + 6² + 3² + 8² + 7² + 5²
    assert_eq!(unit_pairs().len(), 247);
}

proptest! {
    /// Property: converting there and back returns the input within 1e-6
    #[test]
    fn round_trip_any_value(
        pair in prop::sample::select(unit_pairs()),
        x in -1.0e6f64..1.0e6,
    ) {
        let (category, from, to) = pair;
        let there = convert(category, x, from, to).unwrap();
        let back = convert(category, there, to, from).unwrap();
        prop_assert!(close(back, x), "{} {} -> {}: back {}", x, from, to, back);
    }

    /// Property: a base unit converts to itself exactly
    #[test]
    fn base_identity(category in prop::sample::select(Category::ALL.to_vec()), x in any::<f64>()) {
        prop_assume!(x.is_finite());
        let base = category.definition().base_unit;
        prop_assert_eq!(convert(category, x, base, base).unwrap(), x);
    }

    /// Property: results never carry more than 8 significant digits
    #[test]
    fn results_are_rounded(pair in prop::sample::select(unit_pairs()), x in -1.0e6f64..1.0e6) {
        let (category, from, to) = pair;
        let result = convert(category, x, from, to).unwrap();
        if from != to {
            prop_assert_eq!(convert_core::round_significant(result, 8), result);
        }
    }
}
