//! Property tests for the cost curve

use proptest::prelude::*;
use zkbisect_cost::{evaluate, CostConstants, MAX_DEPTH};

fn constants() -> impl Strategy<Value = CostConstants> {
    (0.0f64..10.0, 0.0f64..10.0, 0.0f64..10.0, 0.0f64..0.1).prop_map(
        |(compressed_base_fee, compressed_pgu_price, plonk_fee, epsilon)| CostConstants {
            compressed_base_fee,
            compressed_pgu_price,
            plonk_fee,
            epsilon,
        },
    )
}

proptest! {
    /// Cost never increases with depth
    #[test]
    fn cost_is_non_increasing(
        total_pgu in 1.0f64..1e15,
        c in constants(),
        max_depth in 0u32..=MAX_DEPTH,
    ) {
        let curve = evaluate(total_pgu, &c, max_depth).unwrap();
        prop_assert_eq!(curve.points.len(), max_depth as usize + 1);
        for pair in curve.points.windows(2) {
            prop_assert!(pair[1].total_cost <= pair[0].total_cost);
            prop_assert!(pair[1].remaining_billion_pgu <= pair[0].remaining_billion_pgu);
        }
        for (d, p) in curve.points.iter().enumerate() {
            prop_assert_eq!(p.depth as usize, d);
            prop_assert_eq!(p.plonk_fee, c.plonk_fee);
            prop_assert_eq!(p.total_cost, p.compressed_fee + p.plonk_fee);
        }
    }

    /// Deep bisection approaches the fixed fees
    #[test]
    fn cost_converges_to_fixed_fees(total_pgu in 1.0f64..1e15, c in constants()) {
        let curve = evaluate(total_pgu, &c, MAX_DEPTH).unwrap();
        let last = curve.at(MAX_DEPTH).unwrap();
        prop_assert!(last.total_cost >= c.floor());
        // total_pgu / 1e9 / 2^64 * 10 < 1e-12
        prop_assert!(last.total_cost - c.floor() < 1e-9);
    }

    /// Selected depth obeys the diminishing-returns rule
    #[test]
    fn optimal_depth_is_first_small_step(
        total_pgu in 1.0f64..1e15,
        c in constants(),
        max_depth in 0u32..=40,
    ) {
        let curve = evaluate(total_pgu, &c, max_depth).unwrap();
        let d = curve.optimal_depth as usize;
        prop_assert!(d <= max_depth as usize);
        for step in 1..d {
            let gain = curve.points[step - 1].total_cost - curve.points[step].total_cost;
            prop_assert!(gain >= c.epsilon);
        }
        if d >= 1 && curve.optimal_depth < max_depth {
            let gain = curve.points[d - 1].total_cost - curve.points[d].total_cost;
            prop_assert!(gain < c.epsilon);
        }
    }

    /// Identical inputs give bit-identical curves
    #[test]
    fn evaluation_is_reproducible(total_pgu in 1.0f64..1e15, c in constants()) {
        let a = evaluate(total_pgu, &c, 20).unwrap();
        let b = evaluate(total_pgu, &c, 20).unwrap();
        for (x, y) in a.points.iter().zip(&b.points) {
            prop_assert_eq!(x.total_cost.to_bits(), y.total_cost.to_bits());
        }
        prop_assert_eq!(a.optimal_depth, b.optimal_depth);
    }
}
