//! Property tests for the primal/dual formulation
//!
//! Tests:
//! - Solution shapes follow the input shapes
//! - Optimal quantities, prices and totals are non-negative
//! - Strong duality on feasible, bounded instances
//! - Sign conversion round trip

use armory_core::formulate::{negate, negate_rows};
use armory_core::{compare, solve_dual_parts, solve_primal_parts, DUALITY_TOLERANCE};
use proptest::prelude::*;

type Instance = (Vec<f64>, Vec<Vec<f64>>, Vec<f64>);

/// Positive costs and compositions with each requirement at 60% of its row sum,
/// so every instance is feasible and bounded.
fn feasible_instance() -> impl Strategy<Value = Instance> {
    (1usize..=5, 1usize..=4)
        .prop_flat_map(|(lots, weapons)| {
            (
                prop::collection::vec(5u32..20, lots),
                prop::collection::vec(prop::collection::vec(20u32..100, lots), weapons),
            )
        })
        .prop_map(|(costs, rows)| {
            let requirements: Vec<f64> = rows
                .iter()
                .map(|row| (row.iter().sum::<u32>() as f64 * 0.6).floor())
                .collect();
            let costs: Vec<f64> = costs.into_iter().map(f64::from).collect();
            let constraints: Vec<Vec<f64>> = rows
                .into_iter()
                .map(|row| row.into_iter().map(f64::from).collect())
                .collect();
            (costs, constraints, requirements)
        })
}

proptest! {
    /// Lot quantities follow the cost vector and prices follow the requirements
    #[test]
    fn solution_shapes((costs, constraints, requirements) in feasible_instance()) {
        let primal = solve_primal_parts(&costs, &constraints, &requirements).unwrap();
        let dual = solve_dual_parts(&costs, &constraints, &requirements).unwrap();

        prop_assert!(primal.is_some());
        prop_assert!(dual.is_some());
        prop_assert_eq!(primal.unwrap().lots.len(), costs.len());
        prop_assert_eq!(dual.unwrap().prices.len(), requirements.len());
    }

    /// Nothing in an optimal solution is negative
    #[test]
    fn solutions_non_negative((costs, constraints, requirements) in feasible_instance()) {
        let primal = solve_primal_parts(&costs, &constraints, &requirements).unwrap().unwrap();
        let dual = solve_dual_parts(&costs, &constraints, &requirements).unwrap().unwrap();

        prop_assert!(primal.lots.iter().all(|&q| q >= 0.0), "{:?}", primal.lots);
        prop_assert!(dual.prices.iter().all(|&p| p >= 0.0), "{:?}", dual.prices);
        prop_assert!(primal.total_cost >= 0.0);
        prop_assert!(dual.total_profit >= 0.0);
    }

    /// Minimal cost equals maximal profit
    #[test]
    fn strong_duality((costs, constraints, requirements) in feasible_instance()) {
        let primal = solve_primal_parts(&costs, &constraints, &requirements).unwrap().unwrap();
        let dual = solve_dual_parts(&costs, &constraints, &requirements).unwrap().unwrap();

        prop_assert!(
            (primal.total_cost - dual.total_profit).abs() < 1e-4,
            "cost {} profit {}",
            primal.total_cost,
            dual.total_profit
        );
        prop_assert!(compare(&primal, &dual, DUALITY_TOLERANCE).holds);
    }

    /// The primal plan meets every requirement
    #[test]
    fn primal_plan_feasible((costs, constraints, requirements) in feasible_instance()) {
        let primal = solve_primal_parts(&costs, &constraints, &requirements).unwrap().unwrap();

        for (row, requirement) in constraints.iter().zip(&requirements) {
            let supplied: f64 = row.iter().zip(&primal.lots).map(|(a, x)| a * x).sum();
            prop_assert!(supplied >= requirement - 1e-6, "{} < {}", supplied, requirement);
        }
    }

    /// Negating twice gives back the exact input
    #[test]
    fn sign_conversion_round_trip(
        matrix in prop::collection::vec(prop::collection::vec(-1e6f64..1e6, 0..6), 0..6),
        vector in prop::collection::vec(-1e6f64..1e6, 0..6)
    ) {
        prop_assert_eq!(negate_rows(&negate_rows(&matrix)), matrix);
        prop_assert_eq!(negate(&negate(&vector)), vector);
    }
}
