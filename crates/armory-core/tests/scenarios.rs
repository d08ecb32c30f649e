use armory_core::{
    compare, sensitivity_sweep, solve_dual, solve_dual_parts, solve_primal, solve_primal_parts,
    weapon_breakdown, FormulationError, ProcurementData, DUALITY_TOLERANCE,
};

fn reference_parts() -> (Vec<f64>, Vec<Vec<f64>>, Vec<f64>) {
    let data = ProcurementData::reference();
    (data.costs, data.constraints, data.requirements)
}

#[test]
fn test_reference_primal_and_dual_agree() {
    let data = ProcurementData::reference();

    let primal = solve_primal(&data).unwrap().expect("primal should be feasible");
    let dual = solve_dual(&data).unwrap().expect("dual should be feasible");

    assert!((primal.total_cost - 1930.4348).abs() < 1e-3, "cost = {}", primal.total_cost);
    assert!((dual.total_profit - 1930.4348).abs() < 1e-3, "profit = {}", dual.total_profit);

    let check = compare(&primal, &dual, DUALITY_TOLERANCE);
    assert!(check.holds, "{:?}", check);

    // Profit per weapon uses price * requirement for every weapon type
    let lines = weapon_breakdown(&dual, &data);
    let total: f64 = lines.iter().map(|l| l.profit).sum();
    assert!((total - dual.total_profit).abs() < 1e-6);
}

#[test]
fn test_fixed_and_generalized_variants_agree() {
    let (costs, constraints, requirements) = reference_parts();
    let data = ProcurementData::reference();

    let fixed = solve_primal(&data).unwrap().unwrap();
    let general = solve_primal_parts(&costs, &constraints, &requirements).unwrap().unwrap();
    assert_eq!(fixed.lots, general.lots);
    assert_eq!(fixed.total_cost, general.total_cost);

    let fixed = solve_dual(&data).unwrap().unwrap();
    let general = solve_dual_parts(&costs, &constraints, &requirements).unwrap().unwrap();
    assert_eq!(fixed.prices, general.prices);
}

#[test]
fn test_sweep_over_first_lot() {
    let sweep = sensitivity_sweep(&ProcurementData::reference(), 1..=29).unwrap();

    assert_eq!(sweep.len(), 29);
    assert_eq!(sweep.price_points(), (1..=29).collect::<Vec<_>>());

    let costs = sweep.cost_trajectory();
    for pair in costs.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-9, "cost decreased: {:?}", pair);
    }

    // Once lot 1 is too expensive the plan settles on lots 2 and 3
    let last = sweep.points.last().unwrap();
    assert!((last.total_cost - 1930.4348).abs() < 1e-3);
    assert!(last.lots[0].abs() < 1e-9);

    for point in &sweep.points {
        assert!(point.primal_solved && point.dual_solved);
        assert!(
            (point.total_cost - point.total_profit).abs() < 1e-4,
            "price {}: cost {} profit {}",
            point.price,
            point.total_cost,
            point.total_profit
        );
    }
}

#[test]
fn test_mismatched_bundle_rejected_before_solving() {
    let (costs, mut constraints, requirements) = reference_parts();
    constraints.pop();

    let err = solve_primal_parts(&costs, &constraints, &requirements).unwrap_err();
    assert_eq!(
        err,
        FormulationError::DimensionMismatch {
            what: "constraint matrix".to_string(),
            expected: 5,
            found: 4,
        }
    );
    assert!(solve_dual_parts(&costs, &constraints, &requirements).is_err());
}

#[test]
fn test_bundled_data_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/procurement.json");
    let data = ProcurementData::load(path).unwrap();
    assert_eq!(data.num_lots(), 3);
    assert_eq!(data.num_weapons(), data.weapons.len());

    let primal = solve_primal(&data).unwrap().unwrap();
    assert!((primal.lots[0] - 111.1111).abs() < 1e-3, "{:?}", primal.lots);
    assert!((primal.lots[1] - 111.1111).abs() < 1e-3, "{:?}", primal.lots);
    assert!(primal.lots[2].abs() < 1e-9);
    assert!((primal.total_cost - 2000.0).abs() < 1e-6);

    let dual = solve_dual(&data).unwrap().unwrap();
    assert!((dual.prices[0] - 0.01).abs() < 1e-9, "{:?}", dual.prices);
    assert!((dual.prices[1] - 0.005).abs() < 1e-9, "{:?}", dual.prices);
    assert!((dual.total_profit - 2000.0).abs() < 1e-6);
}
