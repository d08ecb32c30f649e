use std::ops::RangeInclusive;

use armory_solver::Solver;
use serde::Serialize;
use tracing::debug;

use crate::data::ProcurementData;
use crate::error::FormulationError;
use crate::solve::{solve_dual_with, solve_primal_with};

/// Primal and dual optima for one value of the swept cost.
///
/// When a solve fails the corresponding totals and vectors are zero and the
/// `*_solved` flag is false, so trajectories stay plottable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub price: i64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub lots: Vec<f64>,
    pub prices: Vec<f64>,
    pub primal_solved: bool,
    pub dual_solved: bool,
}

/// Results of a sensitivity sweep, in ascending price order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sweep {
    /// 0-based index of the lot whose cost was varied
    pub lot: usize,
    pub points: Vec<SweepPoint>,
}

impl Sweep {
    pub fn price_points(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn cost_trajectory(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total_cost).collect()
    }

    pub fn profit_trajectory(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total_profit).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Vary the cost of the first lot over `prices`.
pub fn sensitivity_sweep(
    data: &ProcurementData,
    prices: RangeInclusive<i64>,
) -> Result<Sweep, FormulationError> {
    sweep_lot_cost(data, 0, prices)
}

/// Re-solve primal and dual with `costs[lot] = p` for every `p` in `prices`.
///
/// Shape errors and an unknown lot abort the sweep; failed solves are recorded
/// as zero placeholders.
pub fn sweep_lot_cost(
    data: &ProcurementData,
    lot: usize,
    prices: RangeInclusive<i64>,
) -> Result<Sweep, FormulationError> {
    data.validate()?;
    if lot >= data.num_lots() {
        return Err(FormulationError::LotOutOfRange {
            lot: lot + 1,
            lots: data.num_lots(),
        });
    }

    let solver = Solver::new();
    let mut points = Vec::new();

    for price in prices {
        let modified = data.with_lot_cost(lot, price as f64)?;

        let primal = solve_primal_with(&solver, &modified)?;
        let dual = solve_dual_with(&solver, &modified)?;

        let point = SweepPoint {
            price,
            total_cost: primal.as_ref().map_or(0.0, |p| p.total_cost),
            total_profit: dual.as_ref().map_or(0.0, |d| d.total_profit),
            primal_solved: primal.is_some(),
            dual_solved: dual.is_some(),
            lots: primal.map_or_else(|| vec![0.0; data.num_lots()], |p| p.lots),
            prices: dual.map_or_else(|| vec![0.0; data.num_weapons()], |d| d.prices),
        };
        debug!(
            price,
            total_cost = point.total_cost,
            total_profit = point.total_profit,
            "sweep point"
        );
        points.push(point);
    }

    Ok(Sweep { lot, points })
}
