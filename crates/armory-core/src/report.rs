//! Row-level breakdowns and the primal/dual comparison used by renderers.

use serde::Serialize;

use crate::data::ProcurementData;
use crate::solve::{DualSolution, PrimalSolution};

/// Default absolute tolerance for the strong duality check
pub const DUALITY_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotLine {
    pub lot: usize,
    pub quantity: f64,
    pub unit_cost: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponLine {
    pub weapon: String,
    pub unit_price: f64,
    pub requirement: f64,
    pub profit: f64,
}

/// Outcome of comparing the primal and dual optima
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualityCheck {
    pub total_cost: f64,
    pub total_profit: f64,
    pub gap: f64,
    pub holds: bool,
}

/// One line per lot: quantity bought, unit cost and their product.
pub fn lot_breakdown(primal: &PrimalSolution, costs: &[f64]) -> Vec<LotLine> {
    primal
        .lots
        .iter()
        .zip(costs)
        .enumerate()
        .map(|(j, (&quantity, &unit_cost))| LotLine {
            lot: j + 1,
            quantity,
            unit_cost,
            cost: quantity * unit_cost,
        })
        .collect()
}

/// One line per weapon type with `profit = price * requirement`.
pub fn weapon_breakdown(dual: &DualSolution, data: &ProcurementData) -> Vec<WeaponLine> {
    dual.prices
        .iter()
        .zip(&data.requirements)
        .zip(&data.weapons)
        .map(|((&unit_price, &requirement), weapon)| WeaponLine {
            weapon: weapon.clone(),
            unit_price,
            requirement,
            profit: unit_price * requirement,
        })
        .collect()
}

/// Compare optimal cost and profit. The tolerance is absolute for totals up to 1
/// and relative beyond that.
pub fn compare(primal: &PrimalSolution, dual: &DualSolution, tolerance: f64) -> DualityCheck {
    let gap = (primal.total_cost - dual.total_profit).abs();
    let scale = primal.total_cost.abs().max(dual.total_profit.abs()).max(1.0);
    DualityCheck {
        total_cost: primal.total_cost,
        total_profit: dual.total_profit,
        gap,
        holds: gap <= tolerance * scale,
    }
}
