use armory_solver::{CanonicalLp, Solution, Solver};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::ProcurementData;
use crate::error::FormulationError;
use crate::formulate::{formulate_dual, formulate_primal};

/// Optimal purchase plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimalSolution {
    /// Units to buy of each lot
    pub lots: Vec<f64>,
    /// Minimal total expenditure
    pub total_cost: f64,
    /// Marginal cost of one more unit of each requirement, as read off the primal
    pub marginal_costs: Vec<f64>,
}

/// Optimal supplier pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualSolution {
    /// Unit price of each weapon type
    pub prices: Vec<f64>,
    /// Maximal achievable value `prices·requirements`
    pub total_profit: f64,
}

/// Solve the primal for `data`. `Ok(None)` means the solver found no optimum.
pub fn solve_primal(data: &ProcurementData) -> Result<Option<PrimalSolution>, FormulationError> {
    solve_primal_with(&Solver::new(), data)
}

/// Solve the dual for `data`. `Ok(None)` means the solver found no optimum.
pub fn solve_dual(data: &ProcurementData) -> Result<Option<DualSolution>, FormulationError> {
    solve_dual_with(&Solver::new(), data)
}

pub fn solve_primal_with(
    solver: &Solver,
    data: &ProcurementData,
) -> Result<Option<PrimalSolution>, FormulationError> {
    let lp = data.primal()?;
    Ok(run(solver, &lp, "primal").map(primal_from))
}

pub fn solve_dual_with(
    solver: &Solver,
    data: &ProcurementData,
) -> Result<Option<DualSolution>, FormulationError> {
    let lp = data.dual()?;
    Ok(run(solver, &lp, "dual").map(dual_from))
}

/// Slice-based primal solve for callers without a [`ProcurementData`].
pub fn solve_primal_parts(
    costs: &[f64],
    constraints: &[Vec<f64>],
    requirements: &[f64],
) -> Result<Option<PrimalSolution>, FormulationError> {
    let lp = formulate_primal(costs, constraints, requirements)?;
    Ok(run(&Solver::new(), &lp, "primal").map(primal_from))
}

/// Slice-based dual solve for callers without a [`ProcurementData`].
pub fn solve_dual_parts(
    costs: &[f64],
    constraints: &[Vec<f64>],
    requirements: &[f64],
) -> Result<Option<DualSolution>, FormulationError> {
    let lp = formulate_dual(costs, constraints, requirements)?;
    Ok(run(&Solver::new(), &lp, "dual").map(dual_from))
}

/// Solve and turn solver failures into `None` plus a warning.
fn run(solver: &Solver, lp: &CanonicalLp, problem: &'static str) -> Option<Solution> {
    match solver.solve(lp) {
        Ok(solution) => {
            debug!(problem, objective = solution.objective_value, "optimal solution found");
            Some(solution)
        }
        Err(e) => {
            warn!(problem, error = %e, "no optimal solution found");
            None
        }
    }
}

fn primal_from(solution: Solution) -> PrimalSolution {
    let marginal_costs = solution.multipliers();
    PrimalSolution {
        lots: solution.values,
        total_cost: positive_zero(solution.objective_value),
        marginal_costs,
    }
}

fn dual_from(solution: Solution) -> DualSolution {
    DualSolution {
        prices: solution.values,
        total_profit: positive_zero(-solution.objective_value),
    }
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
