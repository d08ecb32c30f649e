pub mod data;
pub mod error;
pub mod formulate;
pub mod report;
pub mod solve;
pub mod sweep;

pub use data::ProcurementData;
pub use error::{DataError, FormulationError};
pub use formulate::{formulate_dual, formulate_primal};
pub use report::{compare, lot_breakdown, weapon_breakdown, DualityCheck, LotLine, WeaponLine, DUALITY_TOLERANCE};
pub use solve::{
    solve_dual, solve_dual_parts, solve_dual_with, solve_primal, solve_primal_parts, solve_primal_with,
    DualSolution, PrimalSolution,
};
pub use sweep::{sensitivity_sweep, sweep_lot_cost, Sweep, SweepPoint};

pub use armory_solver::{CanonicalLp, Solver, SolveError};
