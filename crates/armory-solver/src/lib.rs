mod problem;
mod simplex;
mod solution;

pub use problem::CanonicalLp;
pub use simplex::Solver;
pub use solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolveError};
