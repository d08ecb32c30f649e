use thiserror::Error;

/// Why a problem could not be solved to optimality
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Malformed problem: {0}")]
    Shape(String),
    #[error("Problem has no decision variables")]
    Empty,
    #[error("Problem is infeasible")]
    Infeasible,
    #[error("Problem is unbounded")]
    Unbounded,
    #[error("Iteration limit of {0} reached")]
    IterationLimit(usize),
}

/// An optimal solution of a [`CanonicalLp`](crate::CanonicalLp)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    /// Optimal values for each variable
    pub values: Vec<f64>,
    /// Optimal objective value `c·x`
    pub objective_value: f64,
    /// Post-optimal analysis
    pub analysis: Analysis,
}

/// Detailed analysis of the optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// One multiplier per row, `λ_i = -∂objective/∂b_i >= 0`.
    /// Tightening row `i` by one unit raises the minimum by `λ_i`.
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable
    pub reduced_costs: Vec<ReducedCost>,

    /// Rows satisfied with equality at the optimum
    pub binding_constraints: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ShadowPrice {
    /// Row name
    pub constraint: String,
    /// Multiplier value
    pub value: f64,
    /// Interpretation
    pub interpretation: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Amount the cost coefficient must drop before the variable becomes attractive
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

impl Solution {
    /// Multiplier values in row order.
    pub fn multipliers(&self) -> Vec<f64> {
        self.analysis.shadow_prices.iter().map(|sp| sp.value).collect()
    }
}
