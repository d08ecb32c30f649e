use crate::solution::SolveError;

/// A linear program in canonical inequality form:
///
/// ```text
/// minimize    c·x
/// subject to  A·x <= b
///             x >= 0
/// ```
///
/// Non-negativity of every variable is implicit.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalLp {
    /// Variable labels (for diagnostics)
    pub variables: Vec<String>,
    /// Objective coefficients `c`, one per variable
    pub objective: Vec<f64>,
    /// Row labels (for diagnostics)
    pub row_names: Vec<String>,
    /// Inequality matrix `A`, one row per constraint
    pub constraints: Vec<Vec<f64>>,
    /// Right-hand side `b`, one entry per constraint
    pub rhs: Vec<f64>,
}

impl CanonicalLp {
    /// Build a problem with generated labels (`x1..xn`, `r1..rm`).
    pub fn new(objective: Vec<f64>, constraints: Vec<Vec<f64>>, rhs: Vec<f64>) -> Self {
        let variables = (1..=objective.len()).map(|j| format!("x{}", j)).collect();
        let row_names = (1..=rhs.len()).map(|i| format!("r{}", i)).collect();
        Self {
            variables,
            objective,
            row_names,
            constraints,
            rhs,
        }
    }

    pub fn with_variable_names(mut self, names: Vec<String>) -> Self {
        self.variables = names;
        self
    }

    pub fn with_row_names(mut self, names: Vec<String>) -> Self {
        self.row_names = names;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }

    /// Evaluate `c·x`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// Evaluate `A_i·x` for every row.
    pub fn row_activities(&self, values: &[f64]) -> Vec<f64> {
        self.constraints
            .iter()
            .map(|row| row.iter().zip(values).map(|(a, x)| a * x).sum())
            .collect()
    }

    /// Check that `A` is `m x n`, that the labels line up and that every entry is finite.
    pub fn check_shape(&self) -> Result<(), SolveError> {
        let n = self.num_variables();
        let m = self.num_constraints();

        if self.constraints.len() != m {
            return Err(SolveError::Shape(format!(
                "{} constraint rows but {} right-hand side entries",
                self.constraints.len(),
                m
            )));
        }
        if let Some((i, row)) = self.constraints.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(SolveError::Shape(format!(
                "row {} has {} coefficients, expected {}",
                i + 1,
                row.len(),
                n
            )));
        }
        if self.variables.len() != n || self.row_names.len() != m {
            return Err(SolveError::Shape(format!(
                "{} variable labels and {} row labels for a {}x{} problem",
                self.variables.len(),
                self.row_names.len(),
                m,
                n
            )));
        }

        let all_finite = self.objective.iter().all(|v| v.is_finite())
            && self.rhs.iter().all(|v| v.is_finite())
            && self.constraints.iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return Err(SolveError::Shape("coefficients must be finite".to_string()));
        }

        Ok(())
    }
}
