use tracing::debug;

use crate::problem::CanonicalLp;
use crate::solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolveError};

/// Consecutive degenerate pivots allowed before falling back to Bland's rule
const DEGENERATE_STREAK: usize = 50;

/// Relative slack under which a row counts as binding
const BINDING_TOLERANCE: f64 = 1e-7;

/// Simplex solver for problems in canonical inequality form
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Solve `min c·x s.t. A·x <= b, x >= 0` with the two-phase simplex method.
    pub fn solve(&self, problem: &CanonicalLp) -> Result<Solution, SolveError> {
        problem.check_shape()?;

        if problem.num_variables() == 0 {
            // With no variables every row reads `0 <= b_i`.
            if problem.rhs.iter().any(|&b| b < -self.tolerance) {
                return Err(SolveError::Infeasible);
            }
            return Err(SolveError::Empty);
        }

        let mut tableau = Tableau::build(problem);
        debug!(
            variables = tableau.n_vars,
            rows = tableau.n_rows,
            artificial = tableau.n_artificial,
            "simplex tableau built"
        );

        // Phase 1: find an initial basic feasible solution
        if tableau.n_artificial > 0 {
            self.phase1(&mut tableau)?;
        }

        // Phase 2: optimize
        let candidates = tableau.artificial_start();
        match self.iterate(&mut tableau, candidates, "phase 2")? {
            Pivoting::Optimal => {}
            Pivoting::Unbounded => return Err(SolveError::Unbounded),
        }

        Ok(self.extract_solution(&tableau, problem))
    }

    fn phase1(&self, tableau: &mut Tableau) -> Result<(), SolveError> {
        let obj_row = tableau.n_rows;
        let width = tableau.width();
        let rhs_col = tableau.rhs_col();
        let art_start = tableau.artificial_start();

        // Maximize -sum(artificials), priced out against the starting basis
        let original = std::mem::replace(&mut tableau.data[obj_row], vec![0.0; width]);
        for j in art_start..rhs_col {
            tableau.data[obj_row][j] = -1.0;
        }
        for i in 0..tableau.n_rows {
            if tableau.basic_vars[i] >= art_start {
                tableau.add_row_multiple(obj_row, i, 1.0);
            }
        }

        if let Pivoting::Unbounded = self.iterate(tableau, rhs_col, "phase 1")? {
            // Phase 1 is bounded by zero; this only happens on numerical breakdown
            return Err(SolveError::Infeasible);
        }

        let feasibility_tol = self.tolerance * tableau.scale;
        for i in 0..tableau.n_rows {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col] > feasibility_tol {
                return Err(SolveError::Infeasible);
            }
        }

        // Drive zero-level artificials out of the basis where a real column allows it.
        // Rows with no such column are redundant and stay pinned at zero.
        for i in 0..tableau.n_rows {
            if tableau.basic_vars[i] < art_start {
                continue;
            }
            if let Some(j) = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance) {
                tableau.data[i][rhs_col] = 0.0;
                tableau.pivot(i, j);
            }
        }

        // Restore the original objective and price out the basic columns
        tableau.data[obj_row] = original;
        for i in 0..tableau.n_rows {
            let ratio = tableau.data[obj_row][tableau.basic_vars[i]];
            if ratio != 0.0 {
                tableau.add_row_multiple(obj_row, i, -ratio);
            }
        }

        Ok(())
    }

    /// Pivot until no column below `candidates` can improve the objective.
    fn iterate(
        &self,
        tableau: &mut Tableau,
        candidates: usize,
        phase: &'static str,
    ) -> Result<Pivoting, SolveError> {
        let rhs_col = tableau.rhs_col();
        let mut degenerate = 0;

        for iteration in 0..self.max_iterations {
            let bland = degenerate >= DEGENERATE_STREAK;
            let Some(pivot_col) = self.entering_column(tableau, candidates, bland) else {
                debug!(phase, iterations = iteration, "simplex converged");
                return Ok(Pivoting::Optimal);
            };
            let Some(pivot_row) = self.leaving_row(tableau, pivot_col, bland) else {
                debug!(phase, iterations = iteration, column = pivot_col, "no leaving row");
                return Ok(Pivoting::Unbounded);
            };

            if tableau.data[pivot_row][rhs_col] <= self.tolerance {
                degenerate += 1;
            } else {
                degenerate = 0;
            }
            tableau.pivot(pivot_row, pivot_col);
        }

        Err(SolveError::IterationLimit(self.max_iterations))
    }

    /// Most positive reduced profit, or the lowest improving index under Bland's rule.
    fn entering_column(&self, tableau: &Tableau, candidates: usize, bland: bool) -> Option<usize> {
        let obj = &tableau.data[tableau.n_rows];

        if bland {
            return (0..candidates).find(|&j| obj[j] > self.tolerance);
        }

        let mut max_val = self.tolerance;
        let mut max_col = None;
        for (j, &value) in obj.iter().enumerate().take(candidates) {
            if value > max_val {
                max_val = value;
                max_col = Some(j);
            }
        }
        max_col
    }

    /// Minimum ratio test. Ties go to the first row, or to the lowest basic index under Bland's rule.
    fn leaving_row(&self, tableau: &Tableau, col: usize, bland: bool) -> Option<usize> {
        let rhs_col = tableau.rhs_col();
        let mut best: Option<(usize, f64)> = None;

        for i in 0..tableau.n_rows {
            let val = tableau.data[i][col];
            if val <= self.tolerance {
                continue;
            }
            let ratio = tableau.data[i][rhs_col].max(0.0) / val;
            best = match best {
                None => Some((i, ratio)),
                Some((row, min)) => {
                    let tie = (ratio - min).abs() <= self.tolerance;
                    if (ratio < min && !tie)
                        || (tie && bland && tableau.basic_vars[i] < tableau.basic_vars[row])
                    {
                        Some((i, ratio))
                    } else {
                        Some((row, min))
                    }
                }
            };
        }

        best.map(|(row, _)| row)
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &CanonicalLp) -> Solution {
        let n_vars = tableau.n_vars;
        let rhs_col = tableau.rhs_col();

        let mut values = vec![0.0; n_vars];
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < n_vars {
                values[basic] = non_negative(tableau.data[i][rhs_col]);
            }
        }

        let objective_value = problem.evaluate(&values);
        let analysis = self.analyze(tableau, problem, &values);

        Solution {
            values,
            objective_value,
            analysis,
        }
    }

    fn analyze(&self, tableau: &Tableau, problem: &CanonicalLp, values: &[f64]) -> Analysis {
        let n_vars = tableau.n_vars;
        let obj = &tableau.data[tableau.n_rows];

        // Slack (or surplus) column of row i sits at n_vars + i and its objective entry is ∂objective/∂b_i
        let shadow_prices = problem
            .row_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = self.snap(-obj[n_vars + i]);
                let interpretation = if value == 0.0 {
                    "Non-binding constraint".to_string()
                } else {
                    format!("Tightening {} by 1 unit would raise the objective by {:.4}", name, value)
                };
                ShadowPrice {
                    constraint: name.clone(),
                    value,
                    interpretation,
                }
            })
            .collect();

        let reduced_costs = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let is_basic = tableau.basic_vars.contains(&j);
                let reduced_cost = if is_basic { 0.0 } else { self.snap(-obj[j]) };
                ReducedCost {
                    variable: name.clone(),
                    value: values[j],
                    reduced_cost,
                    is_basic,
                }
            })
            .collect();

        let binding_constraints = problem
            .row_activities(values)
            .iter()
            .zip(&problem.rhs)
            .zip(&problem.row_names)
            .filter(|((activity, b), _)| (*b - *activity).abs() <= BINDING_TOLERANCE * (1.0 + b.abs()))
            .map(|(_, name)| name.clone())
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            binding_constraints,
        }
    }

    /// Flush values within tolerance of zero (including -0.0) to zero.
    fn snap(&self, value: f64) -> f64 {
        if value.abs() <= self.tolerance { 0.0 } else { value }
    }
}

fn non_negative(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

/// Dense tableau. Columns: decision variables, one slack or surplus per row,
/// artificials, then the right-hand side. The last row is the objective,
/// stored as reduced profits of the equivalent maximization.
struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_rows: usize,
    n_artificial: usize,
    /// Largest right-hand side magnitude (at least 1), for feasibility checks
    scale: f64,
}

impl Tableau {
    fn build(problem: &CanonicalLp) -> Self {
        let n_vars = problem.num_variables();
        let n_rows = problem.num_constraints();
        let n_artificial = problem.rhs.iter().filter(|&&b| b < 0.0).count();
        let width = n_vars + n_rows + n_artificial + 1;
        let rhs_col = width - 1;

        let mut data = vec![vec![0.0; width]; n_rows + 1];
        let mut basic_vars = vec![0; n_rows];
        let mut artificial_idx = n_vars + n_rows;

        for (i, (row, &b)) in problem.constraints.iter().zip(&problem.rhs).enumerate() {
            // A negative right-hand side is negated so the starting point is x = 0;
            // the slack becomes a surplus and an artificial takes its place in the basis.
            let flip = b < 0.0;
            let sign = if flip { -1.0 } else { 1.0 };

            for (j, &coef) in row.iter().enumerate() {
                data[i][j] = sign * coef;
            }
            data[i][n_vars + i] = sign;
            data[i][rhs_col] = sign * b;

            if flip {
                data[i][artificial_idx] = 1.0;
                basic_vars[i] = artificial_idx;
                artificial_idx += 1;
            } else {
                basic_vars[i] = n_vars + i;
            }
        }

        // The pivoting maximizes, so minimizing c·x stores -c
        for (j, &coef) in problem.objective.iter().enumerate() {
            data[n_rows][j] = -coef;
        }

        let scale = problem.rhs.iter().fold(1.0_f64, |acc, b| acc.max(b.abs()));

        Self {
            data,
            basic_vars,
            n_vars,
            n_rows,
            n_artificial,
            scale,
        }
    }

    fn width(&self) -> usize {
        self.data[0].len()
    }

    fn rhs_col(&self) -> usize {
        self.width() - 1
    }

    fn artificial_start(&self) -> usize {
        self.n_vars + self.n_rows
    }

    /// `row[target] += factor * row[source]`
    fn add_row_multiple(&mut self, target: usize, source: usize, factor: f64) {
        debug_assert_ne!(target, source);
        let (dst, src) = if target < source {
            let (head, tail) = self.data.split_at_mut(source);
            (&mut head[target], &tail[0])
        } else {
            let (head, tail) = self.data.split_at_mut(target);
            (&mut tail[0], &head[source])
        };
        for (d, s) in dst.iter_mut().zip(src.iter()) {
            *d += factor * s;
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        self.basic_vars[row] = col;

        let pivot_val = self.data[row][col];
        for v in self.data[row].iter_mut() {
            *v /= pivot_val;
        }
        self.data[row][col] = 1.0;

        for i in 0..self.data.len() {
            if i == row {
                continue;
            }
            let factor = self.data[i][col];
            if factor != 0.0 {
                self.add_row_multiple(i, row, -factor);
                self.data[i][col] = 0.0;
            }
        }
    }
}

enum Pivoting {
    Optimal,
    Unbounded,
}
