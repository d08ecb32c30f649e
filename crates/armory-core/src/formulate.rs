//! Translation of the procurement problem into the solver's canonical form.
//!
//! The primal reads
//!
//! ```text
//! minimize    costs·lots
//! subject to  constraints·lots >= requirements,  lots >= 0
//! ```
//!
//! and its dual
//!
//! ```text
//! maximize    requirements·prices
//! subject to  constraintsᵀ·prices <= costs,  prices >= 0
//! ```
//!
//! The backend only accepts `min c·x s.t. A·x <= b`, so the primal's `>=` rows are
//! negated and the dual's objective is negated.

use armory_solver::CanonicalLp;

use crate::error::FormulationError;

/// Check that `constraints` is `|requirements| x |costs|`, that every entry is
/// finite and that costs and requirements are non-negative.
pub fn check_dimensions(
    costs: &[f64],
    constraints: &[Vec<f64>],
    requirements: &[f64],
) -> Result<(), FormulationError> {
    if constraints.len() != requirements.len() {
        return Err(FormulationError::DimensionMismatch {
            what: "constraint matrix".to_string(),
            expected: requirements.len(),
            found: constraints.len(),
        });
    }

    for (i, row) in constraints.iter().enumerate() {
        if row.len() != costs.len() {
            return Err(FormulationError::DimensionMismatch {
                what: format!("constraint row {}", i + 1),
                expected: costs.len(),
                found: row.len(),
            });
        }
        if let Some((j, &value)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(FormulationError::InvalidValue {
                what: format!("constraint ({}, {})", i + 1, j + 1),
                value,
            });
        }
    }

    check_non_negative("cost of lot", costs)?;
    check_non_negative("requirement", requirements)?;

    Ok(())
}

fn check_non_negative(label: &str, values: &[f64]) -> Result<(), FormulationError> {
    match values.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0) {
        Some((i, &value)) => Err(FormulationError::InvalidValue {
            what: format!("{} {}", label, i + 1),
            value,
        }),
        None => Ok(()),
    }
}

/// Build the primal in canonical form: costs unchanged, constraint matrix and
/// requirements negated so `A·x >= b` becomes `-A·x <= -b`.
pub fn formulate_primal(
    costs: &[f64],
    constraints: &[Vec<f64>],
    requirements: &[f64],
) -> Result<CanonicalLp, FormulationError> {
    check_dimensions(costs, constraints, requirements)?;

    Ok(
        CanonicalLp::new(costs.to_vec(), negate_rows(constraints), negate(requirements))
            .with_variable_names(lot_labels(costs.len()))
            .with_row_names(requirement_labels(requirements.len())),
    )
}

/// Build the dual in canonical form: objective `-requirements`, matrix the
/// transpose of the original (non-negated) constraints, right-hand side `costs`.
///
/// The optimum of this problem is the negated profit.
pub fn formulate_dual(
    costs: &[f64],
    constraints: &[Vec<f64>],
    requirements: &[f64],
) -> Result<CanonicalLp, FormulationError> {
    check_dimensions(costs, constraints, requirements)?;

    Ok(CanonicalLp::new(
        negate(requirements),
        transpose(constraints, costs.len()),
        costs.to_vec(),
    )
    .with_variable_names(requirement_labels(requirements.len()))
    .with_row_names(lot_labels(costs.len())))
}

pub fn negate(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| -v).collect()
}

pub fn negate_rows(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    matrix.iter().map(|row| negate(row)).collect()
}

/// Transpose an `m x columns` matrix. `columns` is explicit so a matrix with
/// no rows still yields `columns` empty rows.
pub fn transpose(matrix: &[Vec<f64>], columns: usize) -> Vec<Vec<f64>> {
    (0..columns)
        .map(|j| matrix.iter().map(|row| row[j]).collect())
        .collect()
}

pub fn lot_labels(lots: usize) -> Vec<String> {
    (1..=lots).map(|j| format!("lot {}", j)).collect()
}

fn requirement_labels(rows: usize) -> Vec<String> {
    (1..=rows).map(|i| format!("requirement {}", i)).collect()
}
