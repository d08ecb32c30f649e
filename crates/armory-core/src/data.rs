use std::fs;
use std::path::Path;

use armory_solver::CanonicalLp;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, FormulationError};
use crate::formulate::{check_dimensions, formulate_dual, formulate_primal};

/// Costs, lot compositions and minimum requirements for one procurement problem.
///
/// `constraints[i][j]` is the quantity of weapon type `i` contained in one unit of lot `j`.
/// Weapon names are display labels only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementData {
    pub costs: Vec<f64>,
    pub constraints: Vec<Vec<f64>>,
    pub requirements: Vec<f64>,
    #[serde(default, alias = "armes")]
    pub weapons: Vec<String>,
}

impl ProcurementData {
    pub fn new(
        costs: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        requirements: Vec<f64>,
        weapons: Vec<String>,
    ) -> Result<Self, FormulationError> {
        let data = Self {
            costs,
            constraints,
            requirements,
            weapons,
        };
        data.validate()?;
        Ok(data)
    }

    /// Like [`new`](Self::new) with generated weapon names.
    pub fn unnamed(
        costs: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        requirements: Vec<f64>,
    ) -> Result<Self, FormulationError> {
        let weapons = weapon_labels(requirements.len());
        Self::new(costs, constraints, requirements, weapons)
    }

    /// Fixed-size construction: the array types guarantee the matrix matches both vectors.
    pub fn from_fixed<const LOTS: usize, const WEAPONS: usize>(
        costs: [f64; LOTS],
        constraints: [[f64; LOTS]; WEAPONS],
        requirements: [f64; WEAPONS],
        weapons: [&str; WEAPONS],
    ) -> Self {
        Self {
            costs: costs.to_vec(),
            constraints: constraints.iter().map(|row| row.to_vec()).collect(),
            requirements: requirements.to_vec(),
            weapons: weapons.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// The 3-lot, 5-weapon reference scenario. Costs are in millions.
    pub fn reference() -> Self {
        Self::from_fixed(
            [10.0, 12.0, 15.0],
            [
                [500.0, 300.0, 800.0],
                [1000.0, 2000.0, 1500.0],
                [10.0, 20.0, 15.0],
                [100.0, 80.0, 15.0],
                [80.0, 120.0, 200.0],
            ],
            [100000.0, 200000.0, 100.0, 400.0, 400.0],
            ["rifles", "grenades", "tanks", "machine guns", "bazookas"],
        )
    }

    pub fn validate(&self) -> Result<(), FormulationError> {
        check_dimensions(&self.costs, &self.constraints, &self.requirements)?;
        if self.weapons.len() != self.requirements.len() {
            return Err(FormulationError::NameCount {
                names: self.weapons.len(),
                requirements: self.requirements.len(),
            });
        }
        Ok(())
    }

    pub fn num_lots(&self) -> usize {
        self.costs.len()
    }

    pub fn num_weapons(&self) -> usize {
        self.requirements.len()
    }

    /// Copy of this bundle with the unit cost of `lot` (0-based) replaced.
    pub fn with_lot_cost(&self, lot: usize, cost: f64) -> Result<Self, FormulationError> {
        if lot >= self.num_lots() {
            return Err(FormulationError::LotOutOfRange {
                lot: lot + 1,
                lots: self.num_lots(),
            });
        }
        let mut data = self.clone();
        data.costs[lot] = cost;
        Ok(data)
    }

    /// Canonical primal with weapon names on the rows.
    pub fn primal(&self) -> Result<CanonicalLp, FormulationError> {
        self.validate()?;
        let lp = formulate_primal(&self.costs, &self.constraints, &self.requirements)?;
        Ok(lp.with_row_names(self.weapons.clone()))
    }

    /// Canonical dual with weapon names on the variables.
    pub fn dual(&self) -> Result<CanonicalLp, FormulationError> {
        self.validate()?;
        let lp = formulate_dual(&self.costs, &self.constraints, &self.requirements)?;
        Ok(lp.with_variable_names(self.weapons.clone()))
    }

    /// Parse a JSON bundle. Missing weapon names are generated.
    pub fn from_json_str(source: &str) -> Result<Self, DataError> {
        let mut data: Self = serde_json::from_str(source)?;
        if data.weapons.is_empty() {
            data.weapons = weapon_labels(data.requirements.len());
        }
        data.validate()?;
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the bundle as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let path = path.as_ref();
        let io_error = |source| DataError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.to_json()?).map_err(io_error)
    }
}

fn weapon_labels(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("weapon {}", i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_valid() {
        let data = ProcurementData::reference();
        assert!(data.validate().is_ok());
        assert_eq!(data.num_lots(), 3);
        assert_eq!(data.num_weapons(), 5);
    }

    #[test]
    fn test_from_json_with_armes_key() {
        let source = r#"{
            "costs": [7.0, 11.0, 14.0],
            "constraints": [[300.0, 600.0, 500.0], [800.0, 1000.0, 1200.0]],
            "requirements": [100000.0, 200000.0],
            "armes": ["plasma rifles", "sonic grenades"]
        }"#;

        let data = ProcurementData::from_json_str(source).unwrap();
        assert_eq!(data.weapons, vec!["plasma rifles", "sonic grenades"]);
        assert_eq!(data.constraints[1][2], 1200.0);
    }

    #[test]
    fn test_from_json_generates_missing_names() {
        let source = r#"{"costs": [1.0], "constraints": [[2.0], [3.0]], "requirements": [4.0, 5.0]}"#;

        let data = ProcurementData::from_json_str(source).unwrap();
        assert_eq!(data.weapons, vec!["weapon 1", "weapon 2"]);
    }

    #[test]
    fn test_from_json_rejects_name_count() {
        let source = r#"{"costs": [1.0], "constraints": [[2.0]], "requirements": [4.0], "weapons": ["a", "b"]}"#;

        let err = ProcurementData::from_json_str(source).unwrap_err();
        assert!(matches!(
            err,
            DataError::Invalid(FormulationError::NameCount { names: 2, requirements: 1 })
        ));
    }

    #[test]
    fn test_from_json_rejects_ragged_matrix() {
        let source = r#"{"costs": [1.0, 2.0], "constraints": [[2.0]], "requirements": [4.0]}"#;

        let err = ProcurementData::from_json_str(source).unwrap_err();
        assert!(matches!(err, DataError::Invalid(FormulationError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(ProcurementData::from_json_str("{"), Err(DataError::Json(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("procurement.json");

        let data = ProcurementData::reference();
        data.save(&path).unwrap();

        assert_eq!(ProcurementData::load(&path).unwrap(), data);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcurementData::load(dir.path().join("absent.json")).unwrap_err();

        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_with_lot_cost() {
        let data = ProcurementData::reference();

        let cheaper = data.with_lot_cost(0, 1.0).unwrap();
        assert_eq!(cheaper.costs, vec![1.0, 12.0, 15.0]);
        assert_eq!(data.costs[0], 10.0);

        assert_eq!(
            data.with_lot_cost(3, 1.0).unwrap_err(),
            FormulationError::LotOutOfRange { lot: 4, lots: 3 }
        );
    }

    #[test]
    fn test_named_formulations() {
        let data = ProcurementData::reference();

        let primal = data.primal().unwrap();
        assert_eq!(primal.row_names[0], "rifles");
        assert_eq!(primal.rhs[1], -200000.0);

        let dual = data.dual().unwrap();
        assert_eq!(dual.variables[4], "bazookas");
        assert_eq!(dual.row_names[2], "lot 3");
    }
}
