//! Prescribed displacements and concentrated loads.

use std::collections::BTreeMap;

use log::warn;
use nalgebra::DVector;

use crate::assembly::GlobalSystem;
use crate::dof::DofPartition;
use crate::errors::ConstraintError;

/// Boundary condition applied to a single degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryCondition {
    /// Fix the displacement to the given value; the dof leaves the solved set.
    Displacement(f64),
    /// Add a concentrated force; the dof remains free.
    Force(f64),
}

/// Prescribed displacement values keyed by global dof.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constraints {
    /// Each constrained dof maps to exactly one value.
    values: BTreeMap<usize, f64>,
}

impl Constraints {
    /// Create an empty constraint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prescribe the displacement of `dof`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NonFiniteValue`] when `value` is NaN or infinite and
    /// [`ConstraintError::Duplicate`] when `dof` is already constrained.
    pub fn add(&mut self, dof: usize, value: f64) -> Result<(), ConstraintError> {
        if !value.is_finite() {
            return Err(ConstraintError::NonFiniteValue { dof, value });
        }
        if let Some(&existing) = self.values.get(&dof) {
            return Err(ConstraintError::Duplicate {
                dof,
                existing,
                requested: value,
            });
        }
        self.values.insert(dof, value);
        Ok(())
    }

    /// Prescribed value of `dof`, if constrained.
    #[must_use]
    pub fn value(&self, dof: usize) -> Option<f64> {
        self.values.get(&dof).copied()
    }

    /// Return `true` when `dof` has a prescribed value.
    #[must_use]
    pub fn is_constrained(&self, dof: usize) -> bool {
        self.values.contains_key(&dof)
    }

    /// Number of constrained dofs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return `true` when nothing is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(dof, value)` pairs in ascending dof order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().map(|(&dof, &value)| (dof, value))
    }

    /// Prescribed values gathered in the order of `partition.constrained`.
    #[must_use]
    pub fn prescribed(&self, partition: &DofPartition) -> DVector<f64> {
        DVector::from_iterator(
            partition.constrained.len(),
            partition
                .constrained
                .iter()
                .map(|&dof| self.value(dof).unwrap_or(0.0)),
        )
    }
}

/// Concentrated forces keyed by global dof. Forces on the same dof add up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Loads {
    /// Registered `(dof, force)` pairs in insertion order.
    entries: Vec<(usize, f64)>,
}

impl Loads {
    /// Create an empty load set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `force` to `dof`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NonFiniteValue`] when `force` is NaN or infinite.
    pub fn add(&mut self, dof: usize, force: f64) -> Result<(), ConstraintError> {
        if !force.is_finite() {
            return Err(ConstraintError::NonFiniteValue { dof, value: force });
        }
        self.entries.push((dof, force));
        Ok(())
    }

    /// Add a force of `magnitude` acting along `direction`.
    ///
    /// Only the sign of `direction` matters on a one-dimensional axis.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::ZeroDirection`] when `direction` is zero or not finite
    /// and [`ConstraintError::NonFiniteValue`] when `magnitude` is NaN or infinite.
    pub fn add_directional(
        &mut self,
        dof: usize,
        direction: f64,
        magnitude: f64,
    ) -> Result<(), ConstraintError> {
        if direction == 0.0 || !direction.is_finite() {
            return Err(ConstraintError::ZeroDirection);
        }
        self.add(dof, direction.signum() * magnitude)
    }

    /// Total force registered on `dof`.
    #[must_use]
    pub fn total(&self, dof: usize) -> f64 {
        self.entries
            .iter()
            .filter(|(loaded, _)| *loaded == dof)
            .map(|(_, force)| force)
            .sum()
    }

    /// Return `true` when no load is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over registered `(dof, force)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum every load into `load`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::DofOutOfRange`] when a load targets a dof beyond `load`.
    pub fn accumulate_into(&self, load: &mut DVector<f64>) -> Result<(), ConstraintError> {
        let dof_count = load.len();
        for &(dof, force) in &self.entries {
            let entry = load
                .get_mut(dof)
                .ok_or(ConstraintError::DofOutOfRange { dof, dof_count })?;
            *entry += force;
        }
        Ok(())
    }
}

/// Displacement constraints and loads registered on one structure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryConditions {
    /// Prescribed displacements.
    pub constraints: Constraints,
    /// Concentrated forces.
    pub loads: Loads,
}

impl BoundaryConditions {
    /// Register `condition` on `dof`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::Duplicate`] when a displacement is prescribed twice
    /// on the same dof and [`ConstraintError::NonFiniteValue`] when the value of
    /// `condition` is NaN or infinite.
    pub fn apply(&mut self, dof: usize, condition: BoundaryCondition) -> Result<(), ConstraintError> {
        match condition {
            BoundaryCondition::Displacement(value) => self.constraints.add(dof, value),
            BoundaryCondition::Force(force) => self.loads.add(dof, force),
        }
    }

    /// Accumulate the registered loads into the load vector of `system`.
    ///
    /// Loads on constrained dofs are kept in the vector but have no effect on the
    /// solved displacements.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::DofOutOfRange`] when a constraint or load targets a
    /// dof outside `system`.
    pub fn apply_loads(&self, system: &mut GlobalSystem) -> Result<(), ConstraintError> {
        let dof_count = system.dof_count();
        if let Some((dof, _)) = self.constraints.iter().find(|(dof, _)| *dof >= dof_count) {
            return Err(ConstraintError::DofOutOfRange { dof, dof_count });
        }
        for (dof, force) in self.loads.iter() {
            if self.constraints.is_constrained(dof) {
                warn!("load {force} on constrained dof {dof} is ignored by the solve");
            }
        }
        self.loads.accumulate_into(&mut system.load)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;

    #[test]
    fn duplicate_constraints_are_rejected() {
        let mut constraints = Constraints::new();
        constraints.add(3, 0.0).expect("first constraint accepted");
        let error = constraints.add(3, 0.1).expect_err("second constraint rejected");
        assert_eq!(
            error,
            ConstraintError::Duplicate {
                dof: 3,
                existing: 0.0,
                requested: 0.1
            }
        );
        assert_eq!(constraints.value(3), Some(0.0));
        assert_eq!(constraints.len(), 1);
    }

    #[test]
    fn loads_on_the_same_dof_are_summed() {
        let mut loads = Loads::new();
        loads.add(1, 5.0).expect("finite force");
        loads.add(1, 7.0).expect("finite force");
        loads
            .add_directional(2, -3.0, 4.0)
            .expect("non-zero direction");
        assert_eq!(loads.total(1), 12.0);

        let mut vector = DVector::zeros(3);
        loads.accumulate_into(&mut vector).expect("dofs in range");
        assert_eq!(vector, DVector::from_vec(vec![0.0, 12.0, -4.0]));

        assert_eq!(
            loads.add_directional(0, 0.0, 1.0).unwrap_err(),
            ConstraintError::ZeroDirection
        );
    }

    #[test]
    fn conditions_dispatch_by_variant() {
        let mut conditions = BoundaryConditions::default();
        conditions
            .apply(0, BoundaryCondition::Displacement(0.0))
            .expect("left end fixed");
        conditions
            .apply(2, BoundaryCondition::Force(12.0))
            .expect("right end loaded");
        assert!(conditions.constraints.is_constrained(0));
        assert!(!conditions.constraints.is_constrained(2));

        let mut system = GlobalSystem {
            stiffness: DMatrix::zeros(3, 3),
            load: DVector::zeros(3),
        };
        conditions.apply_loads(&mut system).expect("dofs in range");
        assert_eq!(system.load, DVector::from_vec(vec![0.0, 0.0, 12.0]));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut conditions = BoundaryConditions::default();
        let error = conditions
            .apply(1, BoundaryCondition::Force(f64::NAN))
            .expect_err("NaN force rejected");
        assert!(matches!(error, ConstraintError::NonFiniteValue { dof: 1, .. }));
        assert_eq!(
            conditions
                .apply(0, BoundaryCondition::Displacement(f64::INFINITY))
                .unwrap_err(),
            ConstraintError::NonFiniteValue {
                dof: 0,
                value: f64::INFINITY
            }
        );
        assert_eq!(
            conditions.loads.add_directional(2, 1.0, f64::NEG_INFINITY).unwrap_err(),
            ConstraintError::NonFiniteValue {
                dof: 2,
                value: f64::NEG_INFINITY
            }
        );
        assert!(conditions.constraints.is_empty());
        assert!(conditions.loads.is_empty());
    }

    #[test]
    fn out_of_range_dofs_are_rejected() {
        let mut conditions = BoundaryConditions::default();
        conditions
            .apply(5, BoundaryCondition::Displacement(0.0))
            .expect("registration does not know the structure size");
        let mut system = GlobalSystem {
            stiffness: DMatrix::zeros(2, 2),
            load: DVector::zeros(2),
        };
        assert_eq!(
            conditions.apply_loads(&mut system).unwrap_err(),
            ConstraintError::DofOutOfRange {
                dof: 5,
                dof_count: 2
            }
        );
    }
}
