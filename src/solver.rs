//! Solution of the reduced linear system by constraint elimination.

use log::debug;
use nalgebra::{Cholesky, DMatrix, DVector};

use crate::assembly::GlobalSystem;
use crate::constraints::Constraints;
use crate::dof::DofPartition;
use crate::errors::AnalysisError;

/// Smallest accepted squared pivot ratio per free dof, in units of machine epsilon.
///
/// The threshold for a reduced system of `n` dofs is `n * PIVOT_RATIO_TOLERANCE`.
/// Rigid body modes of an under-constrained chain leave a pivot at round-off level,
/// while stiffness contrasts of many orders of magnitude stay well above it.
pub const PIVOT_RATIO_TOLERANCE: f64 = 16.0 * f64::EPSILON;

/// Copy the rows `rows` and columns `cols` of `matrix`.
fn submatrix(matrix: &DMatrix<f64>, rows: &[usize], cols: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), cols.len(), |i, j| matrix[(rows[i], cols[j])])
}

/// Copy the entries `rows` of `vector`.
fn subvector(vector: &DVector<f64>, rows: &[usize]) -> DVector<f64> {
    DVector::from_iterator(rows.len(), rows.iter().map(|&row| vector[row]))
}

/// Factorise the symmetric positive definite block `k_ff`.
fn factorise(k_ff: DMatrix<f64>) -> Result<Cholesky<f64, nalgebra::Dyn>, AnalysisError> {
    #[allow(clippy::cast_precision_loss)]
    let threshold = k_ff.nrows() as f64 * PIVOT_RATIO_TOLERANCE;
    let cholesky = Cholesky::new(k_ff).ok_or(AnalysisError::SingularStiffness { pivot_ratio: 0.0 })?;
    let pivots = cholesky.l_dirty().diagonal();
    let largest = pivots.max();
    let smallest = pivots.min();
    let pivot_ratio = (smallest / largest).powi(2);
    if !(pivot_ratio >= threshold) {
        return Err(AnalysisError::SingularStiffness { pivot_ratio });
    }
    debug!("factorised reduced stiffness (pivot ratio {pivot_ratio:e})");
    Ok(cholesky)
}

/// Solve `K_ff u_f = F_f - K_fc u_c` and merge the result with the prescribed values.
///
/// The returned vector is indexed by global dof: free entries hold the solution,
/// constrained entries hold their prescribed value.
///
/// # Errors
///
/// Returns [`AnalysisError::SingularStiffness`] when `K_ff` is not positive definite,
/// as happens for a structure that can move as a rigid body, and
/// [`AnalysisError::DofMismatch`] or [`AnalysisError::InvalidPartition`] when
/// `partition` does not split the dofs of `system`.
pub fn solve_displacements(
    system: &GlobalSystem,
    constraints: &Constraints,
    partition: &DofPartition,
) -> Result<DVector<f64>, AnalysisError> {
    let dof_count = system.checked_dof_count()?;
    partition.validate(dof_count)?;
    let free = &partition.free;
    let constrained = &partition.constrained;
    let u_c = constraints.prescribed(partition);

    let mut displacements = DVector::zeros(dof_count);
    for (&dof, &value) in constrained.iter().zip(u_c.iter()) {
        displacements[dof] = value;
    }
    if free.is_empty() {
        return Ok(displacements);
    }

    let k_ff = submatrix(&system.stiffness, free, free);
    let k_fc = submatrix(&system.stiffness, free, constrained);
    let rhs = subvector(&system.load, free) - k_fc * u_c;
    debug!(
        "solving {} free dofs with {} prescribed",
        free.len(),
        constrained.len()
    );

    let u_f = factorise(k_ff)?.solve(&rhs);
    for (&dof, &value) in free.iter().zip(u_f.iter()) {
        displacements[dof] = value;
    }
    Ok(displacements)
}
