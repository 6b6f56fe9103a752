use crate::conditions::BarEnds;
use log::{debug, log_enabled, warn, Level};
use truss1d::{AnalysisError, BoundaryConditionKind, Truss};

/// Summary of the results from one bar analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    /// Boundary-condition variant that produced the result.
    pub kind: BoundaryConditionKind,
    /// Displacement of the fixed node.
    pub fixed_displacement: f64,
    /// Displacement of the loaded node.
    pub loaded_displacement: f64,
    /// Support reaction at the fixed node.
    pub reaction: f64,
    /// Smallest and largest element strain.
    pub strain_range: (f64, f64),
    /// Smallest and largest element stress.
    pub stress_range: (f64, f64),
    /// Norm of the out-of-balance force on the free dofs.
    pub residual_norm: f64,
}

/// Smallest and largest value of an iterator, `(0, 0)` when empty.
fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .fold(None, |acc: Option<(f64, f64)>, value| {
            Some(acc.map_or((value, value), |(lo, hi)| (lo.min(value), hi.max(value))))
        })
        .unwrap_or((0.0, 0.0))
}

/// Execute the linear analysis and extract key response metrics.
///
/// The bar is solved with the direct stiffness method described at
/// <https://en.wikipedia.org/wiki/Direct_stiffness_method>.
pub fn run_analysis(
    truss: &mut Truss,
    ends: &BarEnds,
    kind: BoundaryConditionKind,
) -> Result<AnalysisSummary, AnalysisError> {
    let solution = truss.evaluate()?;
    let residual_norm = solution.residual_norm();
    let strain_range = range(solution.elements().iter().map(|element| element.strain));
    let stress_range = range(solution.elements().iter().map(|element| element.stress));
    if log_enabled!(Level::Debug) {
        match solution.to_json() {
            Ok(json) => debug!("{kind} results: {json}"),
            Err(err) => warn!("could not serialise {kind} results: {err}"),
        }
    }

    let fixed_displacement = truss
        .node_displacement(ends.fixed)
        .expect("displacement computed during evaluation");
    let loaded_displacement = truss
        .node_displacement(ends.loaded)
        .expect("displacement computed during evaluation");
    let reaction = truss
        .node_reaction(ends.fixed)
        .expect("fixed node is constrained");

    Ok(AnalysisSummary {
        kind,
        fixed_displacement,
        loaded_displacement,
        reaction,
        strain_range,
        stress_range,
        residual_norm,
    })
}
