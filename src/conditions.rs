use petgraph::graph::NodeIndex;
use truss1d::{BoundaryConditionKind, ConfigError, Truss, TrussConfig, COORDINATE_TOLERANCE};

/// Handles of the nodes carrying boundary conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarEnds {
    /// Node fixed at `x = 0`.
    pub fixed: NodeIndex,
    /// Node at `x = length` carrying the selected condition.
    pub loaded: NodeIndex,
}

/// Build the bar for one boundary-condition variant and locate its end nodes.
///
/// The left end is clamped (see
/// <https://en.wikipedia.org/wiki/Boundary_value_problem>) and the right end
/// either moves by a prescribed amount or carries an axial point load.
pub fn build_bar(
    config: &TrussConfig,
    kind: BoundaryConditionKind,
) -> Result<(Truss, BarEnds), ConfigError> {
    config.validate()?;
    let truss = config.build(kind)?;

    // Boundary nodes are found by coordinate, the same way the conditions were
    // applied, so the handles refer to the nodes that carry them.
    let length = config.geometry.length;
    let fixed = truss.node_at_coordinate(0.0)?;
    let loaded = truss.node_at_coordinate_within(length, COORDINATE_TOLERANCE * length.max(1.0))?;

    Ok((truss, BarEnds { fixed, loaded }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_both_ends() {
        let config = TrussConfig::default();
        let (truss, ends) =
            build_bar(&config, BoundaryConditionKind::Force).expect("valid configuration");
        assert_eq!(truss.dofs().dof(ends.fixed), Some(0));
        assert_eq!(truss.dofs().dof(ends.loaded), Some(10));
        assert!(truss.conditions().constraints.is_constrained(0));
        assert_eq!(truss.conditions().loads.total(10), 12.0);
    }
}
