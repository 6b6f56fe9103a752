//! Degree-of-freedom bookkeeping for axial displacements.

use std::collections::HashMap;

use log::debug;
use petgraph::graph::NodeIndex;

use crate::errors::{AnalysisError, TrussEditError};
use crate::mesh::Mesh;

/// Distance within which a coordinate lookup matches a node.
pub const COORDINATE_TOLERANCE: f64 = 1.0e-10;

/// Bijection between mesh nodes and global unknown indices.
///
/// Indices are assigned in node creation order, starting at zero and without gaps.
#[derive(Clone, Debug, Default)]
pub struct DofMap {
    /// Global index of each node.
    index: HashMap<NodeIndex, usize>,
    /// Node owning each global index.
    nodes: Vec<NodeIndex>,
    /// Coordinate of the node owning each global index.
    coordinates: Vec<f64>,
}

/// Split of the global indices into solved and prescribed sets.
///
/// Both lists are sorted and together cover every index exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DofPartition {
    /// Indices solved for.
    pub free: Vec<usize>,
    /// Indices with a prescribed value.
    pub constrained: Vec<usize>,
}

impl DofMap {
    /// Number every node of `mesh`.
    #[must_use]
    pub fn new(mesh: &Mesh) -> Self {
        let mut map = Self::default();
        let positions = mesh
            .node_indices()
            .filter_map(|node| Some((node, mesh.node(node)?.position())));
        for (node, position) in positions {
            map.index.insert(node, map.nodes.len());
            map.nodes.push(node);
            map.coordinates.push(position);
        }
        debug!("numbered {} degrees of freedom", map.len());
        map
    }

    /// Total number of degrees of freedom.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` when the map holds no degrees of freedom.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Global index of the displacement of `node`.
    #[must_use]
    pub fn dof(&self, node: NodeIndex) -> Option<usize> {
        self.index.get(&node).copied()
    }

    /// Node owning the global index `dof`.
    #[must_use]
    pub fn node(&self, dof: usize) -> Option<NodeIndex> {
        self.nodes.get(dof).copied()
    }

    /// Coordinate of the node owning the global index `dof`.
    #[must_use]
    pub fn coordinate(&self, dof: usize) -> Option<f64> {
        self.coordinates.get(dof).copied()
    }

    /// Iterate over `(dof, node, coordinate)` in dof order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (usize, NodeIndex, f64)> + '_ {
        self.nodes
            .iter()
            .zip(&self.coordinates)
            .enumerate()
            .map(|(dof, (&node, &coordinate))| (dof, node, coordinate))
    }

    /// Locate the node at `coordinate` using [`COORDINATE_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NodeNotFound`] when no node lies within tolerance.
    pub fn node_at_coordinate(&self, coordinate: f64) -> Result<NodeIndex, TrussEditError> {
        self.node_at_coordinate_within(coordinate, COORDINATE_TOLERANCE)
    }

    /// Locate the node nearest to `coordinate` no further away than `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NodeNotFound`] when no node lies within tolerance.
    pub fn node_at_coordinate_within(
        &self,
        coordinate: f64,
        tolerance: f64,
    ) -> Result<NodeIndex, TrussEditError> {
        self.coordinates
            .iter()
            .enumerate()
            .map(|(dof, position)| (dof, (position - coordinate).abs()))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(dof, _)| self.nodes[dof])
            .ok_or(TrussEditError::NodeNotFound {
                coordinate,
                tolerance,
            })
    }

    /// Split the global indices into free and constrained sets.
    pub fn partition<F>(&self, is_constrained: F) -> DofPartition
    where
        F: Fn(usize) -> bool,
    {
        let (constrained, free): (Vec<usize>, Vec<usize>) =
            (0..self.len()).partition(|&dof| is_constrained(dof));
        DofPartition { free, constrained }
    }
}

impl DofPartition {
    /// Check that the partition splits `0..dof_count` into two sorted lists.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DofMismatch`] when the lists do not hold `dof_count`
    /// entries in total and [`AnalysisError::InvalidPartition`] for an entry that is
    /// out of range, repeated or out of order.
    pub fn validate(&self, dof_count: usize) -> Result<(), AnalysisError> {
        let found = self.free.len() + self.constrained.len();
        if found != dof_count {
            return Err(AnalysisError::DofMismatch {
                expected: dof_count,
                found,
            });
        }
        let mut seen = vec![false; dof_count];
        for list in [&self.free, &self.constrained] {
            let mut previous = None;
            for &dof in list {
                let ascending = previous.map_or(true, |last| dof > last);
                match seen.get_mut(dof) {
                    Some(slot) if ascending && !*slot => *slot = true,
                    _ => return Err(AnalysisError::InvalidPartition { dof, dof_count }),
                }
                previous = Some(dof);
            }
        }
        Ok(())
    }
}
