//! Error types produced while building, constraining or analysing truss chains.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when a mesh cannot be generated or extended.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MeshError {
    /// Returned when the meshed span is zero, negative or not finite.
    #[error("mesh length must be positive (received {0})")]
    NonPositiveLength(f64),
    /// Returned when a mesh is requested with no elements.
    #[error("mesh must contain at least one element")]
    NoElements,
    /// Returned when an element references a node that is not part of the mesh.
    #[error("node {0:?} does not exist in this mesh")]
    UnknownNode(NodeIndex),
    /// Returned when both ends of an element share a coordinate.
    #[error("element between {start:?} and {end:?} has zero length")]
    ZeroLengthElement {
        /// First node of the rejected element.
        start: NodeIndex,
        /// Second node of the rejected element.
        end: NodeIndex,
    },
}

/// Error returned when a material or section property is not physically meaningful.
///
/// The variants carry the rejected value so callers can present actionable feedback.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PropertyError {
    /// Returned when an element length is zero or negative.
    #[error("element length must be positive (received {0})")]
    NonPositiveLength(f64),
    /// Returned when the cross-sectional area is zero or negative.
    #[error("area must be positive (received {0})")]
    NonPositiveArea(f64),
    /// Returned when the Young's modulus is zero or negative.
    #[error("Young's modulus must be positive (received {0})")]
    NonPositiveYoungsModulus(f64),
    /// Returned when a rectangular section width is zero or negative.
    #[error("section width must be positive (received {0})")]
    NonPositiveWidth(f64),
    /// Returned when a rectangular section height is zero or negative.
    #[error("section height must be positive (received {0})")]
    NonPositiveHeight(f64),
}

/// Error returned when registering constraints or loads.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConstraintError {
    /// Returned when a degree of freedom already carries a prescribed value.
    #[error("dof {dof} is already constrained to {existing} (requested {requested})")]
    Duplicate {
        /// Global index of the degree of freedom.
        dof: usize,
        /// Value registered first.
        existing: f64,
        /// Value of the rejected constraint.
        requested: f64,
    },
    /// Returned when a force direction has no orientation.
    #[error("force direction must be non-zero")]
    ZeroDirection,
    /// Returned when a prescribed displacement or force is NaN or infinite.
    #[error("dof {dof} received a non-finite value ({value})")]
    NonFiniteValue {
        /// Global index of the degree of freedom.
        dof: usize,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a dof index lies outside the structure.
    #[error("dof {dof} is out of range for a structure with {dof_count} dofs")]
    DofOutOfRange {
        /// Rejected global index.
        dof: usize,
        /// Number of degrees of freedom in the structure.
        dof_count: usize,
    },
}

/// Error returned when a truss analysis fails.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when an element has no material law assigned.
    #[error("element {0:?} has no material assigned")]
    MissingMaterial(EdgeIndex),
    /// Returned when an element has no cross section assigned.
    #[error("element {0:?} has no section assigned")]
    MissingSection(EdgeIndex),
    /// Returned when the properties of an element are not physically meaningful.
    #[error("element {element:?} has invalid properties: {source}")]
    InvalidElement {
        /// Identifier of the offending element.
        element: EdgeIndex,
        /// Description of the invalid property.
        #[source]
        source: PropertyError,
    },
    /// Returned when two stages of the analysis disagree on the number of dofs.
    #[error("expected {expected} degrees of freedom, found {found}")]
    DofMismatch {
        /// Number of dofs of the reference system.
        expected: usize,
        /// Number of dofs of the mismatched input.
        found: usize,
    },
    /// Returned when an element node has no global index in the dof map.
    #[error("node {0:?} is not numbered in the dof map")]
    UnnumberedNode(NodeIndex),
    /// Returned when a partition entry is out of range, repeated or out of order.
    #[error("partition entry {dof} is invalid for {dof_count} degrees of freedom")]
    InvalidPartition {
        /// Rejected global index.
        dof: usize,
        /// Number of degrees of freedom in the system.
        dof_count: usize,
    },
    /// Returned when the reduced stiffness matrix cannot be factorised.
    #[error("stiffness matrix is singular (pivot ratio {pivot_ratio:e}); check supports and connectivity")]
    SingularStiffness {
        /// Squared ratio of the smallest to the largest Cholesky pivot.
        pivot_ratio: f64,
    },
}

/// Error returned when editing a [`Truss`](crate::Truss).
///
/// # Examples
///
/// ```
/// use truss1d::{Mesh, Truss, TrussEditError};
///
/// let truss = Truss::new(Mesh::line(1.0, 2).expect("valid mesh"));
/// let error = truss.node_at_coordinate(0.25).expect_err("no node at x = 0.25");
/// assert!(matches!(error, TrussEditError::NodeNotFound { .. }));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a node handle is not part of the truss.
    #[error("node {0:?} does not exist in this truss")]
    UnknownNode(NodeIndex),
    /// Returned when an element handle is not part of the truss.
    #[error("element {0:?} does not exist in this truss")]
    UnknownElement(EdgeIndex),
    /// Returned when a material id was not registered with the truss.
    #[error("material {0} does not exist in this truss")]
    UnknownMaterial(usize),
    /// Returned when a section id was not registered with the truss.
    #[error("section {0} does not exist in this truss")]
    UnknownSection(usize),
    /// Returned when no node lies within tolerance of a coordinate.
    #[error("there is no node at x = {coordinate} (tolerance {tolerance:e})")]
    NodeNotFound {
        /// Requested coordinate.
        coordinate: f64,
        /// Accepted distance between the coordinate and a node.
        tolerance: f64,
    },
    /// Returned when a constraint or load is rejected.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    /// Returned when supplied properties are invalid.
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Error returned when loading a [`TrussConfig`](crate::TrussConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the configuration file cannot be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the configuration is not valid JSON for the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Returned when the geometry cannot be meshed.
    #[error("invalid geometry: {0}")]
    Mesh(#[from] MeshError),
    /// Returned when a material or section value is rejected.
    #[error("invalid property: {0}")]
    Property(#[from] PropertyError),
    /// Returned when the boundary conditions cannot be applied.
    #[error("invalid boundary condition: {0}")]
    Edit(#[from] TrussEditError),
}
