//! Nodes, two-node truss elements and the one-dimensional mesh generator.

use log::debug;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};

use crate::errors::MeshError;
use crate::material::{MaterialId, SectionId};

/// A mesh node carrying a single axial displacement degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Coordinate along the truss axis.
    position: f64,
}

impl Node {
    /// Coordinate of the node along the truss axis.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }
}

/// A two-node line element carrying only axial stiffness.
///
/// The element stores the length derived from its node coordinates when it was
/// created. Material and section are handles into the tables owned by the
/// [`Truss`](crate::Truss).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    /// Distance between the two nodes.
    length: f64,
    /// `1.0` when the local axis points towards increasing coordinates, `-1.0` otherwise.
    direction: f64,
    /// Material law assigned to the element.
    pub(crate) material: Option<MaterialId>,
    /// Cross section assigned to the element.
    pub(crate) section: Option<SectionId>,
}

impl Element {
    /// Cached element length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Orientation of the local axis relative to the global axis.
    #[must_use]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Material assigned to the element, if any.
    #[must_use]
    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Section assigned to the element, if any.
    #[must_use]
    pub fn section(&self) -> Option<SectionId> {
        self.section
    }
}

/// Node and element tables of a one-dimensional truss chain.
///
/// Nodes and elements are addressed by the graph indices returned on creation;
/// elements reference their nodes through those indices and own none of them.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Nodes are graph vertices, elements are directed edges from first to second node.
    graph: Graph<Node, Element>,
}

impl Mesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Mesh the interval `[0, length]` with `elements` equally sized elements.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonPositiveLength`] when `length` is not strictly positive
    /// and [`MeshError::NoElements`] when `elements` is zero.
    ///
    /// # Examples
    /// ```
    /// use truss1d::Mesh;
    ///
    /// let mesh = Mesh::line(70.0, 10).expect("valid mesh");
    /// assert_eq!(mesh.node_count(), 11);
    /// assert_eq!(mesh.element_count(), 10);
    /// ```
    pub fn line(length: f64, elements: usize) -> Result<Self, MeshError> {
        Self::grid(0.0, length, elements)
    }

    /// Mesh the interval `[start, end]` with `divisions` equally sized elements.
    ///
    /// Node `i` sits at `start + i * (end - start) / divisions`; elements connect
    /// consecutive nodes in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonPositiveLength`] unless `end > start` and
    /// [`MeshError::NoElements`] when `divisions` is zero.
    pub fn grid(start: f64, end: f64, divisions: usize) -> Result<Self, MeshError> {
        let length = end - start;
        if !(length > 0.0) || !length.is_finite() {
            return Err(MeshError::NonPositiveLength(length));
        }
        if divisions == 0 {
            return Err(MeshError::NoElements);
        }

        let mut mesh = Self::new();
        let nodes: Vec<NodeIndex> = (0..=divisions)
            .map(|i| mesh.add_node(start + i as f64 * length / divisions as f64))
            .collect();
        for pair in nodes.windows(2) {
            mesh.add_element(pair[0], pair[1])?;
        }
        debug!(
            "meshed [{start}, {end}] with {} nodes and {} elements",
            mesh.node_count(),
            mesh.element_count()
        );
        Ok(mesh)
    }

    /// Add a node at `position`.
    pub fn add_node(&mut self, position: f64) -> NodeIndex {
        self.graph.add_node(Node { position })
    }

    /// Connect two existing nodes with a new element.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UnknownNode`] when either node is not part of this mesh
    /// and [`MeshError::ZeroLengthElement`] when both nodes share a coordinate.
    pub fn add_element(&mut self, start: NodeIndex, end: NodeIndex) -> Result<EdgeIndex, MeshError> {
        let start_position = self
            .node(start)
            .ok_or(MeshError::UnknownNode(start))?
            .position;
        let end_position = self.node(end).ok_or(MeshError::UnknownNode(end))?.position;
        let span = end_position - start_position;
        if span == 0.0 {
            return Err(MeshError::ZeroLengthElement { start, end });
        }
        Ok(self.graph.add_edge(
            start,
            end,
            Element {
                length: span.abs(),
                direction: span.signum(),
                material: None,
                section: None,
            },
        ))
    }

    /// Return the number of nodes in the mesh.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of elements in the mesh.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, node: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(node)
    }

    /// Look up an element.
    #[must_use]
    pub fn element(&self, element: EdgeIndex) -> Option<&Element> {
        self.graph.edge_weight(element)
    }

    /// Mutable access to an element, for property assignment.
    pub(crate) fn element_mut(&mut self, element: EdgeIndex) -> Option<&mut Element> {
        self.graph.edge_weight_mut(element)
    }

    /// Mutable access to every element, for property assignment.
    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.graph.edge_weights_mut()
    }

    /// Return the ordered node pair of an element.
    #[must_use]
    pub fn element_nodes(&self, element: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(element)
    }

    /// Iterate over node handles in creation order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterate over element handles in creation order.
    pub fn element_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Iterate over elements together with their node pair.
    pub fn elements(&self) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex, &Element)> {
        self.graph
            .edge_indices()
            .zip(self.graph.raw_edges())
            .map(|(index, edge)| (index, edge.source(), edge.target(), &edge.weight))
    }
}
