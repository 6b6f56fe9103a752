//! The analysed structure: mesh, properties, boundary conditions and cached results.

use log::debug;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::assembly::GlobalSystem;
use crate::constraints::{BoundaryCondition, BoundaryConditions};
use crate::dof::DofMap;
use crate::errors::{AnalysisError, TrussEditError};
use crate::material::{Material, MaterialId, Section, SectionId};
use crate::mesh::Mesh;
use crate::results::Solution;
use crate::solver::solve_displacements;

/// Container for a one-dimensional truss model.
///
/// The mesh is fixed once the truss is created. Materials and sections live in
/// tables owned by the truss and are shared between elements through their ids.
#[derive(Clone, Debug, Default)]
pub struct Truss {
    /// Node and element tables.
    mesh: Mesh,
    /// Numbering of the node displacements.
    dofs: DofMap,
    /// Registered material laws.
    materials: Vec<Material>,
    /// Registered cross sections.
    sections: Vec<Section>,
    /// Prescribed displacements and concentrated forces.
    conditions: BoundaryConditions,
    /// Results of the last analysis, cleared by every edit.
    solution: Option<Solution>,
}

impl Truss {
    /// Create a truss over `mesh` and number its degrees of freedom.
    ///
    /// # Examples
    /// ```
    /// use truss1d::{Mesh, Truss};
    ///
    /// let truss = Truss::new(Mesh::line(70.0, 10).expect("valid mesh"));
    /// assert_eq!(truss.node_count(), 11);
    /// assert_eq!(truss.dofs().len(), 11);
    /// ```
    #[must_use]
    pub fn new(mesh: Mesh) -> Self {
        let dofs = DofMap::new(&mesh);
        Self {
            mesh,
            dofs,
            ..Self::default()
        }
    }

    /// Return the number of nodes in the truss.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.mesh.node_count()
    }

    /// Return the number of elements in the truss.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.mesh.element_count()
    }

    /// Node and element tables.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Degree-of-freedom numbering.
    #[must_use]
    pub fn dofs(&self) -> &DofMap {
        &self.dofs
    }

    /// Registered boundary conditions.
    #[must_use]
    pub fn conditions(&self) -> &BoundaryConditions {
        &self.conditions
    }

    /// Register a material law.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Register a cross section.
    pub fn add_section(&mut self, section: Section) -> SectionId {
        self.sections.push(section);
        SectionId(self.sections.len() - 1)
    }

    /// Assign a material to every element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMaterial`] when `material` was not registered.
    pub fn set_material_for_all(&mut self, material: MaterialId) -> Result<(), TrussEditError> {
        self.check_material(material)?;
        self.invalidate();
        for element in self.mesh.elements_mut() {
            element.material = Some(material);
        }
        Ok(())
    }

    /// Assign a section to every element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownSection`] when `section` was not registered.
    pub fn set_section_for_all(&mut self, section: SectionId) -> Result<(), TrussEditError> {
        self.check_section(section)?;
        self.invalidate();
        for element in self.mesh.elements_mut() {
            element.section = Some(section);
        }
        Ok(())
    }

    /// Assign a material to one element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownElement`] or [`TrussEditError::UnknownMaterial`]
    /// when either handle does not belong to this truss.
    pub fn set_element_material(
        &mut self,
        element: EdgeIndex,
        material: MaterialId,
    ) -> Result<(), TrussEditError> {
        self.check_material(material)?;
        if self.mesh.element(element).is_none() {
            return Err(TrussEditError::UnknownElement(element));
        }
        self.invalidate();
        if let Some(edge) = self.mesh.element_mut(element) {
            edge.material = Some(material);
        }
        Ok(())
    }

    /// Assign a section to one element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownElement`] or [`TrussEditError::UnknownSection`]
    /// when either handle does not belong to this truss.
    pub fn set_element_section(
        &mut self,
        element: EdgeIndex,
        section: SectionId,
    ) -> Result<(), TrussEditError> {
        self.check_section(section)?;
        if self.mesh.element(element).is_none() {
            return Err(TrussEditError::UnknownElement(element));
        }
        self.invalidate();
        if let Some(edge) = self.mesh.element_mut(element) {
            edge.section = Some(section);
        }
        Ok(())
    }

    /// Locate the node at `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NodeNotFound`] when no node lies within
    /// [`COORDINATE_TOLERANCE`](crate::COORDINATE_TOLERANCE).
    pub fn node_at_coordinate(&self, coordinate: f64) -> Result<NodeIndex, TrussEditError> {
        self.dofs.node_at_coordinate(coordinate)
    }

    /// Locate the node nearest to `coordinate` within `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NodeNotFound`] when no node lies within `tolerance`.
    pub fn node_at_coordinate_within(
        &self,
        coordinate: f64,
        tolerance: f64,
    ) -> Result<NodeIndex, TrussEditError> {
        self.dofs.node_at_coordinate_within(coordinate, tolerance)
    }

    /// Apply a boundary condition to the displacement of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownNode`] when `node` is not part of this truss
    /// and [`TrussEditError::Constraint`] when the displacement of `node` is already
    /// prescribed or the value of `condition` is not finite.
    ///
    /// # Examples
    /// ```
    /// use truss1d::{BoundaryCondition, Mesh, Truss, TrussEditError};
    ///
    /// let mut truss = Truss::new(Mesh::line(1.0, 1).expect("valid mesh"));
    /// let left = truss.node_at_coordinate(0.0).expect("left end");
    /// truss.fix(left).expect("first constraint");
    /// let error = truss
    ///     .apply(left, BoundaryCondition::Displacement(0.1))
    ///     .expect_err("second constraint rejected");
    /// assert!(matches!(error, TrussEditError::Constraint(_)));
    /// ```
    pub fn apply(
        &mut self,
        node: NodeIndex,
        condition: BoundaryCondition,
    ) -> Result<(), TrussEditError> {
        let dof = self.dof(node)?;
        self.conditions.apply(dof, condition)?;
        self.invalidate();
        Ok(())
    }

    /// Fix the displacement of `node` at zero.
    ///
    /// # Errors
    ///
    /// See [`Truss::apply`].
    pub fn fix(&mut self, node: NodeIndex) -> Result<(), TrussEditError> {
        self.apply(node, BoundaryCondition::Displacement(0.0))
    }

    /// Apply a force of `magnitude` to `node` acting along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownNode`] when `node` is not part of this truss
    /// and [`TrussEditError::Constraint`] when `direction` is zero or `magnitude` is
    /// not finite.
    pub fn add_node_force(
        &mut self,
        node: NodeIndex,
        direction: f64,
        magnitude: f64,
    ) -> Result<(), TrussEditError> {
        let dof = self.dof(node)?;
        self.conditions
            .loads
            .add_directional(dof, direction, magnitude)?;
        self.invalidate();
        Ok(())
    }

    /// Assemble the global stiffness matrix and load vector.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when an element lacks a material or section.
    pub fn assemble(&self) -> Result<GlobalSystem, AnalysisError> {
        let mut system =
            GlobalSystem::assemble(&self.mesh, &self.dofs, &self.materials, &self.sections)?;
        self.conditions
            .apply_loads(&mut system)
            .expect("conditions are registered through node handles of this truss");
        Ok(system)
    }

    /// Solve the static linear elastic problem under the registered conditions.
    ///
    /// Results are cached until the next edit.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when an element lacks a material or section, or when
    /// the structure is insufficiently constrained.
    pub fn evaluate(&mut self) -> Result<&Solution, AnalysisError> {
        if self.solution.is_none() {
            let system = self.assemble()?;
            let constraints = &self.conditions.constraints;
            let partition = self.dofs.partition(|dof| constraints.is_constrained(dof));
            debug!(
                "partitioned {} free and {} constrained dofs",
                partition.free.len(),
                partition.constrained.len()
            );
            let displacements = solve_displacements(&system, constraints, &partition)?;
            let solution = Solution::evaluate(
                &self.mesh,
                &self.dofs,
                &self.materials,
                &self.sections,
                &system,
                &partition,
                displacements,
            )?;
            self.solution = Some(solution);
        }
        Ok(self.solution.as_ref().expect("solution stored above"))
    }

    /// Results of the last analysis, if still current.
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Retrieve the displacement of a node after analysis.
    #[must_use]
    pub fn node_displacement(&self, node: NodeIndex) -> Option<f64> {
        let dof = self.dofs.dof(node)?;
        self.solution
            .as_ref()
            .map(|solution| solution.displacements()[dof])
    }

    /// Retrieve the engineering strain of an element after analysis.
    #[must_use]
    pub fn element_strain(&self, element: EdgeIndex) -> Option<f64> {
        self.solution
            .as_ref()?
            .elements()
            .get(element.index())
            .map(|result| result.strain)
    }

    /// Retrieve the engineering stress of an element after analysis.
    #[must_use]
    pub fn element_stress(&self, element: EdgeIndex) -> Option<f64> {
        self.solution
            .as_ref()?
            .elements()
            .get(element.index())
            .map(|result| result.stress)
    }

    /// Retrieve the support reaction at a constrained node after analysis.
    #[must_use]
    pub fn node_reaction(&self, node: NodeIndex) -> Option<f64> {
        let dof = self.dofs.dof(node)?;
        self.solution.as_ref()?.nodes().get(dof)?.reaction
    }

    /// Drop cached results after a change.
    fn invalidate(&mut self) {
        self.solution = None;
    }

    /// Global dof of `node`.
    fn dof(&self, node: NodeIndex) -> Result<usize, TrussEditError> {
        self.dofs.dof(node).ok_or(TrussEditError::UnknownNode(node))
    }

    /// Ensure `material` was registered with this truss.
    fn check_material(&self, material: MaterialId) -> Result<(), TrussEditError> {
        if material.index() < self.materials.len() {
            Ok(())
        } else {
            Err(TrussEditError::UnknownMaterial(material.index()))
        }
    }

    /// Ensure `section` was registered with this truss.
    fn check_section(&self, section: SectionId) -> Result<(), TrussEditError> {
        if section.index() < self.sections.len() {
            Ok(())
        } else {
            Err(TrussEditError::UnknownSection(section.index()))
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::ConstraintError;

    fn bar(length: f64, elements: usize, area: f64, youngs_modulus: f64) -> Truss {
        let mut truss = Truss::new(Mesh::line(length, elements).expect("valid mesh"));
        let material =
            truss.add_material(Material::linear_elastic(youngs_modulus).expect("valid material"));
        let section = truss.add_section(Section::truss(area).expect("valid section"));
        truss.set_material_for_all(material).expect("known material");
        truss.set_section_for_all(section).expect("known section");
        truss
    }

    #[test]
    fn mutators_reject_foreign_handles() {
        let mut truss = bar(1.0, 1, 1.0, 1.0);
        let foreign_node = NodeIndex::new(42);
        let foreign_element = EdgeIndex::new(42);

        assert_eq!(
            truss.fix(foreign_node).unwrap_err(),
            TrussEditError::UnknownNode(foreign_node)
        );
        assert_eq!(
            truss.add_node_force(foreign_node, 1.0, 1.0).unwrap_err(),
            TrussEditError::UnknownNode(foreign_node)
        );
        assert_eq!(
            truss
                .set_element_material(foreign_element, MaterialId(0))
                .unwrap_err(),
            TrussEditError::UnknownElement(foreign_element)
        );
        assert_eq!(
            truss.set_material_for_all(MaterialId(3)).unwrap_err(),
            TrussEditError::UnknownMaterial(3)
        );
        assert_eq!(
            truss.set_section_for_all(SectionId(1)).unwrap_err(),
            TrussEditError::UnknownSection(1)
        );
    }

    #[test]
    fn single_element_matches_closed_form() {
        let mut truss = bar(2.0, 1, 0.01, 200.0e9);
        let left = truss.node_at_coordinate(0.0).expect("left end");
        let right = truss.node_at_coordinate(2.0).expect("right end");
        truss.fix(left).expect("left fixed");
        truss
            .apply(right, BoundaryCondition::Force(-1_000.0))
            .expect("right loaded");

        let solution = truss.evaluate().expect("analysis succeeds");
        assert!(solution.is_equilibrated(1.0e-9));

        let expected = -1_000.0 * 2.0 / (0.01 * 200.0e9);
        assert_relative_eq!(
            truss.node_displacement(right).expect("solved"),
            expected,
            epsilon = 1.0e-15
        );
        assert_eq!(truss.node_displacement(left), Some(0.0));
        assert_relative_eq!(
            truss.node_reaction(left).expect("left is supported"),
            1_000.0,
            epsilon = 1.0e-6
        );
        assert_eq!(truss.node_reaction(right), None);
    }

    #[test]
    fn edits_invalidate_results() {
        let mut truss = bar(1.0, 2, 1.0, 1.0);
        let left = truss.node_at_coordinate(0.0).expect("left end");
        let right = truss.node_at_coordinate(1.0).expect("right end");
        truss.fix(left).expect("left fixed");
        truss.add_node_force(right, 1.0, 1.0).expect("right loaded");
        truss.evaluate().expect("analysis succeeds");
        assert!(truss.solution().is_some());

        truss.add_node_force(right, -1.0, 1.0).expect("second load");
        assert!(truss.solution().is_none());
        assert_eq!(truss.node_displacement(right), None);

        truss.evaluate().expect("analysis succeeds");
        assert_relative_eq!(
            truss.node_displacement(right).expect("solved"),
            0.0,
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn duplicate_constraints_surface_as_edit_errors() {
        let mut truss = bar(1.0, 1, 1.0, 1.0);
        let left = truss.node_at_coordinate(0.0).expect("left end");
        truss.fix(left).expect("left fixed");
        assert_eq!(
            truss.fix(left).unwrap_err(),
            TrussEditError::Constraint(ConstraintError::Duplicate {
                dof: 0,
                existing: 0.0,
                requested: 0.0
            })
        );
    }

    #[test]
    fn analysis_requires_element_properties() {
        let mut truss = Truss::new(Mesh::line(1.0, 1).expect("valid mesh"));
        let element = truss.mesh().element_indices().next().expect("one element");
        assert_eq!(
            truss.evaluate().unwrap_err(),
            AnalysisError::MissingMaterial(element)
        );
    }

    #[test]
    fn unconstrained_structure_is_singular() {
        let mut truss = bar(70.0, 10, 1.3, 20_000.0);
        let right = truss.node_at_coordinate(70.0).expect("right end");
        truss
            .apply(right, BoundaryCondition::Force(12.0))
            .expect("right loaded");
        assert!(matches!(
            truss.evaluate().unwrap_err(),
            AnalysisError::SingularStiffness { .. }
        ));
    }

    #[test]
    fn per_element_properties_produce_series_response() {
        let mut truss = bar(2.0, 2, 1.0, 1.0);
        let stiff = truss.add_material(Material::linear_elastic(3.0).expect("valid material"));
        let second = truss.mesh().element_indices().nth(1).expect("two elements");
        truss
            .set_element_material(second, stiff)
            .expect("known handles");
        let left = truss.node_at_coordinate(0.0).expect("left end");
        let right = truss.node_at_coordinate(2.0).expect("right end");
        truss.fix(left).expect("left fixed");
        truss
            .apply(right, BoundaryCondition::Force(3.0))
            .expect("right loaded");

        truss.evaluate().expect("analysis succeeds");
        assert_relative_eq!(
            truss.node_displacement(right).expect("solved"),
            3.0 + 1.0,
            epsilon = 1.0e-12
        );
        assert_relative_eq!(
            truss.element_stress(second).expect("solved"),
            3.0,
            epsilon = 1.0e-12
        );
        assert_relative_eq!(
            truss.element_strain(second).expect("solved"),
            1.0,
            epsilon = 1.0e-12
        );
    }
}
