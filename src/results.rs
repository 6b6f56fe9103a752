//! Post-processing of a solved displacement field.

use log::info;
use nalgebra::{DVector, Vector2};
use serde::Serialize;

use crate::assembly::{element_properties, GlobalSystem};
use crate::dof::{DofMap, DofPartition};
use crate::element::strain as engineering_strain;
use crate::errors::AnalysisError;
use crate::material::{Material, Section};
use crate::mesh::Mesh;

/// Response of a single node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeResult {
    /// Node index in the mesh.
    pub node: usize,
    /// Global dof of the node displacement.
    pub dof: usize,
    /// Coordinate of the node.
    pub position: f64,
    /// Axial displacement.
    pub displacement: f64,
    /// Support reaction, present for constrained nodes only.
    pub reaction: Option<f64>,
}

/// Response of a single element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ElementResult {
    /// Element index in the mesh.
    pub element: usize,
    /// Indices of the first and second node.
    pub nodes: [usize; 2],
    /// Displacements of the first and second node.
    pub displacements: [f64; 2],
    /// Engineering strain.
    pub strain: f64,
    /// Engineering stress.
    pub stress: f64,
    /// Axial force, positive in tension.
    pub axial_force: f64,
}

/// Solved state of a truss together with its equilibrium check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    /// Displacement of every dof.
    #[serde(skip)]
    displacements: DVector<f64>,
    /// Internal force vector `K * u`.
    #[serde(skip)]
    internal_forces: DVector<f64>,
    /// Per-node response in dof order.
    nodes: Vec<NodeResult>,
    /// Per-element response in element order.
    elements: Vec<ElementResult>,
    /// Euclidean norm of `(K * u - F)` over the free dofs.
    residual_norm: f64,
    /// Euclidean norm of the external load vector over the free dofs.
    load_norm: f64,
}

impl Solution {
    /// Evaluate internal forces, residual, reactions and element response.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when an element lacks a material or section, and
    /// [`AnalysisError::DofMismatch`], [`AnalysisError::UnnumberedNode`] or
    /// [`AnalysisError::InvalidPartition`] when `dofs`, `partition` or
    /// `displacements` do not describe the dofs of `system`.
    pub fn evaluate(
        mesh: &Mesh,
        dofs: &DofMap,
        materials: &[Material],
        sections: &[Section],
        system: &GlobalSystem,
        partition: &DofPartition,
        displacements: DVector<f64>,
    ) -> Result<Self, AnalysisError> {
        let expected = system.checked_dof_count()?;
        for found in [dofs.len(), displacements.len()] {
            if found != expected {
                return Err(AnalysisError::DofMismatch { expected, found });
            }
        }
        partition.validate(expected)?;

        let internal_forces = &system.stiffness * &displacements;
        let imbalance = &internal_forces - &system.load;

        let residual_norm = partition
            .free
            .iter()
            .map(|&dof| imbalance[dof].powi(2))
            .sum::<f64>()
            .sqrt();
        let load_norm = partition
            .free
            .iter()
            .map(|&dof| system.load[dof].powi(2))
            .sum::<f64>()
            .sqrt();
        info!("residual: {residual_norm:e}");

        let nodes = dofs
            .entries()
            .map(|(dof, node, position)| NodeResult {
                node: node.index(),
                dof,
                position,
                displacement: displacements[dof],
                reaction: partition
                    .constrained
                    .binary_search(&dof)
                    .ok()
                    .map(|_| imbalance[dof]),
            })
            .collect();

        let mut elements = Vec::with_capacity(mesh.element_count());
        for (index, start, end, element) in mesh.elements() {
            let (material, section) = element_properties(index, element, materials, sections)?;
            let start_dof = dofs.dof(start).ok_or(AnalysisError::UnnumberedNode(start))?;
            let end_dof = dofs.dof(end).ok_or(AnalysisError::UnnumberedNode(end))?;
            let local = Vector2::new(displacements[start_dof], displacements[end_dof]);
            let strain = engineering_strain(element.length(), element.direction(), local);
            let stress = material.stress(strain);
            elements.push(ElementResult {
                element: index.index(),
                nodes: [start.index(), end.index()],
                displacements: [local[0], local[1]],
                strain,
                stress,
                axial_force: stress * section.area(),
            });
        }

        Ok(Self {
            displacements,
            internal_forces,
            nodes,
            elements,
            residual_norm,
            load_norm,
        })
    }

    /// Displacement of every dof.
    #[must_use]
    pub fn displacements(&self) -> &DVector<f64> {
        &self.displacements
    }

    /// Internal force vector `K * u` over all dofs.
    #[must_use]
    pub fn internal_forces(&self) -> &DVector<f64> {
        &self.internal_forces
    }

    /// Per-node response in dof order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeResult] {
        &self.nodes
    }

    /// Per-element response in element order.
    #[must_use]
    pub fn elements(&self) -> &[ElementResult] {
        &self.elements
    }

    /// Euclidean norm of the out-of-balance force on the free dofs.
    #[must_use]
    pub fn residual_norm(&self) -> f64 {
        self.residual_norm
    }

    /// Return `true` when the residual is below `tolerance` relative to the load
    /// magnitude (or absolutely, when the free dofs carry no load).
    #[must_use]
    pub fn is_equilibrated(&self, tolerance: f64) -> bool {
        self.residual_norm <= tolerance * self.load_norm.max(1.0)
    }

    /// Serialise node and element results as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] raised by the serializer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::assembly::assemble_stiffness;
    use crate::material::{MaterialId, SectionId};

    #[test]
    fn strain_stress_and_reactions_of_a_stretched_bar() {
        let mut mesh = Mesh::line(2.0, 2).expect("valid mesh");
        for element in mesh.elements_mut() {
            element.material = Some(MaterialId(0));
            element.section = Some(SectionId(0));
        }
        let dofs = DofMap::new(&mesh);
        let materials = [Material::linear_elastic(100.0).expect("valid material")];
        let sections = [Section::truss(0.5).expect("valid section")];
        let system = GlobalSystem {
            stiffness: assemble_stiffness(&mesh, &dofs, &materials, &sections)
                .expect("assembles"),
            load: DVector::zeros(3),
        };
        let partition = dofs.partition(|dof| dof != 1);
        let displacements = DVector::from_vec(vec![0.0, 0.01, 0.02]);

        let solution = Solution::evaluate(
            &mesh,
            &dofs,
            &materials,
            &sections,
            &system,
            &partition,
            displacements,
        )
        .expect("evaluates");

        assert_relative_eq!(solution.residual_norm(), 0.0, epsilon = 1.0e-12);
        assert!(solution.is_equilibrated(1.0e-9));
        for element in solution.elements() {
            assert_relative_eq!(element.strain, 0.01, epsilon = 1.0e-12);
            assert_relative_eq!(element.stress, 1.0, epsilon = 1.0e-12);
            assert_relative_eq!(element.axial_force, 0.5, epsilon = 1.0e-12);
        }
        let reactions: Vec<Option<f64>> = solution.nodes().iter().map(|n| n.reaction).collect();
        assert_relative_eq!(reactions[0].expect("left support"), -0.5, epsilon = 1.0e-12);
        assert_eq!(reactions[1], None);
        assert_relative_eq!(reactions[2].expect("right support"), 0.5, epsilon = 1.0e-12);

        let json = solution.to_json().expect("serialises");
        assert!(json.contains("\"residual_norm\""));
        assert!(json.contains("\"axial_force\""));
    }

    #[test]
    fn mismatched_inputs_are_reported() {
        let mut mesh = Mesh::line(2.0, 2).expect("valid mesh");
        for element in mesh.elements_mut() {
            element.material = Some(MaterialId(0));
            element.section = Some(SectionId(0));
        }
        let dofs = DofMap::new(&mesh);
        let materials = [Material::linear_elastic(1.0).expect("valid material")];
        let sections = [Section::truss(1.0).expect("valid section")];
        let system = GlobalSystem::assemble(&mesh, &dofs, &materials, &sections)
            .expect("assembles");
        let partition = dofs.partition(|dof| dof == 0);

        let error = Solution::evaluate(
            &mesh,
            &dofs,
            &materials,
            &sections,
            &system,
            &partition,
            DVector::zeros(2),
        )
        .unwrap_err();
        assert_eq!(
            error,
            AnalysisError::DofMismatch {
                expected: 3,
                found: 2
            }
        );

        let longer = Mesh::line(3.0, 3).expect("valid mesh");
        let error = Solution::evaluate(
            &mesh,
            &DofMap::new(&longer),
            &materials,
            &sections,
            &system,
            &partition,
            DVector::zeros(3),
        )
        .unwrap_err();
        assert_eq!(
            error,
            AnalysisError::DofMismatch {
                expected: 3,
                found: 4
            }
        );
    }
}
