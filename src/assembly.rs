//! Scatter-add of element stiffness into the global system.

use log::debug;
use nalgebra::{DMatrix, DVector, Matrix2};
use petgraph::graph::EdgeIndex;

use crate::dof::DofMap;
use crate::element::local_stiffness;
use crate::errors::AnalysisError;
use crate::material::{Material, Section};
use crate::mesh::{Element, Mesh};

/// Global stiffness matrix and load vector of a structure.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSystem {
    /// Symmetric stiffness matrix indexed by global dof.
    pub stiffness: DMatrix<f64>,
    /// External load vector indexed by global dof.
    pub load: DVector<f64>,
}

impl GlobalSystem {
    /// Assemble the stiffness of every element of `mesh`; the load vector starts at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when an element lacks a material or section, its
    /// properties are not strictly positive or `dofs` was not numbered from `mesh`.
    pub fn assemble(
        mesh: &Mesh,
        dofs: &DofMap,
        materials: &[Material],
        sections: &[Section],
    ) -> Result<Self, AnalysisError> {
        let stiffness = assemble_stiffness(mesh, dofs, materials, sections)?;
        let load = DVector::zeros(dofs.len());
        Ok(Self { stiffness, load })
    }

    /// Number of degrees of freedom of the system.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.load.len()
    }

    /// Number of degrees of freedom, once the matrix is square and matches the load
    /// vector.
    pub(crate) fn checked_dof_count(&self) -> Result<usize, AnalysisError> {
        let expected = self.dof_count();
        for found in [self.stiffness.nrows(), self.stiffness.ncols()] {
            if found != expected {
                return Err(AnalysisError::DofMismatch { expected, found });
            }
        }
        Ok(expected)
    }
}

/// Resolve the material and section handles of an element.
pub(crate) fn element_properties(
    index: EdgeIndex,
    element: &Element,
    materials: &[Material],
    sections: &[Section],
) -> Result<(Material, Section), AnalysisError> {
    let material = element
        .material
        .and_then(|id| materials.get(id.index()))
        .ok_or(AnalysisError::MissingMaterial(index))?;
    let section = element
        .section
        .and_then(|id| sections.get(id.index()))
        .ok_or(AnalysisError::MissingSection(index))?;
    Ok((*material, *section))
}

/// Local stiffness matrix of an element with its properties resolved.
pub(crate) fn element_stiffness(
    index: EdgeIndex,
    element: &Element,
    materials: &[Material],
    sections: &[Section],
) -> Result<Matrix2<f64>, AnalysisError> {
    let (material, section) = element_properties(index, element, materials, sections)?;
    local_stiffness(element.length(), section.area(), material.youngs_modulus()).map_err(
        |source| AnalysisError::InvalidElement {
            element: index,
            source,
        },
    )
}

/// Assemble the global stiffness matrix.
///
/// Each element's two local dofs are mapped to global indices and its 2x2
/// stiffness is added entry by entry, so shared nodes accumulate contributions.
///
/// # Errors
///
/// Returns [`AnalysisError`] when an element lacks a material or section, its
/// properties are not strictly positive or `dofs` was not numbered from `mesh`.
pub fn assemble_stiffness(
    mesh: &Mesh,
    dofs: &DofMap,
    materials: &[Material],
    sections: &[Section],
) -> Result<DMatrix<f64>, AnalysisError> {
    let size = dofs.len();
    if size != mesh.node_count() {
        return Err(AnalysisError::DofMismatch {
            expected: mesh.node_count(),
            found: size,
        });
    }
    let mut matrix = DMatrix::zeros(size, size);
    for (index, start, end, element) in mesh.elements() {
        let local = element_stiffness(index, element, materials, sections)?;
        let dof_map = [
            dofs.dof(start).ok_or(AnalysisError::UnnumberedNode(start))?,
            dofs.dof(end).ok_or(AnalysisError::UnnumberedNode(end))?,
        ];
        for (row_local, global_row) in dof_map.iter().enumerate() {
            for (col_local, global_col) in dof_map.iter().enumerate() {
                matrix[(*global_row, *global_col)] += local[(row_local, col_local)];
            }
        }
    }
    debug!(
        "assembled {size}x{size} stiffness matrix from {} elements",
        mesh.element_count()
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::material::{MaterialId, SectionId};

    fn uniform_mesh(elements: usize) -> Mesh {
        let mut mesh = Mesh::line(elements as f64, elements).expect("valid mesh");
        for element in mesh.elements_mut() {
            element.material = Some(MaterialId(0));
            element.section = Some(SectionId(0));
        }
        mesh
    }

    #[test]
    fn chain_assembles_tridiagonal_matrix() {
        let mesh = uniform_mesh(3);
        let dofs = DofMap::new(&mesh);
        let materials = [Material::linear_elastic(4.0).expect("valid material")];
        let sections = [Section::truss(0.5).expect("valid section")];
        let k = assemble_stiffness(&mesh, &dofs, &materials, &sections).expect("assembles");

        let expected = DMatrix::from_row_slice(
            4,
            4,
            &[
                2.0, -2.0, 0.0, 0.0, //
                -2.0, 4.0, -2.0, 0.0, //
                0.0, -2.0, 4.0, -2.0, //
                0.0, 0.0, -2.0, 2.0,
            ],
        );
        assert_relative_eq!(k, expected, epsilon = 1.0e-12);
        assert_eq!(k, k.transpose());
        let rigid = &k * DVector::from_element(4, 1.0);
        assert_relative_eq!(rigid.norm(), 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn missing_properties_are_reported() {
        let mut mesh = Mesh::line(1.0, 1).expect("valid mesh");
        let dofs = DofMap::new(&mesh);
        let materials = [Material::linear_elastic(1.0).expect("valid material")];
        let sections = [Section::truss(1.0).expect("valid section")];
        let element = mesh.element_indices().next().expect("one element");

        let error = assemble_stiffness(&mesh, &dofs, &materials, &sections).unwrap_err();
        assert_eq!(error, AnalysisError::MissingMaterial(element));

        mesh.element_mut(element).expect("element exists").material = Some(MaterialId(0));
        let error = assemble_stiffness(&mesh, &dofs, &materials, &sections).unwrap_err();
        assert_eq!(error, AnalysisError::MissingSection(element));

        mesh.element_mut(element).expect("element exists").section = Some(SectionId(0));
        let system = GlobalSystem::assemble(&mesh, &dofs, &materials, &sections)
            .expect("complete element assembles");
        assert_eq!(system.dof_count(), 2);
        assert_relative_eq!(system.stiffness[(0, 0)], 1.0);
    }

    #[test]
    fn foreign_dof_map_is_rejected() {
        let mesh = uniform_mesh(3);
        let dofs = DofMap::new(&uniform_mesh(1));
        let materials = [Material::linear_elastic(1.0).expect("valid material")];
        let sections = [Section::truss(1.0).expect("valid section")];

        let error = assemble_stiffness(&mesh, &dofs, &materials, &sections).unwrap_err();
        assert_eq!(
            error,
            AnalysisError::DofMismatch {
                expected: 4,
                found: 2
            }
        );
        assert!(GlobalSystem::assemble(&mesh, &dofs, &materials, &sections).is_err());
    }

    #[test]
    fn system_shape_is_checked() {
        let system = GlobalSystem {
            stiffness: DMatrix::zeros(3, 2),
            load: DVector::zeros(3),
        };
        assert_eq!(
            system.checked_dof_count().unwrap_err(),
            AnalysisError::DofMismatch {
                expected: 3,
                found: 2
            }
        );
    }
}
