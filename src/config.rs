//! Immutable configuration of the two-node truss bar problem.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constraints::BoundaryCondition;
use crate::dof::COORDINATE_TOLERANCE;
use crate::errors::{ConfigError, MeshError, PropertyError};
use crate::material::{Material, Section};
use crate::mesh::Mesh;
use crate::truss::Truss;

/// Material parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Young's modulus of the bar.
    pub youngs_modulus: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            youngs_modulus: 20_000.0,
        }
    }
}

/// Bar geometry and discretisation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Length of the bar along its axis.
    pub length: f64,
    /// Width of the rectangular cross section.
    pub width: f64,
    /// Height of the rectangular cross section.
    pub height: f64,
    /// Number of elements along the bar.
    pub element_count: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            length: 70.0,
            width: 3.1415,
            height: 0.42,
            element_count: 10,
        }
    }
}

/// Magnitudes applied at the far end of the bar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Prescribed displacement for [`BoundaryConditionKind::Displacement`].
    pub displacement: f64,
    /// Concentrated force for [`BoundaryConditionKind::Force`].
    pub force: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            displacement: 0.1,
            force: 12.0,
        }
    }
}

/// Kind of boundary condition applied at the far end of the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryConditionKind {
    /// Prescribed displacement.
    #[serde(rename = "DisplacementBC")]
    Displacement,
    /// Concentrated force.
    #[serde(rename = "ForceBC")]
    Force,
}

impl BoundaryConditionKind {
    /// Every kind, in the order the demonstration runs them.
    pub const ALL: [Self; 2] = [Self::Displacement, Self::Force];
}

impl fmt::Display for BoundaryConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Displacement => f.write_str("DisplacementBC"),
            Self::Force => f.write_str("ForceBC"),
        }
    }
}

/// Complete description of the bar problem.
///
/// Missing fields fall back to [`TrussConfig::default`].
///
/// # Examples
/// ```
/// use truss1d::{BoundaryConditionKind, TrussConfig};
///
/// let config = TrussConfig::from_json_str(r#"{ "geometry": { "element_count": 4 } }"#)
///     .expect("valid configuration");
/// assert_eq!(config.geometry.element_count, 4);
/// assert_eq!(config.geometry.length, 70.0);
///
/// let mut truss = config.build(BoundaryConditionKind::Force).expect("valid model");
/// let solution = truss.evaluate().expect("solvable");
/// assert!(solution.is_equilibrated(1.0e-9));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrussConfig {
    /// Material parameters.
    pub material: MaterialConfig,
    /// Bar geometry and discretisation.
    pub geometry: GeometryConfig,
    /// Boundary magnitudes.
    pub boundary: BoundaryConfig,
}

impl TrussConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] for malformed JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check every value without building a model.
    ///
    /// # Errors
    ///
    /// Returns the first rejected value as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        Material::linear_elastic(self.material.youngs_modulus)?;
        Section::rectangular(self.geometry.width, self.geometry.height)?;
        if !(self.geometry.length > 0.0) {
            return Err(MeshError::NonPositiveLength(self.geometry.length).into());
        }
        if self.geometry.element_count == 0 {
            return Err(MeshError::NoElements.into());
        }
        Ok(())
    }

    /// Boundary condition of the requested kind with its configured magnitude.
    #[must_use]
    pub fn boundary_condition(&self, kind: BoundaryConditionKind) -> BoundaryCondition {
        match kind {
            BoundaryConditionKind::Displacement => {
                BoundaryCondition::Displacement(self.boundary.displacement)
            }
            BoundaryConditionKind::Force => BoundaryCondition::Force(self.boundary.force),
        }
    }

    /// Cross section described by the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] when width or height is not strictly positive.
    pub fn section(&self) -> Result<Section, PropertyError> {
        Section::rectangular(self.geometry.width, self.geometry.height)
    }

    /// Build the bar: mesh, material and section on every element, left end
    /// fixed at `x = 0` and the condition of `kind` at `x = length`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is rejected.
    pub fn build(&self, kind: BoundaryConditionKind) -> Result<Truss, ConfigError> {
        let mesh = Mesh::line(self.geometry.length, self.geometry.element_count)?;
        let mut truss = Truss::new(mesh);

        let material =
            truss.add_material(Material::linear_elastic(self.material.youngs_modulus)?);
        let section = truss.add_section(self.section()?);
        truss.set_material_for_all(material)?;
        truss.set_section_for_all(section)?;

        let left = truss.node_at_coordinate(0.0)?;
        truss.fix(left)?;
        let length = self.geometry.length;
        let right = truss.node_at_coordinate_within(length, COORDINATE_TOLERANCE * length.max(1.0))?;
        truss.apply(right, self.boundary_condition(kind))?;
        Ok(truss)
    }
}
