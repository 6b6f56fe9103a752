#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod assembly;
mod config;
mod constraints;
mod dof;
mod element;
mod errors;
mod material;
mod mesh;
mod results;
mod solver;
mod truss;

pub use assembly::{assemble_stiffness, GlobalSystem};
pub use config::{
    BoundaryConditionKind, BoundaryConfig, GeometryConfig, MaterialConfig, TrussConfig,
};
pub use constraints::{BoundaryCondition, BoundaryConditions, Constraints, Loads};
pub use dof::{DofMap, DofPartition, COORDINATE_TOLERANCE};
pub use element::{axial_stiffness, local_stiffness};
pub use errors::{
    AnalysisError, ConfigError, ConstraintError, MeshError, PropertyError, TrussEditError,
};
pub use material::{Material, MaterialId, Section, SectionId};
pub use mesh::{Element, Mesh, Node};
pub use results::{ElementResult, NodeResult, Solution};
pub use solver::{solve_displacements, PIVOT_RATIO_TOLERANCE};
pub use truss::Truss;
