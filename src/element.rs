//! Stiffness of the two-node linear truss element.

use nalgebra::{Matrix2, Vector2};

use crate::errors::PropertyError;

/// Axial stiffness `E * A / length` of a bar.
///
/// # Errors
///
/// Returns the matching [`PropertyError`] when `length`, `area` or
/// `youngs_modulus` is not strictly positive.
pub fn axial_stiffness(length: f64, area: f64, youngs_modulus: f64) -> Result<f64, PropertyError> {
    if !(length > 0.0) {
        return Err(PropertyError::NonPositiveLength(length));
    }
    if !(area > 0.0) {
        return Err(PropertyError::NonPositiveArea(area));
    }
    if !(youngs_modulus > 0.0) {
        return Err(PropertyError::NonPositiveYoungsModulus(youngs_modulus));
    }
    Ok(youngs_modulus * area / length)
}

/// Local stiffness matrix `E * A / length * [[1, -1], [-1, 1]]`.
///
/// # Errors
///
/// Returns the matching [`PropertyError`] when `length`, `area` or
/// `youngs_modulus` is not strictly positive.
///
/// # Examples
/// ```
/// use truss1d::local_stiffness;
///
/// let k = local_stiffness(2.0, 0.5, 8.0).expect("valid properties");
/// assert_eq!(k[(0, 0)], 2.0);
/// assert_eq!(k[(0, 1)], -2.0);
/// ```
pub fn local_stiffness(
    length: f64,
    area: f64,
    youngs_modulus: f64,
) -> Result<Matrix2<f64>, PropertyError> {
    let k = axial_stiffness(length, area, youngs_modulus)?;
    Ok(Matrix2::new(k, -k, -k, k))
}

/// Engineering strain from the local end displacements `[u_start, u_end]`.
pub(crate) fn strain(length: f64, direction: f64, displacements: Vector2<f64>) -> f64 {
    direction * (displacements[1] - displacements[0]) / length
}
