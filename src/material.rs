//! Linear elastic material law and truss cross sections.

use crate::errors::PropertyError;

/// Handle to a [`Material`] registered with a [`Truss`](crate::Truss).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    /// Position of the material in the truss material table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a [`Section`] registered with a [`Truss`](crate::Truss).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectionId(pub(crate) usize);

impl SectionId {
    /// Position of the section in the truss section table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Linear elastic engineering-stress material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Young's modulus.
    youngs_modulus: f64,
}

impl Material {
    /// Create a linear elastic material.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NonPositiveYoungsModulus`] unless the modulus is
    /// strictly positive.
    ///
    /// # Examples
    /// ```
    /// use truss1d::Material;
    ///
    /// let steel = Material::linear_elastic(200.0e9).expect("positive modulus");
    /// assert_eq!(steel.youngs_modulus(), 200.0e9);
    /// assert!(Material::linear_elastic(0.0).is_err());
    /// ```
    pub fn linear_elastic(youngs_modulus: f64) -> Result<Self, PropertyError> {
        if !(youngs_modulus > 0.0) {
            return Err(PropertyError::NonPositiveYoungsModulus(youngs_modulus));
        }
        Ok(Self { youngs_modulus })
    }

    /// Young's modulus of the material.
    #[must_use]
    pub fn youngs_modulus(&self) -> f64 {
        self.youngs_modulus
    }

    /// Engineering stress for an engineering strain.
    #[must_use]
    pub fn stress(&self, strain: f64) -> f64 {
        self.youngs_modulus * strain
    }
}

/// Cross section of a truss element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Section {
    /// Cross-sectional area.
    area: f64,
}

impl Section {
    /// Create a section from its area.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NonPositiveArea`] unless `area` is strictly positive.
    pub fn truss(area: f64) -> Result<Self, PropertyError> {
        if !(area > 0.0) {
            return Err(PropertyError::NonPositiveArea(area));
        }
        Ok(Self { area })
    }

    /// Create a solid rectangular section.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NonPositiveWidth`] or [`PropertyError::NonPositiveHeight`]
    /// when a dimension is not strictly positive.
    pub fn rectangular(width: f64, height: f64) -> Result<Self, PropertyError> {
        if !(width > 0.0) {
            return Err(PropertyError::NonPositiveWidth(width));
        }
        if !(height > 0.0) {
            return Err(PropertyError::NonPositiveHeight(height));
        }
        Self::truss(width * height)
    }

    /// Cross-sectional area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rejects_non_positive_properties() {
        assert_eq!(
            Material::linear_elastic(-1.0).unwrap_err(),
            PropertyError::NonPositiveYoungsModulus(-1.0)
        );
        assert_eq!(
            Section::truss(0.0).unwrap_err(),
            PropertyError::NonPositiveArea(0.0)
        );
        assert_eq!(
            Section::rectangular(0.0, 1.0).unwrap_err(),
            PropertyError::NonPositiveWidth(0.0)
        );
        assert_eq!(
            Section::rectangular(1.0, -0.5).unwrap_err(),
            PropertyError::NonPositiveHeight(-0.5)
        );
    }

    #[test]
    fn rectangular_area_is_width_times_height() {
        let section = Section::rectangular(3.1415, 0.42).expect("valid section");
        assert_relative_eq!(section.area(), 3.1415 * 0.42);
    }

    #[test]
    fn hookes_law() {
        let material = Material::linear_elastic(20_000.0).expect("valid material");
        assert_relative_eq!(material.stress(0.1 / 70.0), 20_000.0 * 0.1 / 70.0);
    }
}
