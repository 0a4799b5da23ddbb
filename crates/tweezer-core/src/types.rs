//! Core data structures shared by the force pipeline.
//!
//! Lengths may be in any consistent unit (metres in the bundled examples).
//! Forces are dimensionless Q-factors: force multiplied by $c / (n_1 P)$.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::Serialize;

use crate::error::{require_positive, OpticsError};

/// A homogeneous dielectric sphere immersed in the medium.
///
/// The radius and relative index are validated on every write; the centre
/// can be moved freely between force evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sphere {
    centre: [f64; 3],
    radius: f64,
    relative_index: f64,
}

impl Sphere {
    /// Create a sphere.
    ///
    /// # Arguments
    /// * `centre` - Lab-frame position of the centre.
    /// * `radius` - Radius, must be positive.
    /// * `relative_index` - Particle index divided by medium index, must be positive.
    pub fn new(centre: [f64; 3], radius: f64, relative_index: f64) -> Result<Self, OpticsError> {
        Ok(Self {
            centre,
            radius: require_positive("radius", radius)?,
            relative_index: require_positive("relative_index", relative_index)?,
        })
    }

    pub fn centre(&self) -> [f64; 3] {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn relative_index(&self) -> f64 {
        self.relative_index
    }

    pub fn set_centre(&mut self, centre: [f64; 3]) {
        self.centre = centre;
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), OpticsError> {
        self.radius = require_positive("radius", radius)?;
        Ok(())
    }

    pub fn set_relative_index(&mut self, relative_index: f64) -> Result<(), OpticsError> {
        self.relative_index = require_positive("relative_index", relative_index)?;
        Ok(())
    }

    /// Copy of this sphere moved to `centre`.
    pub fn with_centre(&self, centre: [f64; 3]) -> Self {
        Self { centre, ..*self }
    }
}

/// A batch of N rays stored as parallel arrays.
#[derive(Debug, Clone)]
pub struct RayBatch {
    /// A point on each ray, shape (N, 3).
    pub origins: Array2<f64>,
    /// Propagation directions, shape (N, 3). Need not be normalised.
    pub directions: Array2<f64>,
    /// Quadrature weight times intensity for each ray, length N.
    pub weights: Array1<f64>,
    /// Lab-frame Jones vectors, shape (N, 3).
    pub polarisations: Array2<Complex64>,
}

impl RayBatch {
    pub fn new(
        origins: Array2<f64>,
        directions: Array2<f64>,
        weights: Array1<f64>,
        polarisations: Array2<Complex64>,
    ) -> Result<Self, OpticsError> {
        let n = origins.nrows();
        if origins.ncols() != 3 {
            return Err(OpticsError::Shape(format!(
                "origins must have 3 columns, got {}",
                origins.ncols()
            )));
        }
        if directions.dim() != (n, 3) {
            return Err(OpticsError::Shape(format!(
                "directions have shape {:?}, expected ({}, 3)",
                directions.dim(),
                n
            )));
        }
        if polarisations.dim() != (n, 3) {
            return Err(OpticsError::Shape(format!(
                "polarisations have shape {:?}, expected ({}, 3)",
                polarisations.dim(),
                n
            )));
        }
        if weights.len() != n {
            return Err(OpticsError::Shape(format!(
                "{} weights for {} rays",
                weights.len(),
                n
            )));
        }

        Ok(Self {
            origins,
            directions,
            weights,
            polarisations,
        })
    }

    /// Batch with unit weight on every ray.
    pub fn unweighted(
        origins: Array2<f64>,
        directions: Array2<f64>,
        polarisations: Array2<Complex64>,
    ) -> Result<Self, OpticsError> {
        let n = origins.nrows();
        Self::new(origins, directions, Array1::ones(n), polarisations)
    }

    /// Batch in which every ray shares the same polarisation.
    pub fn with_uniform_polarisation(
        origins: Array2<f64>,
        directions: Array2<f64>,
        polarisation: [Complex64; 3],
    ) -> Result<Self, OpticsError> {
        let n = origins.nrows();
        let polarisations = Array2::from_shape_fn((n, 3), |(_, c)| polarisation[c]);
        Self::unweighted(origins, directions, polarisations)
    }

    pub fn len(&self) -> usize {
        self.origins.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
