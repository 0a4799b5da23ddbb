//! Focusing lens and ray generation.
//!
//! Lab frame: the lens lies in the plane `z = 0`, the optical axis is `+z`
//! and every ray leaving the aperture converges on the focal point
//! `(0, 0, f)`.

use ndarray::{aview1, Array2, ArrayView1};
use serde::Serialize;

use crate::error::{require_positive, OpticsError};

/// A thin, aberration-free focusing lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lens {
    radius: f64,
    focal_distance: f64,
}

impl Lens {
    pub fn new(radius: f64, focal_distance: f64) -> Result<Self, OpticsError> {
        Ok(Self {
            radius: require_positive("lens_radius", radius)?,
            focal_distance: require_positive("focal_distance", focal_distance)?,
        })
    }

    /// Lens whose marginal ray has the given numerical aperture.
    ///
    /// `R = f · tan(arcsin(NA / n))` with `0 < NA < n`.
    pub fn from_numerical_aperture(
        numerical_aperture: f64,
        medium_index: f64,
        focal_distance: f64,
    ) -> Result<Self, OpticsError> {
        require_positive("medium_index", medium_index)?;
        if !(numerical_aperture > 0.0 && numerical_aperture < medium_index) {
            return Err(OpticsError::NumericalAperture {
                numerical_aperture,
                medium_index,
            });
        }
        let half_angle = (numerical_aperture / medium_index).asin();
        Self::new(focal_distance * half_angle.tan(), focal_distance)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn focal_distance(&self) -> f64 {
        self.focal_distance
    }

    pub fn focal_point(&self) -> [f64; 3] {
        [0.0, 0.0, self.focal_distance]
    }

    /// Half-angle of the converging cone of light (rad).
    pub fn half_angle(&self) -> f64 {
        self.radius.atan2(self.focal_distance)
    }

    /// Numerical aperture in a medium of index `medium_index`.
    pub fn numerical_aperture(&self, medium_index: f64) -> f64 {
        medium_index * self.half_angle().sin()
    }

    /// Ray origins on the aperture and directions towards the focus.
    ///
    /// # Returns
    /// `(origins, directions)`, both (N, 3). Directions are not normalised.
    pub fn rays(
        &self,
        r: ArrayView1<'_, f64>,
        theta: ArrayView1<'_, f64>,
    ) -> Result<(Array2<f64>, Array2<f64>), OpticsError> {
        if r.len() != theta.len() {
            return Err(OpticsError::Shape(format!(
                "{} radial vs {} azimuthal coordinates",
                r.len(),
                theta.len()
            )));
        }

        let n = r.len();
        let mut origins = Array2::<f64>::zeros((n, 3));
        origins.column_mut(0).assign(&(&r * &theta.mapv(f64::cos)));
        origins.column_mut(1).assign(&(&r * &theta.mapv(f64::sin)));

        let directions = &aview1(&self.focal_point()) - &origins;
        Ok((origins, directions))
    }
}
