//! Polar quadrature grid over the lens aperture.

use std::f64::consts::TAU;

use ndarray::Array1;
use serde::Serialize;

use crate::error::{require_positive, OpticsError};

/// Uniform polar grid `r ∈ [0, R]`, `θ ∈ [0, 2π]` with trapezoid weights.
///
/// Nodes are `r_i = i·Δr` and `θ_j = j·Δθ` with `Δr = R / (radial_steps − 1)`
/// and `Δθ = 2π / (azimuthal_steps − 1)`. The grid is a full Cartesian
/// product; it is cheap to regenerate and is never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApertureGrid {
    radial_steps: usize,
    azimuthal_steps: usize,
    lens_radius: f64,
}

/// Flattened grid nodes, radial index major.
#[derive(Debug, Clone)]
pub struct ApertureNodes {
    pub r: Array1<f64>,
    pub theta: Array1<f64>,
    /// `Δr · Δθ · w_i · w_j`, without the polar Jacobian `r`.
    pub weights: Array1<f64>,
}

fn trapezoid_factor(index: usize, steps: usize) -> f64 {
    if index == 0 || index + 1 == steps {
        0.5
    } else {
        1.0
    }
}

impl ApertureGrid {
    pub fn new(
        radial_steps: usize,
        azimuthal_steps: usize,
        lens_radius: f64,
    ) -> Result<Self, OpticsError> {
        if radial_steps < 2 || azimuthal_steps < 2 {
            return Err(OpticsError::InvalidGrid(format!(
                "need at least 2 steps per direction, got {radial_steps} × {azimuthal_steps}"
            )));
        }
        Ok(Self {
            radial_steps,
            azimuthal_steps,
            lens_radius: require_positive("lens_radius", lens_radius)?,
        })
    }

    pub fn radial_steps(&self) -> usize {
        self.radial_steps
    }

    pub fn azimuthal_steps(&self) -> usize {
        self.azimuthal_steps
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }

    /// Radial spacing Δr.
    pub fn radial_spacing(&self) -> f64 {
        self.lens_radius / (self.radial_steps - 1) as f64
    }

    /// Azimuthal spacing Δθ.
    pub fn azimuthal_spacing(&self) -> f64 {
        TAU / (self.azimuthal_steps - 1) as f64
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.radial_steps * self.azimuthal_steps
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All nodes of the grid in radial-major order.
    pub fn nodes(&self) -> ApertureNodes {
        let (dr, dt) = (self.radial_spacing(), self.azimuthal_spacing());
        let (nr, nt) = (self.radial_steps, self.azimuthal_steps);

        // Scaled by the fraction so the rim node lands exactly on R.
        let r = Array1::from_shape_fn(self.len(), |k| {
            self.lens_radius * (k / nt) as f64 / (nr - 1) as f64
        });
        let theta = Array1::from_shape_fn(self.len(), |k| (k % nt) as f64 * dt);
        let weights = Array1::from_shape_fn(self.len(), |k| {
            dr * dt * trapezoid_factor(k / nt, nr) * trapezoid_factor(k % nt, nt)
        });

        ApertureNodes { r, theta, weights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(matches!(
            ApertureGrid::new(1, 10, 1.0),
            Err(OpticsError::InvalidGrid(_))
        ));
        assert!(ApertureGrid::new(10, 0, 1.0).is_err());
        assert!(matches!(
            ApertureGrid::new(10, 10, 0.0),
            Err(OpticsError::InvalidParameter { name: "lens_radius", .. })
        ));
    }

    #[test]
    fn test_nodes_cover_closed_intervals() {
        let grid = ApertureGrid::new(5, 9, 2.0).unwrap();
        let nodes = grid.nodes();
        assert_eq!(nodes.r.len(), 45);
        assert_abs_diff_eq!(nodes.r[0], 0.0);
        assert_abs_diff_eq!(nodes.r[44], 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(nodes.theta[8], TAU, epsilon = 1e-15);
        // Radial index is the slow one.
        assert_abs_diff_eq!(nodes.r[8], 0.0);
        assert_abs_diff_eq!(nodes.r[9], 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(nodes.theta[9], 0.0);
    }

    #[test]
    fn test_weights_integrate_disc_area() {
        // ∫∫ r dr dθ over the disc is exact for the trapezoid rule.
        for (nr, nt) in [(2, 2), (7, 13), (200, 200)] {
            let grid = ApertureGrid::new(nr, nt, 1.5).unwrap();
            let nodes = grid.nodes();
            let area: f64 = (&nodes.weights * &nodes.r).sum();
            assert_abs_diff_eq!(area, PI * 1.5 * 1.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interior_weight() {
        let grid = ApertureGrid::new(3, 3, 1.0).unwrap();
        let nodes = grid.nodes();
        // Centre node (i = 1, j = 1) carries the full Δr·Δθ.
        assert_abs_diff_eq!(nodes.weights[4], 0.5 * PI, epsilon = 1e-15);
        assert_abs_diff_eq!(nodes.weights[0], 0.125 * PI, epsilon = 1e-15);
    }
}
