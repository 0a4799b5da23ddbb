//! Force maps over a grid of particle positions.
//!
//! Each position is an independent, stateless evaluation of
//! [`OpticalSystem::force_at`], so the sweep runs in parallel over Rayon's
//! thread pool when the `parallel` feature is enabled.

use serde::{Deserialize, Serialize};

use crate::aperture::ApertureGrid;
use crate::error::OpticsError;
use crate::system::OpticalSystem;

/// Evenly spaced samples along one axis.
///
/// When `start == stop` the axis collapses to a single sample regardless of
/// `steps`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionAxis {
    pub start: f64,
    pub stop: f64,
    #[serde(default = "single_step")]
    pub steps: usize,
}

fn single_step() -> usize {
    1
}

impl PositionAxis {
    pub fn new(start: f64, stop: f64, steps: usize) -> Result<Self, OpticsError> {
        let axis = Self { start, stop, steps };
        axis.validate()?;
        Ok(axis)
    }

    /// A single sample at `value`.
    pub fn fixed(value: f64) -> Self {
        Self {
            start: value,
            stop: value,
            steps: 1,
        }
    }

    pub fn validate(&self) -> Result<(), OpticsError> {
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(OpticsError::InvalidGrid(format!(
                "axis bounds must be finite, got [{}, {}]",
                self.start, self.stop
            )));
        }
        if self.start != self.stop && self.steps < 2 {
            return Err(OpticsError::InvalidGrid(format!(
                "axis [{}, {}] needs at least 2 steps, got {}",
                self.start, self.stop, self.steps
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        if self.start == self.stop {
            1
        } else {
            self.steps
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample coordinates, endpoints included.
    pub fn values(&self) -> Vec<f64> {
        let n = self.len();
        if n == 1 {
            return vec![self.start];
        }
        let step = (self.stop - self.start) / (n - 1) as f64;
        (0..n).map(|i| self.start + i as f64 * step).collect()
    }
}

/// Cartesian product of three axes, relative to the focal point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionGrid {
    pub x: PositionAxis,
    pub y: PositionAxis,
    pub z: PositionAxis,
}

impl PositionGrid {
    pub fn new(x: PositionAxis, y: PositionAxis, z: PositionAxis) -> Result<Self, OpticsError> {
        let grid = Self { x, y, z };
        grid.validate()?;
        Ok(grid)
    }

    /// Axial scan through the focus.
    pub fn along_z(start: f64, stop: f64, steps: usize) -> Result<Self, OpticsError> {
        Self::new(
            PositionAxis::fixed(0.0),
            PositionAxis::fixed(0.0),
            PositionAxis::new(start, stop, steps)?,
        )
    }

    pub fn validate(&self) -> Result<(), OpticsError> {
        self.x.validate()?;
        self.y.validate()?;
        self.z.validate()
    }

    pub fn len(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All positions, `x` varying slowest and `z` fastest.
    pub fn positions(&self) -> Vec<[f64; 3]> {
        let (xs, ys, zs) = (self.x.values(), self.y.values(), self.z.values());
        let mut out = Vec::with_capacity(self.len());
        for &x in &xs {
            for &y in &ys {
                for &z in &zs {
                    out.push([x, y, z]);
                }
            }
        }
        out
    }
}

/// Net force at one particle position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceRecord {
    pub position: [f64; 3],
    pub force: [f64; 3],
}

/// Evaluate the force at every position of `positions`.
///
/// Results come back in [`PositionGrid::positions`] order. The first failing
/// position aborts the sweep.
pub fn sweep(
    system: &OpticalSystem,
    positions: &PositionGrid,
    grid: &ApertureGrid,
) -> Result<Vec<ForceRecord>, OpticsError> {
    positions.validate()?;
    let points = positions.positions();

    log::info!(
        "Sweeping {} positions with a {}×{} aperture grid",
        points.len(),
        grid.radial_steps(),
        grid.azimuthal_steps()
    );

    let evaluate = |&position: &[f64; 3]| -> Result<ForceRecord, OpticsError> {
        Ok(ForceRecord {
            position,
            force: system.force_at(position, grid)?,
        })
    };

    #[cfg(feature = "parallel")]
    let records: Result<Vec<_>, _> = {
        use rayon::prelude::*;
        points.par_iter().map(evaluate).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let records: Result<Vec<_>, _> = points.iter().map(evaluate).collect();

    let records = records?;
    log::info!("Sweep finished: {} force samples", records.len());
    Ok(records)
}
