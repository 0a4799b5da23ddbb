//! Aperture quadrature: from a beam profile and a lens to one net force.
//!
//! Every node of the [`ApertureGrid`] launches one ray from the lens towards
//! the focus. The whole grid is traced as a single [`RayBatch`] and the
//! per-ray forces are summed with weights
//!
//! $$w_{ij} = \Delta r\,\Delta\theta\; t_i t_j\; I(r_i, \theta_j)\; r_i,$$
//!
//! where $t$ are the trapezoid end factors and $r_i$ is the polar Jacobian.

use ndarray::Axis;
use tweezer_beams::BeamProfile;

use crate::aperture::ApertureGrid;
use crate::error::OpticsError;
use crate::force::ray_forces;
use crate::lens::Lens;
use crate::system::OpticalSystem;
use crate::types::{RayBatch, Sphere};

/// Relative mismatch tolerated between the grid and lens radii.
const RADIUS_MATCH_TOLERANCE: f64 = 1e-12;

fn check_grid(lens: &Lens, grid: &ApertureGrid) -> Result<(), OpticsError> {
    let mismatch = (grid.lens_radius() - lens.radius()).abs();
    if mismatch > RADIUS_MATCH_TOLERANCE * lens.radius() {
        return Err(OpticsError::InvalidGrid(format!(
            "grid radius {} does not match lens radius {}",
            grid.lens_radius(),
            lens.radius()
        )));
    }
    Ok(())
}

/// Build the weighted ray batch for every node of `grid`.
pub fn build_rays(
    lens: &Lens,
    beam: &dyn BeamProfile,
    grid: &ApertureGrid,
) -> Result<RayBatch, OpticsError> {
    check_grid(lens, grid)?;
    let nodes = grid.nodes();
    let (intensity, polarisations) =
        beam.sample_grid(nodes.r.view(), nodes.theta.view(), lens.radius())?;
    let (origins, directions) = lens.rays(nodes.r.view(), nodes.theta.view())?;
    let weights = &nodes.weights * &intensity * &nodes.r;
    RayBatch::new(origins, directions, weights, polarisations)
}

/// Power collected by the quadrature, 1 for a correctly normalised profile.
pub fn aperture_power(
    lens: &Lens,
    beam: &dyn BeamProfile,
    grid: &ApertureGrid,
) -> Result<f64, OpticsError> {
    check_grid(lens, grid)?;
    let nodes = grid.nodes();
    let (intensity, _) = beam.sample_grid(nodes.r.view(), nodes.theta.view(), lens.radius())?;
    Ok((&nodes.weights * &intensity * &nodes.r).sum())
}

/// Net Q-factor on `sphere` from the beam focused by `lens`.
pub fn integrate_force(
    sphere: &Sphere,
    lens: &Lens,
    beam: &dyn BeamProfile,
    grid: &ApertureGrid,
) -> Result<[f64; 3], OpticsError> {
    let batch = build_rays(lens, beam, grid)?;
    let forces = ray_forces(&batch, sphere)?;

    let total = (&forces * &batch.weights.view().insert_axis(Axis(1))).sum_axis(Axis(0));
    let force = [total[0], total[1], total[2]];

    log::debug!(
        "integrate: {} rays ({} profile), sphere at {:?} -> Q = [{:.4e}, {:.4e}, {:.4e}]",
        batch.len(),
        beam.name(),
        sphere.centre(),
        force[0],
        force[1],
        force[2]
    );

    Ok(force)
}

/// Net force on the particle of `system` at its current position, on a
/// `radial_steps × azimuthal_steps` aperture grid.
pub fn integrate(
    system: &OpticalSystem,
    radial_steps: usize,
    azimuthal_steps: usize,
) -> Result<[f64; 3], OpticsError> {
    let grid = ApertureGrid::new(radial_steps, azimuthal_steps, system.lens().radius())?;
    integrate_force(system.sphere(), system.lens(), system.beam(), &grid)
}
