//! The optical trap: one sphere, one lens, one beam.

use std::fmt;
use std::sync::Arc;

use tweezer_beams::BeamProfile;

use crate::aperture::ApertureGrid;
use crate::error::OpticsError;
use crate::integrator;
use crate::lens::Lens;
use crate::types::Sphere;

/// Facade owning the particle, the lens geometry and the beam strategy.
///
/// Particle positions are given relative to the focal point, with negative
/// `z` towards the lens. Every force evaluation recomputes everything from
/// the current state; nothing is cached between calls.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use tweezer_beams::{Polarisation, UniformBeam};
/// use tweezer_core::{Lens, OpticalSystem};
///
/// let lens = Lens::from_numerical_aperture(1.25, 1.33, 1e-3).unwrap();
/// let beam = Arc::new(UniformBeam::new(Polarisation::X).unwrap());
/// let mut system = OpticalSystem::new(5e-6, 1.2, lens, beam).unwrap();
/// system.set_particle_position([0.0, 0.0, 1.01 * 5e-6]);
/// let q = system.integrate(60, 60).unwrap();
/// assert!(q[2] < 0.0);
/// ```
#[derive(Clone)]
pub struct OpticalSystem {
    sphere: Sphere,
    lens: Lens,
    beam: Arc<dyn BeamProfile>,
    position: [f64; 3],
}

impl fmt::Debug for OpticalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpticalSystem")
            .field("sphere", &self.sphere)
            .field("lens", &self.lens)
            .field("beam", &self.beam.name())
            .field("position", &self.position)
            .finish()
    }
}

impl OpticalSystem {
    /// Create a system with the particle sitting at the focus.
    ///
    /// # Arguments
    /// * `particle_radius` - Sphere radius, same length unit as the lens.
    /// * `relative_index` - Particle index over medium index.
    /// * `lens` - Focusing lens.
    /// * `beam` - Beam profile filling the lens aperture.
    pub fn new(
        particle_radius: f64,
        relative_index: f64,
        lens: Lens,
        beam: Arc<dyn BeamProfile>,
    ) -> Result<Self, OpticsError> {
        let sphere = Sphere::new(lens.focal_point(), particle_radius, relative_index)?;
        Ok(Self {
            sphere,
            lens,
            beam,
            position: [0.0; 3],
        })
    }

    fn centre_for(&self, position: [f64; 3]) -> [f64; 3] {
        let focus = self.lens.focal_point();
        [
            focus[0] + position[0],
            focus[1] + position[1],
            focus[2] + position[2],
        ]
    }

    /// Move the particle to `position`, relative to the focal point.
    pub fn set_particle_position(&mut self, position: [f64; 3]) {
        self.position = position;
        self.sphere.set_centre(self.centre_for(position));
    }

    /// Current particle position relative to the focal point.
    pub fn particle_position(&self) -> [f64; 3] {
        self.position
    }

    pub fn set_particle_index(&mut self, relative_index: f64) -> Result<(), OpticsError> {
        self.sphere.set_relative_index(relative_index)
    }

    pub fn set_particle_radius(&mut self, radius: f64) -> Result<(), OpticsError> {
        self.sphere.set_radius(radius)
    }

    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    pub fn beam(&self) -> &dyn BeamProfile {
        self.beam.as_ref()
    }

    /// Aperture grid of the given resolution over this system's lens.
    pub fn aperture_grid(
        &self,
        radial_steps: usize,
        azimuthal_steps: usize,
    ) -> Result<ApertureGrid, OpticsError> {
        ApertureGrid::new(radial_steps, azimuthal_steps, self.lens.radius())
    }

    /// Net Q-factor at the current particle position.
    pub fn integrate(
        &self,
        radial_steps: usize,
        azimuthal_steps: usize,
    ) -> Result<[f64; 3], OpticsError> {
        integrator::integrate(self, radial_steps, azimuthal_steps)
    }

    /// Net Q-factor with the particle at `position`, leaving `self` untouched.
    ///
    /// Safe to call from many threads on a shared system.
    pub fn force_at(&self, position: [f64; 3], grid: &ApertureGrid) -> Result<[f64; 3], OpticsError> {
        let sphere = self.sphere.with_centre(self.centre_for(position));
        integrator::integrate_force(&sphere, &self.lens, self.beam.as_ref(), grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tweezer_beams::{Polarisation, UniformBeam};

    fn system() -> OpticalSystem {
        let lens = Lens::new(1.0, 1.0).unwrap();
        let beam = Arc::new(UniformBeam::new(Polarisation::X).unwrap());
        OpticalSystem::new(0.01, 1.2, lens, beam).unwrap()
    }

    #[test]
    fn test_starts_at_focus() {
        let s = system();
        assert_eq!(s.particle_position(), [0.0; 3]);
        assert_eq!(s.sphere().centre(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_position_is_relative_to_focus() {
        let mut s = system();
        s.set_particle_position([0.1, -0.2, -0.3]);
        assert_eq!(s.particle_position(), [0.1, -0.2, -0.3]);
        let c = s.sphere().centre();
        assert_abs_diff_eq!(c[0], 0.1);
        assert_abs_diff_eq!(c[1], -0.2);
        assert_abs_diff_eq!(c[2], 0.7, epsilon = 1e-15);
    }

    #[test]
    fn test_setters_validate() {
        let mut s = system();
        assert!(s.set_particle_index(0.0).is_err());
        assert!(s.set_particle_radius(-1.0).is_err());
        assert_abs_diff_eq!(s.sphere().relative_index(), 1.2);
        s.set_particle_index(1.5).unwrap();
        assert_abs_diff_eq!(s.sphere().relative_index(), 1.5);
        assert!(OpticalSystem::new(0.0, 1.2, *s.lens(), Arc::new(UniformBeam::new(Polarisation::X).unwrap())).is_err());
    }

    #[test]
    fn test_force_at_matches_stateful_integration() {
        let mut s = system();
        let grid = s.aperture_grid(30, 30).unwrap();
        let position = [0.0, 0.005, 0.002];
        let stateless = s.force_at(position, &grid).unwrap();
        assert_eq!(s.particle_position(), [0.0; 3]);

        s.set_particle_position(position);
        let stateful = s.integrate(30, 30).unwrap();
        assert_eq!(stateless, stateful);
    }

    #[test]
    fn test_debug_names_beam() {
        assert!(format!("{:?}", system()).contains("uniform"));
    }
}
