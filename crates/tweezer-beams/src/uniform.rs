//! Uniformly filled aperture.

use crate::polarisation::Polarisation;
use crate::profile::{inside_aperture, BeamError, BeamProfile, BeamSample};

/// Constant intensity $1/(\pi R^2)$ across the whole aperture.
///
/// This is the overfilled-objective limit used in Ashkin's original
/// ray-optics calculations.
#[derive(Debug, Clone)]
pub struct UniformBeam {
    polarisation: Polarisation,
}

impl UniformBeam {
    pub fn new(polarisation: Polarisation) -> Result<Self, BeamError> {
        polarisation.validate()?;
        Ok(Self { polarisation })
    }

    pub fn polarisation(&self) -> Polarisation {
        self.polarisation
    }
}

impl BeamProfile for UniformBeam {
    fn name(&self) -> &str {
        "uniform"
    }

    fn sample(&self, r: f64, theta: f64, lens_radius: f64) -> Result<BeamSample, BeamError> {
        let intensity = if inside_aperture(r, lens_radius)? {
            1.0 / (std::f64::consts::PI * lens_radius * lens_radius)
        } else {
            0.0
        };
        Ok(BeamSample {
            intensity,
            polarisation: self.polarisation.jones_at(theta),
        })
    }
}
