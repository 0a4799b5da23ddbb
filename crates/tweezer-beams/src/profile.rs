//! Beam profile trait.
//!
//! A [`BeamProfile`] is the strategy that tells the integrator how much light
//! enters the system through each point of the lens aperture and how that
//! light is polarised. Profile parameters (beam width, polarisation mode)
//! are fixed when the profile is constructed.

use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use thiserror::Error;

use crate::polarisation::JonesVector;

/// Errors from beam profiles.
#[derive(Debug, Error)]
pub enum BeamError {
    #[error("Invalid beam parameter '{name}': {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Polarisation vector has zero norm")]
    ZeroPolarisation,

    #[error("Radial coordinate {0} is negative")]
    NegativeRadius(f64),

    #[error("Coordinate arrays differ in length: {radial} radial vs {azimuthal} azimuthal")]
    LengthMismatch { radial: usize, azimuthal: usize },
}

/// Intensity and polarisation of the beam at one aperture point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSample {
    /// Intensity per unit aperture area, normalised to unit aperture power.
    pub intensity: f64,
    /// Lab-frame Jones vector (only the transverse components are generally nonzero).
    pub polarisation: JonesVector,
}

/// Provides the beam intensity and polarisation over the lens aperture.
///
/// Implementations must satisfy the power normalisation
/// $\int_0^{2\pi}\int_0^R I(r, \theta)\, r\, dr\, d\theta = 1$
/// for any positive lens radius $R$, accounting for the truncation of an
/// unbounded beam by the finite aperture. Points outside the aperture
/// (`r > lens_radius`) are blocked and carry zero intensity.
pub trait BeamProfile: Send + Sync {
    /// Short identifier used in logs and output headers.
    fn name(&self) -> &str;

    /// Sample the beam at polar aperture coordinates `(r, theta)`.
    fn sample(&self, r: f64, theta: f64, lens_radius: f64) -> Result<BeamSample, BeamError>;

    /// Sample the beam at many aperture points at once.
    ///
    /// Returns the intensities (length N) and the Jones vectors as an
    /// `N × 3` complex array, in the order of the input coordinates.
    fn sample_grid(
        &self,
        r: ArrayView1<'_, f64>,
        theta: ArrayView1<'_, f64>,
        lens_radius: f64,
    ) -> Result<(Array1<f64>, Array2<Complex64>), BeamError> {
        if r.len() != theta.len() {
            return Err(BeamError::LengthMismatch {
                radial: r.len(),
                azimuthal: theta.len(),
            });
        }

        let n = r.len();
        let mut intensity = Array1::<f64>::zeros(n);
        let mut polarisation = Array2::<Complex64>::zeros((n, 3));

        for (i, (&ri, &ti)) in r.iter().zip(theta.iter()).enumerate() {
            let sample = self.sample(ri, ti, lens_radius)?;
            intensity[i] = sample.intensity;
            for (dst, src) in polarisation.row_mut(i).iter_mut().zip(sample.polarisation) {
                *dst = src;
            }
        }

        Ok((intensity, polarisation))
    }
}

/// Reject non-positive or non-finite scalar parameters.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, BeamError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(BeamError::InvalidParameter { name, value })
    }
}

/// Common checks on an aperture coordinate. Returns `false` when the point
/// lies outside the aperture.
pub(crate) fn inside_aperture(r: f64, lens_radius: f64) -> Result<bool, BeamError> {
    require_positive("lens_radius", lens_radius)?;
    if r < 0.0 {
        return Err(BeamError::NegativeRadius(r));
    }
    Ok(r <= lens_radius)
}
