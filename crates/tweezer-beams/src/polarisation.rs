//! Jones-vector polarisation states over the lens aperture.
//!
//! Polarisation is carried as a complex three-component Jones vector in the
//! lab frame. Rays leave the lens plane travelling roughly along $+z$, so only
//! the $x$ and $y$ components are populated here; the force model projects
//! the full vector onto each ray's own plane of incidence.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::profile::BeamError;

/// Lab-frame Jones vector $(E_x, E_y, E_z)$.
pub type JonesVector = [Complex64; 3];

/// Polarisation state of the beam entering the lens.
///
/// Deserialises from kebab-case names (`"x"`, `"circular-left"`, `"radial"`,
/// ...) or from a table `{ jones = [[re, im], [re, im]] }` for an arbitrary
/// spatially uniform state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarisation {
    /// Linear, along $x$.
    #[default]
    X,
    /// Linear, along $y$.
    Y,
    /// $(1, i)/\sqrt{2}$.
    CircularLeft,
    /// $(1, -i)/\sqrt{2}$.
    CircularRight,
    /// Arbitrary spatially uniform transverse state $(E_x, E_y)$.
    Jones([Complex64; 2]),
    /// Field points away from the optical axis: $(\cos\theta, \sin\theta, 0)$.
    Radial,
    /// Field circulates around the optical axis: $(-\sin\theta, \cos\theta, 0)$.
    Azimuthal,
}

impl Polarisation {
    /// Check that the state describes a nonzero field.
    pub fn validate(&self) -> Result<(), BeamError> {
        if let Polarisation::Jones([ex, ey]) = self {
            let norm_sq = ex.norm_sqr() + ey.norm_sqr();
            if norm_sq <= 0.0 || !norm_sq.is_finite() {
                return Err(BeamError::ZeroPolarisation);
            }
        }
        Ok(())
    }

    /// Jones vector at azimuthal aperture angle `theta`.
    pub fn jones_at(&self, theta: f64) -> JonesVector {
        let zero = Complex64::new(0.0, 0.0);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        match *self {
            Polarisation::X => [Complex64::new(1.0, 0.0), zero, zero],
            Polarisation::Y => [zero, Complex64::new(1.0, 0.0), zero],
            Polarisation::CircularLeft => [Complex64::new(s, 0.0), Complex64::new(0.0, s), zero],
            Polarisation::CircularRight => [Complex64::new(s, 0.0), Complex64::new(0.0, -s), zero],
            Polarisation::Jones([ex, ey]) => [ex, ey, zero],
            Polarisation::Radial => [
                Complex64::new(theta.cos(), 0.0),
                Complex64::new(theta.sin(), 0.0),
                zero,
            ],
            Polarisation::Azimuthal => [
                Complex64::new(-theta.sin(), 0.0),
                Complex64::new(theta.cos(), 0.0),
                zero,
            ],
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        match self {
            Polarisation::X => "linear-x".into(),
            Polarisation::Y => "linear-y".into(),
            Polarisation::CircularLeft => "circular-left".into(),
            Polarisation::CircularRight => "circular-right".into(),
            Polarisation::Jones([ex, ey]) => format!("jones({}, {})", ex, ey),
            Polarisation::Radial => "radial".into(),
            Polarisation::Azimuthal => "azimuthal".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn power(j: &JonesVector) -> f64 {
        j.iter().map(|c| c.norm_sqr()).sum()
    }

    #[test]
    fn test_named_states_have_unit_power() {
        for pol in [
            Polarisation::X,
            Polarisation::Y,
            Polarisation::CircularLeft,
            Polarisation::CircularRight,
            Polarisation::Radial,
            Polarisation::Azimuthal,
        ] {
            for theta in [0.0, 0.3, FRAC_PI_2, 4.0] {
                assert_abs_diff_eq!(power(&pol.jones_at(theta)), 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_radial_and_azimuthal_are_orthogonal() {
        let theta = 0.7;
        let r = Polarisation::Radial.jones_at(theta);
        let a = Polarisation::Azimuthal.jones_at(theta);
        let dot: Complex64 = r.iter().zip(a.iter()).map(|(x, y)| x * y.conj()).sum();
        assert_abs_diff_eq!(dot.norm(), 0.0, epsilon = 1e-15);

        let at_quarter = Polarisation::Radial.jones_at(FRAC_PI_2);
        assert_abs_diff_eq!(at_quarter[0].re, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(at_quarter[1].re, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_jones_rejected() {
        let zero = Complex64::new(0.0, 0.0);
        assert!(Polarisation::Jones([zero, zero]).validate().is_err());
        assert!(Polarisation::Jones([Complex64::new(0.0, 1.0), zero]).validate().is_ok());
        assert!(Polarisation::Radial.validate().is_ok());
    }

    #[derive(Deserialize)]
    struct Wrapper {
        polarisation: Polarisation,
    }

    #[test]
    fn test_deserialise_named_and_jones() {
        let w: Wrapper = serde_json::from_str(r#"{"polarisation": "circular-left"}"#).unwrap();
        assert_eq!(w.polarisation, Polarisation::CircularLeft);

        let w: Wrapper =
            serde_json::from_str(r#"{"polarisation": {"jones": [[1.0, 0.0], [0.0, 1.0]]}}"#)
                .unwrap();
        assert_eq!(
            w.polarisation,
            Polarisation::Jones([Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)])
        );
    }
}
