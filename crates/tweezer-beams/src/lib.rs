//! # Tweezer Beams
//!
//! Intensity and polarisation profiles of the beam filling a focusing lens.
//! Every profile implements the [`BeamProfile`](profile::BeamProfile) trait,
//! which maps a point of the lens aperture in polar coordinates to a relative
//! intensity and a lab-frame Jones vector.
//!
//! ## Available profiles
//!
//! | Profile | Module | Intensity |
//! |---------|--------|-----------|
//! | Uniform fill | [`uniform`] | $1 / (\pi R^2)$ |
//! | Truncated Gaussian | [`gaussian`] | $I_0 e^{-2 r^2 / a^2}$ |
//!
//! ## Normalisation
//!
//! All profiles are normalised so that the power passing through the lens
//! aperture is unity, $\int_0^{2\pi}\int_0^R I(r, \theta)\, r\, dr\, d\theta = 1$.
//! Forces computed downstream are therefore dimensionless Q-factors.

pub mod gaussian;
pub mod polarisation;
pub mod profile;
pub mod uniform;

pub use gaussian::GaussianBeam;
pub use polarisation::{JonesVector, Polarisation};
pub use profile::{BeamError, BeamProfile, BeamSample};
pub use uniform::UniformBeam;
