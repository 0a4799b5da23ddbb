//! Error type for the force engine.

use thiserror::Error;
use tweezer_beams::BeamError;

/// Errors raised while configuring or evaluating an optical system.
///
/// Construction errors ([`InvalidParameter`](Self::InvalidParameter),
/// [`NumericalAperture`](Self::NumericalAperture), [`InvalidGrid`](Self::InvalidGrid))
/// are reported at the point of invalid input. [`Domain`](Self::Domain) errors
/// indicate geometry that should be impossible for valid inputs and are never
/// clamped away silently.
#[derive(Debug, Error)]
pub enum OpticsError {
    #[error("Invalid parameter '{name}': {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Numerical aperture {numerical_aperture} must lie in (0, {medium_index})")]
    NumericalAperture {
        numerical_aperture: f64,
        medium_index: f64,
    },

    #[error("Invalid aperture grid: {0}")]
    InvalidGrid(String),

    #[error("{quantity} = {value} is outside its valid domain")]
    Domain { quantity: &'static str, value: f64 },

    #[error("Ray batch shape mismatch: {0}")]
    Shape(String),

    #[error("Beam profile error: {0}")]
    Beam(#[from] BeamError),
}

/// Reject non-positive or non-finite scalar parameters.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, OpticsError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(OpticsError::InvalidParameter { name, value })
    }
}
