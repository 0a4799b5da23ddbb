//! # Tweezer Core
//!
//! Ray-optics radiation force on a dielectric sphere near the focus of a
//! high-numerical-aperture lens, following Ashkin (1992). The beam filling
//! the lens is split into a polar grid of rays; every ray is traced to the
//! sphere, its reflection and refraction series is summed in closed form,
//! and the per-ray momentum transfer is integrated over the aperture.
//!
//! ## Pipeline
//!
//! [`intersect`] → [`refraction`] → [`force`] → [`integrator`], driven by the
//! [`OpticalSystem`] facade and the parallel [`sweep`] over particle positions.
//!
//! ## Modules
//!
//! - [`types`] — Sphere and ray batch data structures.
//! - [`intersect`] — Ray–sphere incidence angles.
//! - [`refraction`] — Snell's law and Fresnel coefficients.
//! - [`force`] — Ashkin scattering and gradient forces per ray.
//! - [`aperture`] — Polar quadrature grid over the lens.
//! - [`lens`] — Focal geometry and ray generation.
//! - [`integrator`] — Weighted sum of ray forces into one Q-factor vector.
//! - [`system`] — Particle, lens and beam held together.
//! - [`sweep`] — Force maps over position grids.
//!
//! ## Units
//!
//! Lengths are in any consistent unit. Forces are dimensionless trapping
//! efficiencies $Q = F c / (n_1 P)$ for unit aperture power.

pub mod aperture;
pub mod error;
pub mod force;
pub mod integrator;
pub mod intersect;
pub mod lens;
pub mod refraction;
pub mod sweep;
pub mod system;
pub mod types;

pub use aperture::ApertureGrid;
pub use error::OpticsError;
pub use force::{ashkin_efficiencies, ray_forces, RayEfficiency};
pub use integrator::{aperture_power, integrate_force};
pub use intersect::intersect;
pub use lens::Lens;
pub use refraction::{fresnel, snell, Fresnel};
pub use sweep::{sweep, ForceRecord, PositionAxis, PositionGrid};
pub use system::OpticalSystem;
pub use types::{RayBatch, Sphere};
