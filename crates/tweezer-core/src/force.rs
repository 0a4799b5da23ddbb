//! Per-ray radiation force in the Ashkin (1992) ray-optics model.
//!
//! A ray of unit power hitting the sphere at incidence angle $\theta$, with
//! refraction angle $r$ and Fresnel coefficients $R$, $T$, transfers momentum
//! along two directions: the ray direction (scattering force)
//!
//! $$F_s = 1 + R\cos 2\theta - T^2\,\frac{\cos(2\theta - 2r) + R\cos 2\theta}{1 + R^2 + 2R\cos 2r}$$
//!
//! and the direction orthogonal to it in the plane of incidence (gradient force)
//!
//! $$F_g = R\sin 2\theta - T^2\,\frac{\sin(2\theta - 2r) + R\sin 2\theta}{1 + R^2 + 2R\cos 2r}.$$
//!
//! The total is $\mathbf{F} = F_s\,\hat{\mathbf{s}} - F_g\,\hat{\mathbf{g}}$, where
//! $\hat{\mathbf{g}}$ points from the sphere centre towards the ray.
//!
//! # Reference
//! A. Ashkin, *Biophys. J.* **61**, 569 (1992).

use ndarray::{aview1, Array1, Array2, ArrayView2, Axis, Zip};
use num_complex::Complex64;
use serde::Serialize;

use crate::error::OpticsError;
use crate::intersect::{self, row_dot};
use crate::refraction::{self, fresnel_batch, snell_batch};
use crate::types::{RayBatch, Sphere};

/// Largest excess of $P_p$ over 1 that is attributed to rounding and clamped.
pub const P_FRACTION_CLAMP_TOLERANCE: f64 = 1e-7;

/// Relative size below which the centre-to-ray offset is treated as zero,
/// i.e. the ray passes through the sphere centre.
pub const GRADIENT_DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Scattering and gradient efficiencies of a single ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RayEfficiency {
    /// Incidence angle (rad).
    pub incidence: f64,
    /// Scattering Q-factor $F_s$, along the ray.
    pub scattering: f64,
    /// Gradient Q-factor $F_g$, transverse to the ray.
    pub gradient: f64,
}

impl RayEfficiency {
    /// Magnitude of the total Q-factor.
    pub fn magnitude(&self) -> f64 {
        self.scattering.hypot(self.gradient)
    }
}

/// Ashkin's $(F_s, F_g)$ from the interface coefficients.
fn ashkin_components(theta: f64, refracted: f64, transmittance: f64, reflectance: f64) -> (f64, f64) {
    let (two_theta, two_r) = (2.0 * theta, 2.0 * refracted);

    // Under total reflection T = 0 and the series denominator can vanish.
    let (ts, tg) = if transmittance == 0.0 {
        (0.0, 0.0)
    } else {
        let weight = transmittance * transmittance
            / (1.0 + reflectance * reflectance + 2.0 * reflectance * two_r.cos());
        (
            weight * ((two_theta - two_r).cos() + reflectance * two_theta.cos()),
            weight * ((two_theta - two_r).sin() + reflectance * two_theta.sin()),
        )
    };

    (
        1.0 + reflectance * two_theta.cos() - ts,
        reflectance * two_theta.sin() - tg,
    )
}

/// Q-factors of one ray at incidence angle `theta`.
///
/// # Arguments
/// * `theta` - Incidence angle in $[0, \pi/2]$.
/// * `relative_index` - Particle index divided by medium index.
/// * `p_fraction` - Fraction of the ray power polarised in the plane of incidence.
pub fn ashkin_efficiencies(
    theta: f64,
    relative_index: f64,
    p_fraction: f64,
) -> Result<RayEfficiency, OpticsError> {
    let r = refraction::snell(theta, relative_index)?;
    let f = refraction::fresnel(theta, r, p_fraction, relative_index)?;
    let (scattering, gradient) = ashkin_components(theta, r, f.transmittance, f.reflectance);
    Ok(RayEfficiency {
        incidence: theta,
        scattering,
        gradient,
    })
}

/// Unit gradient directions from the perpendicular offsets, zero where the
/// ray passes through the centre.
fn gradient_directions(perpendicular: ArrayView2<'_, f64>, offsets_norm: &Array1<f64>) -> Array2<f64> {
    let norms = row_dot(perpendicular, perpendicular).mapv(f64::sqrt);
    let scale = Zip::from(&norms)
        .and(offsets_norm)
        .map_collect(|&n, &o| {
            if n <= GRADIENT_DEGENERACY_TOLERANCE * o || n == 0.0 {
                0.0
            } else {
                1.0 / n
            }
        });
    &perpendicular * &scale.insert_axis(Axis(1))
}

/// Squared modulus of the complex projection of each Jones vector on a real
/// direction.
fn projected_power(polarisations: ArrayView2<'_, Complex64>, directions: ArrayView2<'_, f64>) -> Array1<f64> {
    (&polarisations * &directions.mapv(Complex64::from))
        .sum_axis(Axis(1))
        .mapv(|c| c.norm_sqr())
}

/// Fraction of power polarised in each ray's plane of incidence.
///
/// $P_p = (|\mathbf{p}\cdot\hat{\mathbf{g}}|^2 + |\mathbf{p}\cdot\hat{\mathbf{s}}|^2)
///  / (\mathbf{p}\cdot\bar{\mathbf{p}})$, clamped to 1 within
/// [`P_FRACTION_CLAMP_TOLERANCE`]. Rays that miss the sphere get NaN.
fn p_fractions(
    polarisations: ArrayView2<'_, Complex64>,
    scattering: ArrayView2<'_, f64>,
    gradient: ArrayView2<'_, f64>,
    incidence: &Array1<f64>,
) -> Result<Array1<f64>, OpticsError> {
    let total = polarisations.mapv(|c| c.norm_sqr()).sum_axis(Axis(1));
    let in_plane = projected_power(polarisations, gradient) + projected_power(polarisations, scattering);

    let bad_norm = incidence
        .iter()
        .zip(total.iter())
        .find(|&(theta, &norm)| !theta.is_nan() && (norm <= 0.0 || !norm.is_finite()));
    if let Some((_, norm)) = bad_norm {
        return Err(OpticsError::Domain {
            quantity: "polarisation norm",
            value: norm.sqrt(),
        });
    }

    let pp = Zip::from(incidence)
        .and(&in_plane)
        .and(&total)
        .map_collect(|&theta, &in_plane, &total| {
            let raw = in_plane / total;
            if theta.is_nan() {
                f64::NAN
            } else if raw > 1.0 && raw - 1.0 <= P_FRACTION_CLAMP_TOLERANCE {
                1.0
            } else {
                raw
            }
        });
    Ok(pp)
}

/// Force on the sphere from every ray in the batch.
///
/// The ray weights are ignored here; see [`crate::integrator`] for the
/// weighted aggregate.
///
/// # Returns
/// An (N, 3) array of per-ray Q-factor vectors. Rays that miss the sphere
/// contribute exactly zero.
pub fn ray_forces(batch: &RayBatch, sphere: &Sphere) -> Result<Array2<f64>, OpticsError> {
    let geometry = intersect::trace(
        batch.origins.view(),
        batch.directions.view(),
        sphere.centre(),
        sphere.radius(),
    )?;
    let nr = sphere.relative_index();

    let offsets_norm = {
        let offsets = &batch.origins - &aview1(&sphere.centre());
        row_dot(offsets.view(), offsets.view()).mapv(f64::sqrt)
    };
    let scattering_dir = &geometry.directions;
    let gradient_dir = gradient_directions(geometry.perpendicular.view(), &offsets_norm);

    let refracted = snell_batch(geometry.incidence.view(), nr)?;
    let pp = p_fractions(
        batch.polarisations.view(),
        scattering_dir.view(),
        gradient_dir.view(),
        &geometry.incidence,
    )?;
    let (transmitted, reflected) =
        fresnel_batch(geometry.incidence.view(), refracted.view(), pp.view(), nr)?;

    let mut fs = Array1::<f64>::zeros(batch.len());
    let mut fg = Array1::<f64>::zeros(batch.len());
    Zip::from(&mut fs)
        .and(&mut fg)
        .and(&geometry.incidence)
        .and(&refracted)
        .and(&transmitted)
        .and(&reflected)
        .for_each(|fs, fg, &theta, &r, &t, &rf| {
            // Misses keep zero magnitudes instead of the NaN sentinel.
            if !theta.is_nan() {
                let (s, g) = ashkin_components(theta, r, t, rf);
                *fs = s;
                *fg = g;
            }
        });

    let forces = scattering_dir * &fs.insert_axis(Axis(1)) - &gradient_dir * &fg.insert_axis(Axis(1));

    if let Some(&bad) = forces.iter().find(|v| !v.is_finite()) {
        return Err(OpticsError::Domain {
            quantity: "ray force component",
            value: bad,
        });
    }

    log::trace!(
        "ray_forces: {} rays, {} hits, n_r = {}",
        batch.len(),
        geometry.hit_count(),
        nr
    );

    Ok(forces)
}
