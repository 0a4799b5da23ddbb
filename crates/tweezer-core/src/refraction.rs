//! Snell refraction and polarisation-weighted Fresnel coefficients.
//!
//! Angles are measured from the surface normal and must lie in
//! $[0, \pi/2]$. The relative index $n_r$ is the particle index divided by the
//! medium index.

use std::f64::consts::FRAC_PI_2;

use ndarray::{Array1, ArrayView1, Zip};

use crate::error::OpticsError;

/// Power reflectance and transmittance at one interface crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fresnel {
    /// Transmitted power fraction $T = 1 - R$.
    pub transmittance: f64,
    /// Reflected power fraction $R$.
    pub reflectance: f64,
}

fn check_angle(quantity: &'static str, value: f64) -> Result<(), OpticsError> {
    if (0.0..=FRAC_PI_2).contains(&value) {
        Ok(())
    } else {
        Err(OpticsError::Domain { quantity, value })
    }
}

fn check_p_fraction(value: f64) -> Result<(), OpticsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(OpticsError::Domain {
            quantity: "p-polarised power fraction",
            value,
        })
    }
}

/// Whether a ray at incidence `theta` is totally internally reflected,
/// i.e. $\sin\theta / n_r \ge 1$ (only possible for $n_r < 1$).
fn is_totally_reflected(theta: f64, relative_index: f64) -> bool {
    theta.sin() / relative_index >= 1.0
}

/// Refraction angle for incidence angle `theta`.
///
/// Past the critical angle the refraction angle saturates at exactly $\pi/2$.
/// NaN (a missed ray) stays NaN.
fn refraction_angle(theta: f64, relative_index: f64) -> f64 {
    if is_totally_reflected(theta, relative_index) {
        FRAC_PI_2
    } else {
        (theta.sin() / relative_index).asin()
    }
}

fn reflectance(theta: f64, refracted: f64, p_fraction: f64, relative_index: f64) -> f64 {
    // cos(π/2) is not exactly zero, so the formulas would leave R just below 1.
    if is_totally_reflected(theta, relative_index) {
        return 1.0;
    }
    let (ci, cr) = (theta.cos(), refracted.cos());
    let rs = ((ci - relative_index * cr) / (ci + relative_index * cr)).powi(2);
    let rp = ((cr - relative_index * ci) / (cr + relative_index * ci)).powi(2);
    rs * (1.0 - p_fraction) + rp * p_fraction
}

/// Snell's law: $r = \arcsin(\sin\theta / n_r)$.
///
/// Fails if `theta` is outside $[0, \pi/2]$.
pub fn snell(theta: f64, relative_index: f64) -> Result<f64, OpticsError> {
    check_angle("incidence angle", theta)?;
    Ok(refraction_angle(theta, relative_index))
}

/// Fresnel power coefficients for partially p-polarised light.
///
/// $$R_s = \left(\frac{\cos\theta - n_r\cos r}{\cos\theta + n_r\cos r}\right)^2,\quad
///   R_p = \left(\frac{\cos r - n_r\cos\theta}{\cos r + n_r\cos\theta}\right)^2,$$
/// $$R = R_s (1 - P_p) + R_p P_p, \qquad T = 1 - R.$$
///
/// # Arguments
/// * `theta` - Incidence angle.
/// * `refracted` - Refraction angle, normally from [`snell`].
/// * `p_fraction` - Fraction $P_p \in [0, 1]$ of the power polarised in the plane of incidence.
/// * `relative_index` - Relative refractive index $n_r$.
pub fn fresnel(
    theta: f64,
    refracted: f64,
    p_fraction: f64,
    relative_index: f64,
) -> Result<Fresnel, OpticsError> {
    check_angle("incidence angle", theta)?;
    check_angle("refraction angle", refracted)?;
    check_p_fraction(p_fraction)?;

    let r = reflectance(theta, refracted, p_fraction, relative_index);
    Ok(Fresnel {
        transmittance: 1.0 - r,
        reflectance: r,
    })
}

/// [`snell`] applied to a whole batch. NaN entries (rays that missed) stay NaN.
pub fn snell_batch(
    theta: ArrayView1<'_, f64>,
    relative_index: f64,
) -> Result<Array1<f64>, OpticsError> {
    for &t in theta.iter().filter(|t| !t.is_nan()) {
        check_angle("incidence angle", t)?;
    }
    Ok(theta.mapv(|t| refraction_angle(t, relative_index)))
}

/// [`fresnel`] applied to a whole batch, returning `(T, R)` arrays.
///
/// Entries whose incidence angle is NaN stay NaN and are skipped by the domain
/// checks.
pub fn fresnel_batch(
    theta: ArrayView1<'_, f64>,
    refracted: ArrayView1<'_, f64>,
    p_fraction: ArrayView1<'_, f64>,
    relative_index: f64,
) -> Result<(Array1<f64>, Array1<f64>), OpticsError> {
    if refracted.len() != theta.len() || p_fraction.len() != theta.len() {
        return Err(OpticsError::Shape(format!(
            "fresnel inputs of lengths {}, {}, {}",
            theta.len(),
            refracted.len(),
            p_fraction.len()
        )));
    }

    for ((&t, &r), &pp) in theta.iter().zip(refracted.iter()).zip(p_fraction.iter()) {
        if t.is_nan() {
            continue;
        }
        check_angle("incidence angle", t)?;
        check_angle("refraction angle", r)?;
        check_p_fraction(pp)?;
    }

    let reflected = Zip::from(&theta)
        .and(&refracted)
        .and(&p_fraction)
        .map_collect(|&t, &r, &pp| reflectance(t, r, pp, relative_index));
    let transmitted = reflected.mapv(|r| 1.0 - r);

    Ok((transmitted, reflected))
}
