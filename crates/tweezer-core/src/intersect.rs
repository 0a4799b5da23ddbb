//! Ray–sphere intersection geometry.
//!
//! For a ray through $\mathbf{o}$ with unit direction $\hat{\mathbf{l}}$ and a
//! sphere of radius $R$ centred at $\mathbf{c}$, the line meets the sphere when
//! the discriminant
//!
//! $$D = (\hat{\mathbf{l}} \cdot \mathbf{oc})^2 - \mathbf{oc} \cdot \mathbf{oc} + R^2
//!     = R^2 - |\mathbf{oc}_\perp|^2, \qquad \mathbf{oc} = \mathbf{o} - \mathbf{c}$$
//!
//! is non-negative. The incidence angle follows from the outward normal at the
//! intersection point $\mathbf{x} = \mathbf{o} + d\,\hat{\mathbf{l}}$ with
//! $d = -\hat{\mathbf{l}} \cdot \mathbf{oc} + \sqrt{D}$. Both roots give the same
//! angle on a sphere, so only one is evaluated.
//!
//! All quantities are computed for the whole batch at once.

use ndarray::{aview1, Array1, Array2, ArrayView2, Axis, Zip};

use crate::error::{require_positive, OpticsError};

/// Largest excess of $|\cos\theta|$ over 1 that is attributed to rounding and
/// clamped. Anything larger is reported as a domain error.
pub const COSINE_CLAMP_TOLERANCE: f64 = 1e-8;

/// Intersection geometry of a ray batch with one sphere.
#[derive(Debug, Clone)]
pub struct Intersection {
    /// Unit propagation directions, shape (N, 3).
    pub directions: Array2<f64>,
    /// Component of `origin - centre` orthogonal to each direction, shape (N, 3).
    pub perpendicular: Array2<f64>,
    /// Incidence angle in $[0, \pi/2]$, or NaN where the ray misses.
    pub incidence: Array1<f64>,
}

impl Intersection {
    /// Whether ray `i` meets the sphere.
    pub fn hits(&self, i: usize) -> bool {
        !self.incidence[i].is_nan()
    }

    /// Number of rays that meet the sphere.
    pub fn hit_count(&self) -> usize {
        self.incidence.iter().filter(|a| !a.is_nan()).count()
    }
}

/// Row-wise dot product of two (N, 3) arrays.
pub(crate) fn row_dot(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array1<f64> {
    (&a * &b).sum_axis(Axis(1))
}

/// Normalise every row of an (N, 3) array. Zero rows are rejected.
pub(crate) fn normalise_rows(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, OpticsError> {
    let norms = row_dot(a, a).mapv(f64::sqrt);
    if let Some(&bad) = norms.iter().find(|n| **n <= 0.0 || !n.is_finite()) {
        return Err(OpticsError::Domain {
            quantity: "ray direction norm",
            value: bad,
        });
    }
    Ok(&a / &norms.insert_axis(Axis(1)))
}

/// Incidence angles of a batch of rays on a sphere.
///
/// # Arguments
/// * `origins` - A point on each ray, shape (N, 3).
/// * `directions` - Ray directions, shape (N, 3); normalised internally.
/// * `centre` - Sphere centre.
/// * `radius` - Sphere radius.
///
/// # Returns
/// One angle per ray in $[0, \pi/2]$, NaN for rays that miss the sphere.
pub fn intersect(
    origins: ArrayView2<'_, f64>,
    directions: ArrayView2<'_, f64>,
    centre: [f64; 3],
    radius: f64,
) -> Result<Array1<f64>, OpticsError> {
    Ok(trace(origins, directions, centre, radius)?.incidence)
}

/// Full intersection geometry, shared with the force model.
pub fn trace(
    origins: ArrayView2<'_, f64>,
    directions: ArrayView2<'_, f64>,
    centre: [f64; 3],
    radius: f64,
) -> Result<Intersection, OpticsError> {
    require_positive("radius", radius)?;
    if origins.ncols() != 3 || directions.dim() != origins.dim() {
        return Err(OpticsError::Shape(format!(
            "origins {:?} and directions {:?} must both be (N, 3)",
            origins.dim(),
            directions.dim()
        )));
    }

    let unit = normalise_rows(directions)?;
    let offsets = &origins - &aview1(&centre);

    // Projection of the offset on the ray, and the part orthogonal to it.
    let along = row_dot(unit.view(), offsets.view());
    let perpendicular = &offsets - &(&unit * &along.view().insert_axis(Axis(1)));

    // Evaluated as R^2 - |oc_perp|^2 to avoid cancelling two large squares
    // when the origin is far from a small sphere.
    let discriminant = row_dot(perpendicular.view(), perpendicular.view())
        .mapv(|p2| radius * radius - p2);

    let distance = Zip::from(&along)
        .and(&discriminant)
        .map_collect(|&b, &disc| if disc < 0.0 { f64::NAN } else { -b + disc.sqrt() });

    // Outward normal (unnormalised, length R) at the intersection point.
    let normals = &offsets + &(&unit * &distance.view().insert_axis(Axis(1)));
    let cosines = row_dot(unit.view(), normals.view()).mapv(|c| (c / radius).abs());

    if let Some(&bad) = cosines.iter().find(|&&c| c > 1.0 + COSINE_CLAMP_TOLERANCE) {
        return Err(OpticsError::Domain {
            quantity: "incidence cosine",
            value: bad,
        });
    }

    let incidence = Zip::from(&cosines)
        .and(&discriminant)
        .map_collect(|&c, &disc| if disc < 0.0 { f64::NAN } else { c.min(1.0).acos() });

    Ok(Intersection {
        directions: unit,
        perpendicular,
        incidence,
    })
}
