//! Common sampling functions.

use crate::geometry::*;
use crate::pbrt::*;

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let ux = 2.0 * u.x - 1.0;
    let uy = 2.0 * u.y - 1.0;

    // Handle degeneracy at the origin.
    if ux == 0.0 && uy == 0.0 {
        return Point2f::ZERO;
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(ux) > abs(uy) {
        (ux, PI_OVER_FOUR * (uy / ux))
    } else {
        (uy, PI_OVER_TWO - PI_OVER_FOUR * (ux / uy))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a direction on a hemisphere using cosine-weighted sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}
