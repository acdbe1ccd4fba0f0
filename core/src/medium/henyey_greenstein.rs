//! Henyey-Greenstein

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;

/// Models scattering properties in volumetric media.
#[derive(Clone, Debug)]
pub enum PhaseFunction {
    /// Henyey-Greenstein phase function.
    HenyeyGreenstein(HenyeyGreenstein),
}

impl PhaseFunction {
    /// Returns the value of the phase function for the given pair of directions.
    /// The value is also the PDF of `sample_p()`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Self::HenyeyGreenstein(f) => f.p(wo, wi),
        }
    }

    /// Returns the phase function value and sampled incident direction given
    /// the outgoing direction and a sample value in [0, 1)^2.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> (Float, Vector3f) {
        match self {
            Self::HenyeyGreenstein(f) => f.sample_p(wo, u),
        }
    }
}

impl fmt::Display for PhaseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HenyeyGreenstein(h) => write!(f, "[PhaseFunction HenyeyGreenstein g={}]", h.g),
        }
    }
}

/// Henyey-Greenstein phase function.
#[derive(Copy, Clone, Debug)]
pub struct HenyeyGreenstein {
    /// The asymmetry parameter. Isotropic phase functions use g = 0.
    pub g: Float,
}

impl HenyeyGreenstein {
    /// Returns a new `HenyeyGreenstein`.
    ///
    /// * `g` - The asymmetry parameter.
    pub fn new(g: Float) -> Self {
        Self { g }
    }

    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        phase_hg(wo.dot(wi), self.g)
    }

    /// Returns the phase function value and sampled incident direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> (Float, Vector3f) {
        // Compute cos(theta) for Henyey-Greenstein sample.
        let cos_theta = if abs(self.g) < 1e-3 {
            1.0 - 2.0 * u[0]
        } else {
            let sqr_term = (1.0 - self.g * self.g) / (1.0 + self.g - 2.0 * self.g * u[0]);
            -(1.0 + self.g * self.g - sqr_term * sqr_term) / (2.0 * self.g)
        };

        // Compute direction `wi` for Henyey-Greenstein sample.
        let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
        let phi = TWO_PI * u[1];

        let (v1, v2) = coordinate_system(wo);
        let wi = spherical_direction_in_coord_frame(sin_theta, cos_theta, phi, &v1, &v2, wo);
        (phase_hg(cos_theta, self.g), wi)
    }
}

/// Computes the Henyey-Greenstein phase function.
///
/// * `cos_theta` - Cosine of the angle between the two directions.
/// * `g`         - Asymmetry parameter.
#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}
