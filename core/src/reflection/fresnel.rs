//! Fresnel

use crate::pbrt::*;
use crate::spectrum::*;
use std::mem::swap;

/// Fresnel reflectance models.
#[derive(Clone, Debug)]
pub enum Fresnel {
    /// Reflects all incident light.
    NoOp,

    /// Dielectric interface between two indices of refraction.
    Dielectric(FresnelDielectric),
}

impl Fresnel {
    /// Returns the amount of reflected light.
    ///
    /// * `cos_theta_i` - Cosine of the incident angle.
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Self::NoOp => Spectrum::ONE,
            Self::Dielectric(f) => Spectrum::new(fr_dielectric(cos_theta_i, f.eta_i, f.eta_t)),
        }
    }
}

/// Fresnel interface for dielectric materials.
#[derive(Copy, Clone, Debug)]
pub struct FresnelDielectric {
    /// Index of refraction of the outside medium.
    pub eta_i: Float,

    /// Index of refraction of the inside medium.
    pub eta_t: Float,
}

impl FresnelDielectric {
    /// Create a new `FresnelDielectric`.
    ///
    /// * `eta_i` - Index of refraction of the outside medium.
    /// * `eta_t` - Index of refraction of the inside medium.
    pub fn new(eta_i: Float, eta_t: Float) -> Self {
        Self { eta_i, eta_t }
    }
}

/// Returns the fresnel reflection for dielectric materials and unpolarized light.
///
/// * `cos_theta_i` - cos(θi) for angle between incident direction and geometric
///                   surface normal.
/// * `eta_i`       - index of refraction for medium that incident ray is in.
/// * `eta_t`       - index of refraction for medium that incident ray is entering.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let mut eta_i = eta_i;
    let mut eta_t = eta_t;

    // Potentially swap indices of refraction.
    if cos_theta_i <= 0.0 {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = abs(cos_theta_i);
    }

    // Compute cos(θt) using Snell's law.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t)) / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t)) / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn normal_incidence_on_glass() {
        // ((1.5 - 1) / (1.5 + 1))^2
        assert!(approx_eq!(f32, fr_dielectric(1.0, 1.0, 1.5), 0.04, epsilon = 0.0001));
        assert_eq!(Fresnel::NoOp.evaluate(0.3), Spectrum::ONE);
    }
}
