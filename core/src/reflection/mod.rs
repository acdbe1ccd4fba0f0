//! Reflection and surface scattering models

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;

mod bsdf;
mod bxdf_sample;
mod bxdf_type;
mod fresnel;
mod lambertian_reflection;
mod specular_reflection;

// Re-export
pub use bsdf::*;
pub use bxdf_sample::*;
pub use bxdf_type::*;
pub use fresnel::*;
pub use lambertian_reflection::*;
pub use specular_reflection::*;

/// BxDF models. Directions are expressed in the local shading coordinate
/// system where the shading normal is the z-axis.
#[derive(Clone, Debug)]
pub enum BxDF {
    LambertianReflection(LambertianReflection),
    SpecularReflection(SpecularReflection),
}

impl BxDF {
    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        match self {
            Self::LambertianReflection(bxdf) => bxdf.get_type(),
            Self::SpecularReflection(bxdf) => bxdf.get_type(),
        }
    }

    /// Returns true if all of the BxDF's type flags are contained in `t`.
    ///
    /// * `t` - The flags to match.
    pub fn matches_flags(&self, t: BxDFType) -> bool {
        t.contains(self.get_type())
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            Self::LambertianReflection(bxdf) => bxdf.f(wo, wi),
            Self::SpecularReflection(bxdf) => bxdf.f(wo, wi),
        }
    }

    /// Samples an incident direction for a given outgoing direction. Models
    /// without their own sampling routine cosine-sample the hemisphere.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        match self {
            Self::SpecularReflection(bxdf) => bxdf.sample_f(wo, u),
            _ => {
                // Cosine-sample the hemisphere, flipping the direction if necessary.
                let mut wi = cosine_sample_hemisphere(u);
                if wo.z < 0.0 {
                    wi.z *= -1.0;
                }
                let pdf = self.pdf(wo, &wi);
                BxDFSample::new(self.f(wo, &wi), pdf, wi, self.get_type())
            }
        }
    }

    /// Evaluates the PDF of `sample_f()` for the given pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Self::SpecularReflection(bxdf) => bxdf.pdf(wo, wi),
            _ => {
                if same_hemisphere(wo, wi) {
                    abs_cos_theta(wi) * INV_PI
                } else {
                    0.0
                }
            }
        }
    }
}

/// Returns cos(θ) of a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns |cos(θ)| of a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns true if two directions lie in the same hemisphere of the shading
/// coordinate system.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}
