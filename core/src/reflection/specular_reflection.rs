//! Specular Reflection

use super::*;

/// BxDF for physically plausible specular reflection using Fresnel
/// interface.
#[derive(Clone, Debug)]
pub struct SpecularReflection {
    /// BxDF type.
    bxdf_type: BxDFType,

    /// Fresnel interface.
    fresnel: Fresnel,

    /// Scale factor for the reflected colour.
    r: Spectrum,
}

impl SpecularReflection {
    /// Create a new `SpecularReflection`.
    ///
    /// * `r`       - Scale factor for the reflected colour.
    /// * `fresnel` - Fresnel interface.
    pub fn new(r: Spectrum, fresnel: Fresnel) -> Self {
        Self {
            bxdf_type: BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR,
            fresnel,
            r,
        }
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        self.bxdf_type
    }

    /// Returns zero since no scattering is returned for an arbitrary pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns the mirrored direction. The PDF of 1 stands for a delta
    /// distribution.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let f = self.fresnel.evaluate(cos_theta(&wi)) * self.r / abs_cos_theta(&wi);
        BxDFSample::new(f, 1.0, wi, self.bxdf_type)
    }

    /// Returns zero since the delta direction is never hit by chance.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0
    }
}
