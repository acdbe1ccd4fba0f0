//! BxDF Sample

use super::*;

/// Stores the result of sampling a BxDF or BSDF.
#[derive(Copy, Clone, Default)]
pub struct BxDFSample {
    /// The sampled function value.
    pub f: Spectrum,

    /// The probability density of the sampled direction.
    pub pdf: Float,

    /// The sampled incident direction.
    pub wi: Vector3f,

    /// The type of the BxDF that was sampled.
    pub bxdf_type: BxDFType,
}

impl BxDFSample {
    /// Create a new `BxDFSample`.
    ///
    /// * `f`         - The sampled function value.
    /// * `pdf`       - The probability density of the sampled direction.
    /// * `wi`        - The sampled incident direction.
    /// * `bxdf_type` - The type of the BxDF that was sampled.
    pub fn new(f: Spectrum, pdf: Float, wi: Vector3f, bxdf_type: BxDFType) -> Self {
        Self {
            f,
            pdf,
            wi,
            bxdf_type,
        }
    }
}

impl From<BxDFType> for BxDFSample {
    /// Returns a zero sample of the given type.
    ///
    /// * `sampled_type` - The sampled BxDF type.
    fn from(sampled_type: BxDFType) -> Self {
        Self::new(Spectrum::ZERO, 0.0, Vector3f::ZERO, sampled_type)
    }
}
