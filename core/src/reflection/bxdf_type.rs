//! BxDF Type

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Stores combination of flags for the BxDF types.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct BxDFType: u8 {
        const BSDF_REFLECTION = 0b00000001;
        const BSDF_TRANSMISSION = 0b00000010;
        const BSDF_DIFFUSE = 0b00000100;
        const BSDF_GLOSSY = 0b00001000;
        const BSDF_SPECULAR = 0b00010000;
        const BSDF_ALL = 0b00011111;
    }
}

impl BxDFType {
    /// Returns all flags except `BSDF_SPECULAR`. BxDFs matching these can be
    /// evaluated for an arbitrary pair of directions.
    pub fn non_specular() -> Self {
        Self::BSDF_ALL - Self::BSDF_SPECULAR
    }

    /// Tests a single flag and returns whether it is set or not.
    ///
    /// * `flag` - The flag to test.
    pub fn matches(&self, flag: Self) -> bool {
        self.bits() & flag.bits() > 0
    }
}

impl fmt::Display for BxDFType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#07b}", self.bits())
    }
}
