//! Material

use crate::interaction::*;
use crate::reflection::*;
use std::sync::Arc;

/// Light transport mode enumeration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransportMode {
    /// Paths carry radiance from lights towards the camera.
    Radiance,

    /// Paths carry importance from the camera towards lights.
    Importance,
}

/// Material interface.
pub trait Material {
    /// Returns the BSDF at a surface point.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode.
    fn compute_scattering_functions(&self, si: &SurfaceInteraction, mode: TransportMode) -> BSDF;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
