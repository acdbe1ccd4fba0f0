//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::material::*;
use crate::pbrt::*;
use crate::reflection::*;
use std::sync::Arc;

/// Shading geometry used for perturbed values.
#[derive(Clone, Default)]
pub struct Shading {
    /// Shading normal.
    pub n: Normal3f,

    /// Shading partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,
}

/// SurfaceInteraction represents geometry of a particular point on a surface.
#[derive(Clone, Default)]
pub struct SurfaceInteraction {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Shading geometry used for perturbed values.
    pub shading: Shading,

    /// The material of the primitive that was hit.
    pub material: Option<ArcMaterial>,

    /// Index of the area light in the scene's light list if the primitive is
    /// emissive.
    pub area_light: Option<usize>,

    /// The scattering function computed by the material.
    pub bsdf: Option<Arc<BSDF>>,
}

impl SurfaceInteraction {
    /// Create a new surface interaction. The shading geometry starts out
    /// equal to the true geometry.
    ///
    /// * `p`       - Point of interaction.
    /// * `p_error` - Floating point error for ray intersection points.
    /// * `uv`      - The uv coordinates from surface parametrization.
    /// * `wo`      - The negative ray direction.
    /// * `n`       - Surface normal.
    /// * `dpdu`    - Parametric partial derivative of the point ∂p/∂u.
    /// * `time`    - Time when interaction occurred.
    pub fn new(
        p: Point3f,
        p_error: Vector3f,
        uv: Point2f,
        wo: Vector3f,
        n: Normal3f,
        dpdu: Vector3f,
        time: Float,
    ) -> Self {
        Self {
            hit: Hit::new(p, time, p_error, wo, n, None),
            uv,
            dpdu,
            shading: Shading { n, dpdu },
            material: None,
            area_light: None,
            bsdf: None,
        }
    }

    /// Updates the shading geometry. The shading normal is flipped into the
    /// hemisphere of the geometric normal.
    ///
    /// * `ns`   - Shading normal.
    /// * `dpdu` - Shading partial derivative of the point ∂p/∂u.
    pub fn set_shading_geometry(&mut self, ns: Normal3f, dpdu: Vector3f) {
        self.shading.n = ns.normalize().face_forward(&self.hit.n);
        self.shading.dpdu = dpdu;
    }

    /// Computes the scattering function at the surface point using the
    /// primitive's material. Surfaces without a material get no BSDF and mark
    /// boundaries between media.
    ///
    /// * `mode` - Transport mode.
    pub fn compute_scattering_functions(&mut self, mode: TransportMode) {
        self.bsdf = self
            .material
            .as_ref()
            .map(|material| Arc::new(material.compute_scattering_functions(self, mode)));
    }
}
