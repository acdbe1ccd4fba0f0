//! Primitive

use crate::geometry::*;
use crate::interaction::*;
use std::sync::Arc;

/// Primitive interface between geometry and the rest of the renderer.
pub trait Primitive {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns the nearest intersection along the ray and updates its `t_max`
    /// to the intersection distance. The interaction carries the material and
    /// area light of the primitive that was hit.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction>;

    /// Returns `true` if the ray hits anything before its `t_max`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool;
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive + Send + Sync>;
