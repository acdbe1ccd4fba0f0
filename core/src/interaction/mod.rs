//! Interactions

use crate::geometry::*;
use crate::medium::*;
use crate::pbrt::*;

mod endpoint_interaction;
mod medium_interaction;
mod surface_interaction;

pub use endpoint_interaction::*;
pub use medium_interaction::*;
pub use surface_interaction::*;

/// Hit provides common data shared by all interaction kinds.
#[derive(Clone, Default)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// Floating point error for ray intersection points.
    pub p_error: Vector3f,

    /// The negative ray direction (outgoing direction used when computing
    /// lighting at points).
    pub wo: Vector3f,

    /// Surface normal at the point `p`. Zero for points not on a surface.
    pub n: Normal3f,

    /// The medium interface used for scattering media.
    pub medium_interface: Option<MediumInterface>,
}

impl Hit {
    /// Create a new hit. A non-zero `wo` is normalized.
    ///
    /// * `p`                - Point of interaction.
    /// * `time`             - Time when interaction occurred.
    /// * `p_error`          - Floating point error for ray intersection points.
    /// * `wo`               - The negative ray direction.
    /// * `n`                - Surface normal at the point `p`.
    /// * `medium_interface` - The medium interface used for scattering media.
    pub fn new(
        p: Point3f,
        time: Float,
        p_error: Vector3f,
        wo: Vector3f,
        n: Normal3f,
        medium_interface: Option<MediumInterface>,
    ) -> Self {
        let wo = if wo.length_squared() > 0.0 { wo.normalize() } else { wo };
        Self {
            p,
            time,
            p_error,
            wo,
            n,
            medium_interface,
        }
    }

    /// Create a new hit from minimal fields.
    ///
    /// * `p`                - Point of interaction.
    /// * `time`             - Time when interaction occurred.
    /// * `medium_interface` - The medium interface used for scattering media.
    pub fn new_minimal(p: Point3f, time: Float, medium_interface: Option<MediumInterface>) -> Self {
        Self {
            p,
            time,
            p_error: Vector3f::ZERO,
            wo: Vector3f::ZERO,
            n: Normal3f::ZERO,
            medium_interface,
        }
    }

    /// Returns `true` if this is a surface interaction.
    pub fn is_surface_interaction(&self) -> bool {
        !self.n.is_zero()
    }

    /// Returns `true` if this is a medium interaction.
    pub fn is_medium_interaction(&self) -> bool {
        !self.is_surface_interaction()
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, d);
        Ray::new(origin, *d, INFINITY, self.time, self.get_medium_in_direction(d))
    }

    /// Spawn's a new ray towards another point.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        let d = *p - self.p;
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, &d);
        let d = *p - origin;
        Ray::new(origin, d, 1.0 - SHADOW_EPSILON, self.time, self.get_medium_in_direction(&d))
    }

    /// Spawn's a new ray towards another interaction.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, &(hit.p - self.p));
        let target = Ray::offset_origin(&hit.p, &hit.p_error, &hit.n, &(origin - hit.p));
        let d = target - origin;
        Ray::new(origin, d, 1.0 - SHADOW_EPSILON, self.time, self.get_medium_in_direction(&d))
    }

    /// Returns the medium towards a direction.
    ///
    /// * `w` - The direction.
    pub fn get_medium_in_direction(&self, w: &Vector3f) -> Option<ArcMedium> {
        let mi = self.medium_interface.as_ref()?;
        if w.dot(&self.n) > 0.0 {
            mi.outside.clone()
        } else {
            mi.inside.clone()
        }
    }

    /// Returns the medium when interior and exterior are the same.
    pub fn get_medium(&self) -> Option<ArcMedium> {
        self.medium_interface
            .as_ref()
            .filter(|mi| !mi.is_medium_transition())
            .and_then(|mi| mi.inside.clone())
    }
}
