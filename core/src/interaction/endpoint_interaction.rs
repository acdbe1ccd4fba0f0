//! Endpoint Interactions

use crate::camera::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;

/// Represents a path endpoint on the camera lens or on a light source.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the camera/light owned by the scene.
#[derive(Clone)]
pub enum EndpointInteraction<'scene> {
    /// Records the position of a path endpoint on the lens of the camera.
    Camera {
        /// The interaction point.
        hit: Hit,

        /// The camera.
        camera: &'scene dyn Camera,
    },

    /// Records the position of a path endpoint on a light source. The light
    /// is `None` for camera rays that escaped the scene.
    Light {
        /// The interaction point.
        hit: Hit,

        /// The light source.
        light: Option<LightRef<'scene>>,
    },
}

impl<'scene> EndpointInteraction<'scene> {
    /// Create a camera endpoint interaction.
    ///
    /// * `hit`    - The hit point on camera lens.
    /// * `camera` - The camera.
    pub fn camera_from_hit(hit: Hit, camera: &'scene dyn Camera) -> Self {
        Self::Camera { hit, camera }
    }

    /// Create a camera endpoint interaction from a ray.
    ///
    /// * `ray`    - The ray starting on camera lens.
    /// * `camera` - The camera.
    pub fn camera_from_ray(ray: &Ray, camera: &'scene dyn Camera) -> Self {
        Self::Camera {
            hit: Hit::new_minimal(ray.o, ray.time, ray.medium.clone().map(MediumInterface::from)),
            camera,
        }
    }

    /// Create a light endpoint interaction.
    ///
    /// * `hit`   - The hit point on a light source.
    /// * `light` - The light source.
    pub fn light_from_hit(hit: Hit, light: Option<LightRef<'scene>>) -> Self {
        Self::Light { hit, light }
    }

    /// Create a light endpoint interaction for a ray that escaped the scene.
    /// The endpoint sits one unit along the ray and faces back along it.
    ///
    /// * `ray`   - The escaped ray.
    /// * `light` - The light source.
    pub fn light_from_ray(ray: &Ray, light: Option<LightRef<'scene>>) -> Self {
        let hit = Hit::new(
            ray.at(1.0),
            ray.time,
            Vector3f::ZERO,
            Vector3f::ZERO,
            Normal3f::from(-ray.d),
            ray.medium.clone().map(MediumInterface::from),
        );
        Self::Light { hit, light }
    }

    /// Create a light endpoint interaction from a ray leaving a light source.
    ///
    /// * `ray`   - The ray starting point on a light source.
    /// * `nl`    - The surface normal at the ray origin.
    /// * `light` - The light source.
    pub fn light_from_ray_and_normal(ray: &Ray, nl: Normal3f, light: Option<LightRef<'scene>>) -> Self {
        let hit = Hit::new(
            ray.o,
            ray.time,
            Vector3f::ZERO,
            Vector3f::ZERO,
            nl,
            ray.medium.clone().map(MediumInterface::from),
        );
        Self::Light { hit, light }
    }

    /// Returns the hit point.
    pub fn hit(&self) -> &Hit {
        match self {
            Self::Camera { hit, .. } => hit,
            Self::Light { hit, .. } => hit,
        }
    }
}
