//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::primitive::*;

/// The scene: an aggregate of primitives and the light sources.
#[derive(Clone)]
pub struct Scene {
    /// The aggregate of all primitives.
    pub aggregate: ArcPrimitive,

    /// All light sources.
    pub lights: Vec<ArcLight>,

    /// Indices into `lights` of the infinite light sources.
    pub infinite_lights: Vec<usize>,

    /// Bounding box of the aggregate.
    pub world_bound: Bounds3f,
}

impl Scene {
    /// Creates a new scene and runs each light's `preprocess()`.
    ///
    /// * `aggregate` - The aggregate of all primitives.
    /// * `lights`    - All light sources.
    pub fn new(aggregate: ArcPrimitive, lights: Vec<ArcLight>) -> Self {
        let infinite_lights = lights
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_infinite_light())
            .map(|(i, _)| i)
            .collect();

        let scene = Self {
            world_bound: aggregate.world_bound(),
            aggregate,
            lights,
            infinite_lights,
        };

        for light in scene.lights.iter() {
            light.preprocess(&scene);
        }

        scene
    }

    /// Returns a non-owning reference to a light.
    ///
    /// * `index` - Index into `lights`.
    pub fn light(&self, index: usize) -> LightRef<'_> {
        LightRef {
            index,
            light: self.lights[index].as_ref(),
        }
    }

    /// Returns an iterator over the infinite lights.
    pub fn infinite_lights(&self) -> impl Iterator<Item = LightRef<'_>> + '_ {
        self.infinite_lights.iter().map(move |&i| self.light(i))
    }

    /// Traces a ray through the scene and returns the nearest intersection.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction> {
        self.aggregate.intersect(ray)
    }

    /// Returns `true` if the ray intersects anything.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }
}
