//! Light

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::scene::*;
use crate::spectrum::*;
use std::sync::Arc;

mod light_type;
mod visibility_tester;

// Re-export
pub use light_type::*;
pub use visibility_tester::*;

/// Return value for `Light::sample_li()`.
#[derive(Clone)]
pub struct Li {
    /// Incident direction.
    pub wi: Vector3f,

    /// PDF with respect to solid angle.
    pub pdf: Float,

    /// The sampled point on the light.
    pub p_light: Hit,

    /// Radiance arriving at intersection point.
    pub value: Spectrum,
}

impl Li {
    /// Return a new `Li`.
    ///
    /// * `wi`      - Incident direction.
    /// * `pdf`     - PDF with respect to solid angle.
    /// * `p_light` - The sampled point on the light.
    /// * `value`   - Radiance arriving at intersection point.
    pub fn new(wi: Vector3f, pdf: Float, p_light: Hit, value: Spectrum) -> Self {
        Self {
            wi,
            pdf,
            p_light,
            value,
        }
    }

    /// Returns a `VisibilityTester` for the segment between the reference
    /// point and the sampled light point.
    ///
    /// * `hit` - The reference point passed to `sample_li()`.
    pub fn visibility(&self, hit: &Hit) -> VisibilityTester {
        VisibilityTester::new(hit.clone(), self.p_light.clone())
    }
}

/// Return value for `Light::sample_le()`.
#[derive(Clone)]
pub struct Le {
    /// Ray leaving the light source.
    pub ray: Ray,

    /// Surface normal at the point on the light source.
    pub n_light: Normal3f,

    /// The ray origin's probability density with respect to surface area on the
    /// light.
    pub pdf_pos: Float,

    /// The ray directions's probability density with respect to solid angle.
    pub pdf_dir: Float,

    /// Emitted radiance value.
    pub value: Spectrum,
}

impl Le {
    /// Return a new `Le`.
    ///
    /// * `ray`     - Ray leaving the light source.
    /// * `n_light` - Surface normal at the point on the light source.
    /// * `pdf_pos` - The ray origin's probability density with respect to surface
    ///               area on the light.
    /// * `pdf_dir` - The ray directions's probability density with respect to
    ///               solid angle.
    /// * `value`   - Emitted radiance value.
    pub fn new(ray: Ray, n_light: Normal3f, pdf_pos: Float, pdf_dir: Float, value: Spectrum) -> Self {
        Self {
            ray,
            n_light,
            pdf_pos,
            pdf_dir,
            value,
        }
    }
}

/// Return value for `Light::pdf_le()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pdf {
    /// The ray origin's probability density with respect to surface area on the
    /// light.
    pub pdf_pos: Float,

    /// The ray directions's probability density with respect to solid angle.
    pub pdf_dir: Float,
}

impl Pdf {
    /// Return a new `Pdf`.
    ///
    /// * `pdf_pos` - The ray origin's probability density with respect to
    ///               surface area on the light.
    /// * `pdf_dir` - The ray directions's probability density with respect to
    ///               solid angle.
    pub fn new(pdf_pos: Float, pdf_dir: Float) -> Self {
        Self { pdf_pos, pdf_dir }
    }
}

/// Light trait provides common behavior.
pub trait Light {
    /// Initialize the light source before rendering begins.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, _scene: &Scene) {}

    /// Returns the type of light.
    fn get_type(&self) -> LightType;

    /// Samples an incident direction at a reference point. Returns `None`
    /// when no radiance can arrive.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<Li>;

    /// Return the total emitted power.
    fn power(&self) -> Spectrum;

    /// Returns emitted radiance due to that light along a ray that escapes the
    /// scene bounds.
    ///
    /// * `ray` - The ray.
    fn le(&self, _ray: &Ray) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns an area light's emitted radiance in a given outgoing direction
    /// from a point on its surface.
    ///
    /// * `hit` - Point on the surface of the light.
    /// * `w`   - Outgoing direction.
    fn l(&self, _hit: &Hit, _w: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns the probability density with respect to solid angle for the light's
    /// `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float;

    /// Returns a sampled light-carrying ray leaving the light source.
    ///
    /// * `u1`   - Sample values for Monte Carlo.
    /// * `u2`   - Sample values for Monte Carlo.
    /// * `time` - Time to use for the ray.
    fn sample_le(&self, u1: &Point2f, u2: &Point2f, time: Float) -> Le;

    /// Returns the probability density for the light's `sample_le()`.
    ///
    /// * `ray`     - The ray.
    /// * `n_light` - The normal.
    fn pdf_le(&self, ray: &Ray, n_light: &Normal3f) -> Pdf;

    /// Returns whether light source is a delta light.
    fn is_delta_light(&self) -> bool {
        self.get_type().is_delta_light()
    }

    /// Returns whether light source is an infinite light.
    fn is_infinite_light(&self) -> bool {
        self.get_type().matches(LightType::INFINITE_LIGHT)
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;

/// Non-owning reference to a scene light together with its index in the
/// scene's light list.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene owning the light.
#[derive(Copy, Clone)]
pub struct LightRef<'scene> {
    /// Index in `Scene::lights`.
    pub index: usize,

    /// The light.
    pub light: &'scene (dyn Light + Send + Sync),
}
