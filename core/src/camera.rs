//! Camera

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::fmt;
use std::sync::Arc;

/// Camera interface. Besides generating rays, a camera works as the sensor
/// endpoint of bidirectional light transport and therefore exposes its
/// importance function and related densities.
pub trait Camera {
    /// Returns a ray for a given sample along with a floating point value that
    /// affects how much the radiance arriving at the film plane along the
    /// generated ray will contribute to the final image.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);

    /// Returns the importance emitted along a ray leaving the camera and the
    /// raster position it maps to. Rays that miss the film return zero and
    /// `None`.
    ///
    /// * `ray` - The ray.
    fn we(&self, ray: &Ray) -> (Spectrum, Option<Point2f>);

    /// Returns the spatial and directional densities of generating a ray.
    ///
    /// * `ray` - The ray.
    fn pdf_we(&self, ray: &Ray) -> PDFResult;

    /// Samples a point on the lens towards a reference point and returns the
    /// importance arriving there. Returns `None` when the reference point is
    /// not seen by the camera.
    ///
    /// * `hit` - The reference point.
    /// * `u`   - Sample value for the lens position.
    fn sample_wi(&self, hit: &Hit, u: &Point2f) -> Option<CameraWi>;
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;

/// Holds all of the sample values needed to specify a camera ray.
#[derive(Copy, Clone, Default)]
pub struct CameraSample {
    /// Point on the film to which the generated ray carries radiance.
    pub p_film: Point2f,

    /// The point on the lens the ray passes through.
    pub p_lens: Point2f,

    /// The time at which the ray should sample the scene.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film to which the generated ray carries radiance.
    /// * `p_lens` - The point on the lens the ray passes through.
    /// * `time`   - The time at which the ray should sample the scene.
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self { p_film, p_lens, time }
    }
}

impl fmt::Display for CameraSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraSample<p_film: {}, p_lens: {}, time: {}>",
            self.p_film, self.p_lens, self.time
        )
    }
}

/// Stores the spatial and directional densities of a camera ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PDFResult {
    /// Density with respect to area on the lens.
    pub pos: Float,

    /// Density with respect to solid angle.
    pub dir: Float,
}

impl PDFResult {
    /// Create a new `PDFResult`.
    ///
    /// * `pos` - Density with respect to area on the lens.
    /// * `dir` - Density with respect to solid angle.
    pub fn new(pos: Float, dir: Float) -> Self {
        Self { pos, dir }
    }
}

/// Return value for `Camera::sample_wi()`.
#[derive(Clone)]
pub struct CameraWi {
    /// Importance arriving at the reference point.
    pub value: Spectrum,

    /// Direction from the reference point towards the lens.
    pub wi: Vector3f,

    /// Density with respect to solid angle at the reference point.
    pub pdf: Float,

    /// Raster position the reference point maps to.
    pub p_raster: Point2f,

    /// The sampled point on the lens.
    pub p_lens: Hit,
}

impl CameraWi {
    /// Returns a `VisibilityTester` for the segment between the reference
    /// point and the lens.
    ///
    /// * `hit` - The reference point passed to `sample_wi()`.
    pub fn visibility(&self, hit: &Hit) -> VisibilityTester {
        VisibilityTester::new(hit.clone(), self.p_lens.clone())
    }
}
