//! Sampler

use crate::camera::*;
use crate::geometry::*;
use crate::pbrt::*;

mod random;

pub use random::*;

/// Sampler interface. Samplers supply independent sample values in [0, 1)
/// for one pixel sample at a time.
pub trait Sampler {
    /// Returns a new sampler with the same settings seeded with `seed`.
    ///
    /// * `seed` - The seed for the new sampler.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send>;

    /// Returns the number of samples generated for each pixel.
    fn samples_per_pixel(&self) -> usize;

    /// Start a new pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i);

    /// Advance to the next sample of the current pixel. Returns `false` once
    /// all samples of the pixel have been taken.
    fn start_next_sample(&mut self) -> bool;

    /// Returns the sample value for the next dimension.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions.
    fn get_2d(&mut self) -> Point2f;

    /// Returns an initialized `CameraSample` for a given pixel.
    ///
    /// * `p_raster` - The pixel.
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let film_sample = self.get_2d();
        let p_film = Point2f::new(p_raster.x as Float + film_sample.x, p_raster.y as Float + film_sample.y);

        let time = self.get_1d();
        let p_lens = self.get_2d();

        CameraSample::new(p_film, p_lens, time)
    }
}
