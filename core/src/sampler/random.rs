//! Random Sampler

use super::Sampler;
use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::*;

/// Generates independent uniform random sample values for every dimension.
#[derive(Clone)]
pub struct RandomSampler {
    /// Number of samples generated for each pixel.
    samples_per_pixel: usize,

    /// The random number generator.
    rng: RNG,

    /// Index of the current sample in the pixel.
    current_pixel_sample_index: usize,
}

impl RandomSampler {
    /// Creates a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples generated for each pixel.
    /// * `seed`              - The random number generator sequence.
    pub fn new(samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            samples_per_pixel,
            rng: RNG::new(seed),
            current_pixel_sample_index: 0,
        }
    }
}

impl Sampler for RandomSampler {
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send> {
        Box::new(Self::new(self.samples_per_pixel, seed))
    }

    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    fn start_pixel(&mut self, _p: &Point2i) {
        self.current_pixel_sample_index = 0;
    }

    fn start_next_sample(&mut self) -> bool {
        self.current_pixel_sample_index += 1;
        self.current_pixel_sample_index < self.samples_per_pixel
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> Point2f {
        let x = self.rng.uniform_float();
        let y = self.rng.uniform_float();
        Point2f::new(x, y)
    }
}
