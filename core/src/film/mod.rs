//! Film

use crate::geometry::*;
use crate::parallel::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::atomic::Ordering;

/// Stores the accumulated sample and splat contributions of a pixel.
#[derive(Default)]
pub struct Pixel {
    /// Sum of weighted RGB sample contributions.
    pub rgb: [AtomicFloat; 3],

    /// Sum of sample weights.
    pub weight_sum: AtomicFloat,

    /// Sum of unweighted RGB splats.
    pub splat_rgb: [AtomicFloat; 3],
}

/// Film accumulates sample and splat contributions of an image. Each pixel
/// component is updated atomically so the film can be shared across worker
/// threads by reference.
pub struct Film {
    /// Image resolution in pixels.
    pub full_resolution: Point2i,

    /// Luminance above which sample values are scaled down.
    max_sample_luminance: Float,

    /// The pixels in row-major order.
    pixels: Vec<Pixel>,
}

impl Film {
    /// Create a new `Film`.
    ///
    /// * `resolution`           - Image resolution in pixels.
    /// * `max_sample_luminance` - Optional luminance clamp for sample values.
    pub fn new(resolution: &Point2i, max_sample_luminance: Option<Float>) -> Self {
        let n = max(resolution.x, 0) as usize * max(resolution.y, 0) as usize;
        let mut pixels = Vec::with_capacity(n);
        pixels.resize_with(n, Pixel::default);

        Self {
            full_resolution: *resolution,
            max_sample_luminance: max_sample_luminance.unwrap_or(INFINITY),
            pixels,
        }
    }

    /// Returns the offset of a pixel or `None` if it is outside the image.
    ///
    /// * `p` - The pixel.
    fn get_pixel_offset(&self, p: &Point2i) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.full_resolution.x || p.y >= self.full_resolution.y {
            None
        } else {
            Some((p.y * self.full_resolution.x + p.x) as usize)
        }
    }

    /// Returns `v` scaled down so its luminance does not exceed
    /// `max_sample_luminance`, or `None` if it must be ignored.
    ///
    /// * `p`    - The film position.
    /// * `v`    - The contribution.
    /// * `kind` - Contribution kind used in log messages.
    fn accept(&self, p: &Point2f, v: &Spectrum, kind: &str) -> Option<Spectrum> {
        if v.has_nans() {
            warn!("Ignoring {} spectrum with NaN values at ({}, {})", kind, p.x, p.y);
            return None;
        }

        let vy = v.y();
        if vy < 0.0 {
            warn!(
                "Ignoring {} spectrum with negative luminance {} at ({}, {})",
                kind, vy, p.x, p.y
            );
            None
        } else if vy.is_infinite() {
            warn!("Ignoring {} spectrum with infinite luminance at ({}, {})", kind, p.x, p.y);
            None
        } else if vy > self.max_sample_luminance {
            Some(*v * self.max_sample_luminance / vy)
        } else {
            Some(*v)
        }
    }

    /// Adds a weighted sample contribution to the pixel containing a film
    /// position.
    ///
    /// * `p_film` - The film position.
    /// * `l`      - Radiance of the sample.
    /// * `weight` - Sample weight.
    pub fn add_sample(&self, p_film: &Point2f, l: &Spectrum, weight: Float) {
        let Some(offset) = self.get_pixel_offset(&p_film.floor()) else {
            return;
        };
        let Some(l) = self.accept(p_film, l, "sample") else {
            return;
        };

        let pixel = &self.pixels[offset];
        let rgb = l.to_rgb();
        for (c, v) in pixel.rgb.iter().zip(rgb.iter()) {
            c.add(v * weight);
        }
        pixel.weight_sum.add(weight);
    }

    /// Adds an unweighted contribution to the pixel containing a film
    /// position. Contributions outside the image are dropped.
    ///
    /// * `p` - The film position.
    /// * `v` - The contribution.
    pub fn add_splat(&self, p: &Point2f, v: &Spectrum) {
        let Some(offset) = self.get_pixel_offset(&p.floor()) else {
            return;
        };
        let Some(v) = self.accept(p, v, "splatted") else {
            return;
        };

        let rgb = v.to_rgb();
        for (c, v) in self.pixels[offset].splat_rgb.iter().zip(rgb.iter()) {
            c.add(*v);
        }
    }

    /// Returns the final value of a pixel: the weighted average of its
    /// samples plus its splats scaled by `splat_scale`.
    ///
    /// * `p`           - The pixel.
    /// * `splat_scale` - Scale factor for splats, usually one over the
    ///                   number of samples per pixel.
    pub fn get_pixel(&self, p: &Point2i, splat_scale: Float) -> Spectrum {
        let Some(offset) = self.get_pixel_offset(p) else {
            return Spectrum::ZERO;
        };

        let pixel = &self.pixels[offset];
        let load = |c: &[AtomicFloat; 3]| {
            Spectrum::rgb(
                c[0].load(Ordering::Relaxed),
                c[1].load(Ordering::Relaxed),
                c[2].load(Ordering::Relaxed),
            )
        };

        let weight_sum = pixel.weight_sum.load(Ordering::Relaxed);
        let rgb = if weight_sum != 0.0 {
            load(&pixel.rgb) / weight_sum
        } else {
            Spectrum::ZERO
        };
        rgb + load(&pixel.splat_rgb) * splat_scale
    }
}
