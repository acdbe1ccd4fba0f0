//! Homogeneous Medium

use super::*;
use crate::pbrt::*;

/// Medium with constant absorption and scattering coefficients.
pub struct HomogeneousMedium {
    /// Scattering coefficient.
    sigma_s: Spectrum,

    /// Attenuation coefficient `sigma_a + sigma_s`.
    sigma_t: Spectrum,

    /// Asymmetry parameter of the Henyey-Greenstein phase function.
    g: Float,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium`.
    ///
    /// * `sigma_a` - Absorption coefficient.
    /// * `sigma_s` - Scattering coefficient.
    /// * `g`       - Henyey-Greenstein asymmetry parameter.
    pub fn new(sigma_a: Spectrum, sigma_s: Spectrum, g: Float) -> Self {
        Self {
            sigma_s,
            sigma_t: sigma_a + sigma_s,
            g,
        }
    }
}

impl Medium for HomogeneousMedium {
    fn tr(&self, ray: &Ray, _sampler: &mut dyn Sampler) -> Spectrum {
        let d = min(ray.t_max * ray.d.length(), Float::MAX);
        (self.sigma_t * -d).exp()
    }

    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>) {
        // Sample a channel and distance along the ray.
        let channel = min((sampler.get_1d() * SPECTRUM_SAMPLES as Float) as usize, SPECTRUM_SAMPLES - 1);
        let dist = -(1.0 - sampler.get_1d()).ln() / self.sigma_t[channel];
        let len = ray.d.length();
        let t = min(dist / len, ray.t_max);
        let sampled_medium = t < ray.t_max;

        let mi = if sampled_medium {
            Some(MediumInteraction::new(
                ray.at(t),
                -ray.d,
                ray.time,
                ray.medium.clone(),
                PhaseFunction::HenyeyGreenstein(HenyeyGreenstein::new(self.g)),
            ))
        } else {
            None
        };

        // Compute the transmittance and sampling density.
        let tr = (self.sigma_t * -(min(t, Float::MAX) * len)).exp();
        let density = if sampled_medium { self.sigma_t * tr } else { tr };
        let pdf = density.average();
        if pdf == 0.0 {
            return (Spectrum::ZERO, mi);
        }

        let beta = if sampled_medium {
            tr * self.sigma_s / pdf
        } else {
            tr / pdf
        };
        (beta, mi)
    }
}
