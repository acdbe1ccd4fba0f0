//! Power Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// PowerLightDistribution returns a distribution with sampling probability
/// proportional to the total emitted power for each light. It ignores the
/// lookup point.
pub struct PowerLightDistribution {
    distrib: Option<Arc<Distribution1D>>,
}

impl PowerLightDistribution {
    /// Create a new instance of `PowerLightDistribution`.
    ///
    /// * `scene` - The scene.
    pub fn new(scene: &Scene) -> Self {
        Self {
            distrib: compute_light_power_distribution(scene).map(Arc::new),
        }
    }
}

impl LightDistribution for PowerLightDistribution {
    fn lookup(&self, _p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.distrib.clone()
    }
}

/// Returns a distribution over the scene's lights proportional to their
/// power (luminance of `Light::power()`), or `None` if there are no lights.
///
/// * `scene` - The scene.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Distribution1D> {
    if scene.lights.is_empty() {
        return None;
    }
    let light_power = scene.lights.iter().map(|light| light.power().y()).collect();
    Some(Distribution1D::new(light_power))
}
