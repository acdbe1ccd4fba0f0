//! Light Distribution.

mod power;
mod uniform;

pub use power::*;
pub use uniform::*;

use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use std::fmt;
use std::sync::Arc;

/// Light sampling strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LightSampleStrategy {
    /// Sample all light sources uniformly.
    Uniform,

    /// Samples light sources according to their emitted power.
    Power,
}

impl From<&str> for LightSampleStrategy {
    /// Returns a `LightSampleStrategy` given a string name.
    ///
    /// * `name` - The strategy name.
    fn from(name: &str) -> Self {
        match name {
            "uniform" => Self::Uniform,
            "power" => Self::Power,
            _ => {
                error!("Light sample distribution type '{}' unknown. Using 'power'.", name);
                Self::Power
            }
        }
    }
}

impl fmt::Display for LightSampleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Power => write!(f, "power"),
        }
    }
}

/// Interface of light distribution implementations that provide probability
/// distributions for sampling light sources at a given point in space.
pub trait LightDistribution {
    /// Given a point `p` in space, this method returns a sampling
    /// distribution for light sources at that point. Returns `None` when the
    /// scene has no lights.
    ///
    /// * `p` - The point.
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>>;
}

/// Atomic reference counted `LightDistribution `.
pub type ArcLightDistribution = Arc<dyn LightDistribution + Send + Sync>;

/// Returns a smart pointer to a new `LightDistribution` implementation. A
/// scene with a single light always uses the uniform strategy.
///
/// * `strategy` - The strategy to use for light sampling.
/// * `scene`    - The scene.
pub fn create_light_sample_distribution(strategy: LightSampleStrategy, scene: &Scene) -> ArcLightDistribution {
    let strategy = if scene.lights.len() == 1 {
        LightSampleStrategy::Uniform
    } else {
        strategy
    };
    info!("Using '{}' light sample distribution for {} lights", strategy, scene.lights.len());

    match strategy {
        LightSampleStrategy::Uniform => Arc::new(UniformLightDistribution::new(scene)),
        LightSampleStrategy::Power => Arc::new(PowerLightDistribution::new(scene)),
    }
}
