//! Medium

use crate::geometry::*;
use crate::interaction::*;
use crate::sampler::*;
use crate::spectrum::*;
use std::sync::Arc;

mod henyey_greenstein;
mod homogeneous;

// Re-exports
pub use henyey_greenstein::*;
pub use homogeneous::*;

/// Medium trait to handle volumetric scattering properties.
pub trait Medium {
    /// Returns the beam transmittance along a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    fn tr(&self, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum;

    /// Samples a scattering event along a ray. Returns the sampled
    /// throughput weight and a medium interaction if the sampled distance
    /// is before the ray's `t_max`.
    ///
    /// * `ray`     - The ray. Its `medium` must refer to this medium.
    /// * `sampler` - The sampler.
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>);
}

/// Atomic reference counted `Medium`.
pub type ArcMedium = Arc<dyn Medium + Send + Sync>;

/// MediumInterface represents the boundary interface between two media.
#[derive(Clone, Default)]
pub struct MediumInterface {
    /// Represent the interior of a geometric primitive.
    pub inside: Option<ArcMedium>,

    /// Represent the exterior of a geometric primitive.
    pub outside: Option<ArcMedium>,
}

impl MediumInterface {
    /// Create a medium interface between two media.
    ///
    /// * `inside`  - The interior medium.
    /// * `outside` - The exterior medium.
    pub fn new(inside: Option<ArcMedium>, outside: Option<ArcMedium>) -> Self {
        Self { inside, outside }
    }

    /// Create a medium interface that represents a vacuum.
    pub fn vacuum() -> Self {
        Self {
            inside: None,
            outside: None,
        }
    }

    /// Returns `true` if the medium interface marks a transition between
    /// two distinct media.
    pub fn is_medium_transition(&self) -> bool {
        match (self.inside.as_ref(), self.outside.as_ref()) {
            (Some(inside), Some(outside)) => !Arc::ptr_eq(inside, outside),
            (None, None) => false,
            _ => true,
        }
    }
}

impl From<ArcMedium> for MediumInterface {
    /// Create a medium interface between same media.
    ///
    /// * `medium` - The medium on either side of the interface.
    fn from(medium: ArcMedium) -> Self {
        Self {
            inside: Some(Arc::clone(&medium)),
            outside: Some(medium),
        }
    }
}

impl From<Option<ArcMedium>> for MediumInterface {
    /// Create a medium interface between same media.
    ///
    /// * `medium` - The medium on either side of the interface.
    fn from(medium: Option<ArcMedium>) -> Self {
        Self {
            inside: medium.clone(),
            outside: medium,
        }
    }
}
