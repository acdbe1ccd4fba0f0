//! Rays

use super::*;
use crate::medium::*;
use crate::pbrt::*;
use std::fmt;

/// A semi-infinite line specified by its origin and direction.
#[derive(Clone, Default)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Restricts the ray to segment [0, t_max].
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// The medium containing the ray origin.
    pub medium: Option<ArcMedium>,
}

impl Ray {
    /// Create a new ray.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `t_max`  - Restricts the ray to segment [0, t_max].
    /// * `time`   - Time value.
    /// * `medium` - The medium containing the ray origin.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float, medium: Option<ArcMedium>) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            medium,
        }
    }

    /// Returns the position along the ray at given parameter.
    ///
    /// * `t` - Parameter along the ray.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns a ray origin that is offset along the normal far enough to
    /// avoid re-intersection with the surface it was spawned from.
    ///
    /// * `p`       - Surface point.
    /// * `p_error` - Floating point error bounds of `p`.
    /// * `n`       - Surface normal.
    /// * `w`       - Direction the ray leaves in.
    pub fn offset_origin(p: &Point3f, p_error: &Vector3f, n: &Normal3f, w: &Vector3f) -> Point3f {
        let d = Vector3f::from(n.abs()).dot(p_error);
        let mut offset = Vector3f::from(*n) * d;
        if w.dot(n) < 0.0 {
            offset = -offset;
        }

        let mut po = *p + offset;

        // Round offset point `po` away from `p`.
        for i in 0..3 {
            if offset[i] > 0.0 {
                po[i] = next_float_up(po[i]);
            } else if offset[i] < 0.0 {
                po[i] = next_float_down(po[i]);
            }
        }
        po
    }
}

impl fmt::Display for Ray {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[o={}, d={}, t_max={}, time={}]", self.o, self.d, self.t_max, self.time)
    }
}
