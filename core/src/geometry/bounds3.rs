//! 3-D Axis Aligned Bounding Boxes.

use super::*;
use crate::pbrt::*;
use std::fmt;

/// 3-D axis aligned bounding box of `Float` values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns an empty box; the union with any point yields that point.
    fn default() -> Self {
        Self {
            p_min: Point3f::new(INFINITY, INFINITY, INFINITY),
            p_max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }
}

impl Bounds3f {
    /// Creates a new bounding box from 2 corner points.
    ///
    /// * `p1` - First corner point.
    /// * `p2` - Second corner point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns a bounding box that also encloses a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns a bounding box enclosing both boxes.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }

    /// Returns true if the box has no volume because a minimum exceeds a
    /// maximum.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns the vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns true if a point lies inside or on the boundary of the box.
    ///
    /// * `p` - The point.
    pub fn inside(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns the center and radius of a sphere that bounds the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        if self.is_empty() {
            return (Point3f::ZERO, 0.0);
        }
        let center = lerp(0.5, self.p_min, self.p_max);
        let radius = if self.inside(&center) {
            center.distance(&self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }
}

impl fmt::Display for Bounds3f {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn bounding_sphere_encloses_corners() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let (c, r) = b.bounding_sphere();
        assert_eq!(c, Point3f::ZERO);
        assert!(approx_eq!(f32, r, 3.0f32.sqrt(), epsilon = 0.00001));
    }

    #[test]
    fn empty_box_has_zero_sphere() {
        let (_, r) = Bounds3f::default().bounding_sphere();
        assert_eq!(r, 0.0);
        let b = Bounds3f::default().union_point(&Point3f::new(1.0, 2.0, 3.0));
        assert!(!b.is_empty());
        assert_eq!(b.p_min, b.p_max);
    }
}
