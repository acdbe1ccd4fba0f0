//! Common

use super::*;
use crate::pbrt::*;
use num_traits::Num;
use std::ops::{Mul, Neg};

/// Dot product.
pub trait Dot<V> {
    /// Output type.
    type Output;

    /// Returns the dot product.
    ///
    /// * `other` - The other vector or normal.
    fn dot(&self, other: &V) -> Self::Output;

    /// Returns the absolute value of the dot product.
    ///
    /// * `other` - The other vector or normal.
    fn abs_dot(&self, other: &V) -> Self::Output
    where
        Self::Output: Num + Neg<Output = Self::Output> + PartialOrd + Copy,
    {
        abs(self.dot(other))
    }
}

/// Cross product.
pub trait Cross<V> {
    /// Output type.
    type Output;

    /// Returns the cross product.
    ///
    /// * `other` - The other vector or normal.
    fn cross(&self, other: &V) -> Self::Output;
}

/// Flips a vector/normal so it lies in the same hemisphere as another one.
pub trait FaceForward<T, V>
where
    Self: Dot<V, Output = T> + Mul<T, Output = Self> + Copy,
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    /// Returns `self` flipped if needed.
    ///
    /// * `v` - The reference vector/normal.
    fn face_forward(&self, v: &V) -> Self {
        if self.dot(v) < T::zero() {
            *self * (T::zero() - T::one())
        } else {
            *self
        }
    }
}

/// Construct a local coordinate system given a normalized vector `v1` and
/// returns the two remaining axis.
///
/// * `v1` - The first (normalized) axis.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns a direction given spherical angles relative to a coordinate frame.
///
/// * `sin_theta` - Sine of polar angle.
/// * `cos_theta` - Cosine of polar angle.
/// * `phi`       - Azimuth angle.
/// * `x`         - X-axis of the frame.
/// * `y`         - Y-axis of the frame.
/// * `z`         - Z-axis of the frame.
pub fn spherical_direction_in_coord_frame(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    sin_theta * phi.cos() * *x + sin_theta * phi.sin() * *y + cos_theta * *z
}
