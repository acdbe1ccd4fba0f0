//! 3-D normals

use super::*;
use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, Mul, MulAssign, Neg};

/// A 3-D normal containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D normal containing `Float` values.
pub type Normal3f = Normal3<Float>;

impl Normal3f {
    /// Zero normal.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
}

impl<T: Num> Normal3<T> {
    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero normal.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns true if all coordinates are zero. Medium and camera ray
    /// endpoints carry such a normal.
    pub fn is_zero(&self) -> bool
    where
        T: Zero,
    {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Returns the square of the normal's length.
    pub fn length_squared(&self) -> T
    where
        T: Copy,
    {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the normal's length.
    pub fn length(&self) -> T
    where
        T: num_traits::Float,
    {
        self.length_squared().sqrt()
    }

    /// Returns the unit normal.
    pub fn normalize(&self) -> Self
    where
        T: num_traits::Float,
    {
        let inv = T::one() / self.length();
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl Normal3f {
    /// Returns a new normal containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(abs(self.x), abs(self.y), abs(self.z))
    }
}

impl<T: Num + Copy> Dot<Normal3<T>> for Normal3<T> {
    type Output = T;

    /// Returns the dot product with another normal.
    ///
    /// * `other` - The other normal.
    fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T: Num + Copy> Dot<Vector3<T>> for Normal3<T> {
    type Output = T;

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    fn dot(&self, other: &Vector3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

// Implement FaceForward trait which allows pointing vectors in the same hemisphere as another normal/vector.
impl<T: Num + Neg<Output = T> + PartialOrd + Copy> FaceForward<T, Vector3<T>> for Normal3<T> {}
impl<T: Num + Neg<Output = T> + PartialOrd + Copy> FaceForward<T, Normal3<T>> for Normal3<T> {}

impl<T: Num> Add for Normal3<T> {
    type Output = Self;

    /// Adds the given normal and returns the result.
    ///
    /// * `other` - The normal to add.
    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Num + Copy> Mul<T> for Normal3<T> {
    type Output = Self;

    /// Scale the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::new(f * self.x, f * self.y, f * self.z)
    }
}

impl<T: Num + Copy> MulAssign<T> for Normal3<T> {
    /// Scale and assign the result to the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: T) {
        *self = Self::new(f * self.x, f * self.y, f * self.z);
    }
}

impl<T: Num + Neg<Output = T>> Neg for Normal3<T> {
    type Output = Self;

    /// Flip the normal's direction (scale by -1).
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> From<Vector3<T>> for Normal3<T> {
    /// Convert a 3-D vector to a 3-D normal.
    ///
    /// * `v` - 3-D vector.
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl<T: fmt::Display> fmt::Display for Normal3<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_forward_flips_into_hemisphere() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let v = Vector3f::new(0.0, 0.3, -1.0);
        assert_eq!(n.face_forward(&v), Normal3f::new(0.0, 0.0, -1.0));
        assert_eq!(n.face_forward(&-v), n);
    }

    #[test]
    fn zero_normal_marks_non_surface() {
        assert!(Normal3f::ZERO.is_zero());
        assert!(!Normal3f::new(0.0, 1.0, 0.0).is_zero());
    }
}
