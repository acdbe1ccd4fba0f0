//! 3-D points

use super::*;
use crate::pbrt::*;
use num_traits::Num;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub};

/// A 3-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D point containing `Float` values.
pub type Point3f = Point3<Float>;

impl Point3f {
    /// Zero point.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Returns the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance(&self, other: &Self) -> Float {
        (*self - *other).length()
    }

    /// Returns the square of the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance_squared(&self, other: &Self) -> Float {
        (*self - *other).length_squared()
    }

    /// Returns a new point with the component-wise minimum.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self {
        Self::new(min(self.x, other.x), min(self.y, other.y), min(self.z, other.z))
    }

    /// Returns a new point with the component-wise maximum.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self {
        Self::new(max(self.x, other.x), max(self.y, other.y), max(self.z, other.z))
    }

    /// Returns a new point containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(abs(self.x), abs(self.y), abs(self.z))
    }
}

impl<T: Num> Point3<T> {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: Num> Add<Vector3<T>> for Point3<T> {
    type Output = Self;

    /// Offsets the point by a vector.
    ///
    /// * `v` - The vector.
    fn add(self, v: Vector3<T>) -> Self::Output {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T: Num + Copy> AddAssign<Vector3<T>> for Point3<T> {
    /// Performs the `+=` operation.
    ///
    /// * `v` - The vector.
    fn add_assign(&mut self, v: Vector3<T>) {
        *self = Self::new(self.x + v.x, self.y + v.y, self.z + v.z);
    }
}

impl<T: Num> Add for Point3<T> {
    type Output = Self;

    /// Adds two points component-wise; used for weighted combinations.
    ///
    /// * `other` - The other point.
    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Num> Sub for Point3<T> {
    type Output = Vector3<T>;

    /// Returns the vector from `other` towards `self`.
    ///
    /// * `other` - The other point.
    fn sub(self, other: Self) -> Self::Output {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Num> Sub<Vector3<T>> for Point3<T> {
    type Output = Self;

    /// Offsets the point by a negated vector.
    ///
    /// * `v` - The vector.
    fn sub(self, v: Vector3<T>) -> Self::Output {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<T: Num + Copy> Mul<T> for Point3<T> {
    type Output = Self;

    /// Scales the point.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Point3f> for Float {
    type Output = Point3f;

    /// Scales the point.
    ///
    /// * `p` - The point.
    fn mul(self, p: Point3f) -> Point3f {
        Point3f::new(self * p.x, self * p.y, self * p.z)
    }
}

impl<T> Index<usize> for Point3<T> {
    type Output = T;

    /// Index the point by an axis to get the immutable coordinate axis value.
    ///
    /// * `i` - 0 for x, 1 for y and 2 for z.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid axis for std::Index on Point3<T>"),
        }
    }
}

impl<T> IndexMut<usize> for Point3<T> {
    /// Index the point by an axis to get a mutable coordinate axis value.
    ///
    /// * `i` - 0 for x, 1 for y and 2 for z.
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Invalid axis for std::IndexMut on Point3<T>"),
        }
    }
}

impl<T> From<Vector3<T>> for Point3<T> {
    /// Convert a 3-D vector to a 3-D point.
    ///
    /// * `v` - 3-D vector.
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl<T> From<Point3<T>> for Vector3<T> {
    /// Convert a 3-D point to a 3-D vector.
    ///
    /// * `p` - 3-D point.
    fn from(p: Point3<T>) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

impl<T: fmt::Display> fmt::Display for Point3<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
