//! RGB Spectrum

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Sub};

/// Number of RGB samples.
pub const RGB_SAMPLES: usize = 3;

/// Stores a spectral power distribution as red, green and blue coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// The RGB coefficients.
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Spectrum that is zero everywhere.
    pub const ZERO: Self = Self { c: [0.0; RGB_SAMPLES] };

    /// Spectrum that is one everywhere.
    pub const ONE: Self = Self { c: [1.0; RGB_SAMPLES] };

    /// Create a spectrum with a constant value.
    ///
    /// * `v` - The constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a spectrum from RGB values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the RGB coefficients.
    pub fn to_rgb(&self) -> [Float; RGB_SAMPLES] {
        self.c
    }

    /// Returns true if the values are zero everywhere.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns true if either coefficient is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns the maximum coefficient value.
    pub fn max_component_value(&self) -> Float {
        self.c[1..].iter().fold(self.c[0], |m, v| max(m, *v))
    }

    /// Returns the y-coefficient of XYZ colour (luminance).
    pub fn y(&self) -> Float {
        const Y_WEIGHT: [Float; 3] = [0.212671, 0.715160, 0.072169];
        Y_WEIGHT[0] * self.c[0] + Y_WEIGHT[1] * self.c[1] + Y_WEIGHT[2] * self.c[2]
    }

    /// Returns `e^v` for each coefficient.
    pub fn exp(&self) -> Self {
        Self {
            c: [self.c[0].exp(), self.c[1].exp(), self.c[2].exp()],
        }
    }

    /// Returns the average of the coefficients.
    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / RGB_SAMPLES as Float
    }

    /// Clamps the coefficients to the range [low, high].
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        Self {
            c: [
                clamp(self.c[0], low, high),
                clamp(self.c[1], low, high),
                clamp(self.c[2], low, high),
            ],
        }
    }

    /// Apply an operation to each coefficient pair.
    #[inline(always)]
    fn zip(&self, other: &Self, op: impl Fn(Float, Float) -> Float) -> Self {
        Self {
            c: [op(self.c[0], other.c[0]), op(self.c[1], other.c[1]), op(self.c[2], other.c[2])],
        }
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip(&other, |a, b| a + b)
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip(&other, |a, b| a - b)
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.zip(&other, |a, b| a * b)
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self {
        Self {
            c: [self.c[0] * f, self.c[1] * f, self.c[2] * f],
        }
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Divides coefficient-wise. Zero coefficients in `other` yield zero.
    fn div(self, other: Self) -> Self {
        self.zip(&other, |a, b| if b != 0.0 { a / b } else { 0.0 })
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.c[i]
    }
}

impl fmt::Display for RGBSpectrum {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}
