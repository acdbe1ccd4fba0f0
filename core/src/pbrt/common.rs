//! Common

use super::clamp::*;
use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Machine Epsilon
pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;

/// Shadow Epsilon
pub const SHADOW_EPSILON: Float = 0.0001;

/// 32-bit precision value for 1 - epsilon.
pub const FLOAT_ONE_MINUS_EPSILON: f32 = hexf32!("0x1.fffffep-1"); // 0.99999994

/// 1 - epsilon in the precision we've selected for `Float`.
pub const ONE_MINUS_EPSILON: Float = FLOAT_ONE_MINUS_EPSILON;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Returns the error bound for adding n terms.
///
/// * `n` - Number of terms
#[inline(always)]
pub fn gamma(n: Int) -> Float {
    (n as Float * MACHINE_EPSILON) / (1.0 - n as Float * MACHINE_EPSILON)
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Convert a 32-bit floating point value to its constituent bits.
///
/// * `f` - The 32-bit floating point number.
#[inline(always)]
pub fn float_to_bits(f: f32) -> u32 {
    f.to_bits()
}

/// Convert the bits of a 32-bit unsigned interger value to a 32-bit floating
/// point value.
///
/// * `i` - The 32-bit unsigned interger.
#[inline(always)]
pub fn bits_to_float(i: u32) -> f32 {
    f32::from_bits(i)
}

/// Bump a floating point value up to the next greater representable floating
/// point value.
///
/// * `v` - Floating point value.
pub fn next_float_up(v: Float) -> Float {
    // Handle infinity and negative zero for next_float_up
    if v.is_infinite() && v > 0.0 {
        return v;
    }

    let nv = if v == -0.0 { 0.0 } else { v };

    // Advance v to next higher float
    let mut ui = float_to_bits(nv);
    if nv >= 0.0 {
        ui += 1;
    } else {
        ui -= 1;
    }

    bits_to_float(ui)
}

/// Bump a floating point value up to the next lower representable floating
/// point value.
///
/// * `v` - Floating point value.
pub fn next_float_down(v: Float) -> Float {
    // Handle infinity and positive zero for next_float_down
    if v.is_infinite() && v < 0.0 {
        return v;
    }

    // Advance v to next lower float
    let nv = if v == 0.0 { -0.0 } else { v };
    let mut ui = float_to_bits(nv);
    if nv > 0.0 {
        ui -= 1;
    } else {
        ui += 1;
    }

    bits_to_float(ui)
}

/// Bisects a procedurally defined array and returns the last index `i` for
/// which `pred(i)` is true, clamped to `[0, size - 2]`.
///
/// * `size` - Size of array.
/// * `pred` - Predicate function.
pub fn find_interval<P>(size: usize, pred: P) -> usize
where
    P: Fn(usize) -> bool,
{
    let mut first = 0;
    let mut len = size;

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_interval_brackets_value() {
        let cdf = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.3), 1);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.0), 0);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 1.0), 2);
    }

    #[test]
    fn next_float_moves_one_ulp() {
        let v = 1.5;
        assert!(next_float_up(v) > v);
        assert!(next_float_down(v) < v);
        assert_eq!(next_float_down(next_float_up(v)), v);
    }
}
