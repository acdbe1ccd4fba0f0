//! Clamp

/// Clamps a value to the given range.
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T: PartialOrd>(val: T, low: T, high: T) -> T {
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}
