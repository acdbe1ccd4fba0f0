//! AtomicFloat

use crate::pbrt::{bits_to_float, float_to_bits, Float};
use std::sync::atomic::{AtomicU32, Ordering};

/// Implement atomic floating point value using `AtomicU32`.
#[derive(Default)]
pub struct AtomicFloat {
    /// Bit representation of floating point value.
    bits: AtomicU32,
}

impl AtomicFloat {
    /// Create a new `AtomicFloat`.
    ///
    /// * `v` - The value.
    pub fn new(v: Float) -> Self {
        Self {
            bits: AtomicU32::new(float_to_bits(v)),
        }
    }

    /// Add a floating point value with a compare-and-swap loop.
    ///
    /// * `v` - The value to add.
    pub fn add(&self, v: Float) {
        let mut old_bits = self.bits.load(Ordering::Relaxed);
        loop {
            let new_bits = float_to_bits(bits_to_float(old_bits) + v);
            match self
                .bits
                .compare_exchange_weak(old_bits, new_bits, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(x) => old_bits = x,
            }
        }
    }

    /// Loads the floating point value.
    ///
    /// * `order` - Memory ordering of this operation
    pub fn load(&self, order: Ordering) -> Float {
        bits_to_float(self.bits.load(order))
    }

    /// Stores the floating point value.
    ///
    /// * `v`     - The value.
    /// * `order` - Memory ordering of this operation
    pub fn store(&self, v: Float, order: Ordering) {
        self.bits.store(float_to_bits(v), order);
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.load(Ordering::SeqCst))
    }
}
