//! Random Number Generator.

use crate::pbrt::*;

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// Random number generator based on the PCG32 algorithm.
#[derive(Clone, Debug, PartialEq)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Returns a generator with the default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new generator for the given sequence. Distinct sequences
    /// produce independent streams.
    ///
    /// * `sequence_index` - Sequence index.
    pub fn new(sequence_index: u64) -> Self {
        let mut ret = Self { state: 0, inc: 0 };
        ret.set_sequence(sequence_index);
        ret
    }

    /// Reset the generator to the start of a sequence.
    ///
    /// * `init_seq` - Sequence index.
    pub fn set_sequence(&mut self, init_seq: u64) {
        self.state = 0;
        self.inc = init_seq.wrapping_shl(1) | 1;
        let _ = self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        let _ = self.uniform_u32();
    }

    /// Returns a uniformly distributed 32-bit value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;

        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value in [lower_bound, upper_bound).
    ///
    /// * `lower_bound` - Inclusive lower bound.
    /// * `upper_bound` - Exclusive upper bound.
    pub fn bounded_uniform_u32(&mut self, lower_bound: u32, upper_bound: u32) -> u32 {
        let b = upper_bound - lower_bound;
        let threshold = b.wrapping_neg() % b;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return lower_bound + r % b;
            }
        }
    }

    /// Returns a uniformly distributed floating point value in [0, 1).
    pub fn uniform_float(&mut self) -> Float {
        min(self.uniform_u32() as Float * hexf32!("0x1.0p-32"), ONE_MINUS_EPSILON)
    }
}
