//! 48-bit linear congruential generator matching `java.util.Random`.
//!
//! Java reference: `LegacyRandomSource`, `BitRandomSource`

use super::gaussian::GaussianCache;
use super::{PositionalRandom, Random, RandomError, RandomSource, RandomSplitter, get_seed};

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;
const MODULUS_MASK: u64 = (1 << 48) - 1;

/// `2^-24`, the spacing of `next_f32` results.
const FLOAT_UNIT: f32 = 5.960_464_5E-8;
/// `2^-53`, the spacing of `next_f64` results.
const DOUBLE_UNIT: f64 = 1.110_223_024_625_156_5E-16;

/// The legacy 48-bit LCG.
#[derive(Debug, Clone)]
pub struct LegacyRandom {
    seed: u64,
    gaussian: GaussianCache,
}

impl LegacyRandom {
    /// Create a generator the way `new Random(seed)` does (the seed is scrambled).
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        Self {
            seed: (seed ^ MULTIPLIER) & MODULUS_MASK,
            gaussian: GaussianCache::new(),
        }
    }

    /// Advance the state and return its top `bits` bits.
    #[inline]
    pub const fn next(&mut self, bits: u32) -> i32 {
        self.seed = self
            .seed
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MODULUS_MASK;
        (self.seed >> (48 - bits)) as i32
    }
}

impl Random for LegacyRandom {
    fn set_seed(&mut self, seed: u64) {
        self.seed = (seed ^ MULTIPLIER) & MODULUS_MASK;
        self.gaussian.reset();
    }

    #[inline]
    fn next_i32(&mut self) -> i32 {
        self.next(32)
    }

    fn checked_next_i32_bounded(&mut self, bound: i32) -> Result<i32, RandomError> {
        if bound <= 0 {
            return Err(RandomError::NonPositiveBound(bound));
        }
        if bound & (bound - 1) == 0 {
            return Ok(((i64::from(bound) * i64::from(self.next(31))) >> 31) as i32);
        }
        loop {
            let bits = self.next(31);
            let value = bits % bound;
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return Ok(value);
            }
        }
    }

    fn next_i64(&mut self) -> i64 {
        let high = i64::from(self.next(32));
        let low = i64::from(self.next(32));
        (high << 32).wrapping_add(low)
    }

    fn next_bool(&mut self) -> bool {
        self.next(1) != 0
    }

    fn next_f32(&mut self) -> f32 {
        self.next(24) as f32 * FLOAT_UNIT
    }

    fn next_f64(&mut self) -> f64 {
        let high = i64::from(self.next(26));
        let low = i64::from(self.next(27));
        ((high << 27) + low) as f64 * DOUBLE_UNIT
    }

    fn next_gaussian(&mut self) -> f64 {
        let mut cache = std::mem::take(&mut self.gaussian);
        let value = cache.next(|| self.next_f64());
        self.gaussian = cache;
        value
    }

    fn fork(&mut self) -> RandomSource {
        RandomSource::Legacy(Self::from_seed(self.next_i64() as u64))
    }

    fn next_positional(&mut self) -> RandomSplitter {
        RandomSplitter::Legacy(LegacySplitter::new(self.next_i64() as u64))
    }
}

/// Positional factory for [`LegacyRandom`] streams.
///
/// Java reference: `LegacyRandomSource.LegacyPositionalRandomFactory`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySplitter {
    seed: u64,
}

impl LegacySplitter {
    /// Create a factory for the given base seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl PositionalRandom for LegacySplitter {
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        RandomSource::Legacy(LegacyRandom::from_seed(get_seed(x, y, z) as u64 ^ self.seed))
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        let hash = i64::from(java_string_hash(name)) as u64;
        RandomSource::Legacy(LegacyRandom::from_seed(hash ^ self.seed))
    }

    fn with_seed(&self, seed: u64) -> RandomSource {
        RandomSource::Legacy(LegacyRandom::from_seed(seed))
    }
}

/// `String.hashCode()` over UTF-16 code units.
#[must_use]
pub fn java_string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
