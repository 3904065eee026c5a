//! Xoroshiro128++ random source.
//!
//! Java reference: `XoroshiroRandomSource`, `Xoroshiro128PlusPlus`, `RandomSupport`

use super::gaussian::GaussianCache;
use super::{PositionalRandom, Random, RandomError, RandomSource, RandomSplitter, get_seed};

/// `0x9E3779B97F4A7C15`, the 64-bit golden ratio.
const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;
/// `0x6A09E667F3BCC909`, the fractional part of sqrt(2).
const SILVER_RATIO_64: u64 = 0x6A09_E667_F3BC_C909;

const FLOAT_UNIT: f32 = 5.960_464_5E-8;
const DOUBLE_UNIT: f64 = 1.110_223_024_625_156_5E-16;

/// Stafford variant 13 of the splitmix finalizer.
#[inline]
const fn mix_stafford_13(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Expand a 64-bit world seed into the 128-bit state.
///
/// Java reference: `RandomSupport.upgradeSeedTo128bit(long)`
#[must_use]
pub const fn upgrade_seed_to_128bit(seed: u64) -> (u64, u64) {
    let lo = seed ^ SILVER_RATIO_64;
    let hi = lo.wrapping_add(GOLDEN_RATIO_64);
    (mix_stafford_13(lo), mix_stafford_13(hi))
}

/// MD5 of the UTF-8 bytes of `name`, as two big-endian longs.
///
/// Java reference: `RandomSupport.seedFromHashOf(String)`
#[must_use]
pub fn seed_from_hash_of(name: &str) -> (u64, u64) {
    let digest = md5::compute(name.as_bytes()).0;
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&digest[..8]);
    hi.copy_from_slice(&digest[8..]);
    (u64::from_be_bytes(lo), u64::from_be_bytes(hi))
}

/// Xoroshiro128++ generator.
#[derive(Debug, Clone)]
pub struct Xoroshiro {
    lo: u64,
    hi: u64,
    gaussian: GaussianCache,
}

impl Xoroshiro {
    /// Create a generator from a raw 128-bit state. An all-zero state is replaced
    /// by a fixed non-zero one, since Xoroshiro would otherwise only emit zeros.
    #[must_use]
    pub const fn new(lo: u64, hi: u64) -> Self {
        let (lo, hi) = if lo == 0 && hi == 0 {
            (GOLDEN_RATIO_64, SILVER_RATIO_64)
        } else {
            (lo, hi)
        };
        Self {
            lo,
            hi,
            gaussian: GaussianCache::new(),
        }
    }

    /// Create a generator from a 64-bit world seed.
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        let (lo, hi) = upgrade_seed_to_128bit(seed);
        Self::new(lo, hi)
    }

    /// Advance and return the raw 64-bit output.
    #[inline]
    pub const fn next_u64(&mut self) -> u64 {
        let lo = self.lo;
        let mut hi = self.hi;
        let result = lo.wrapping_add(hi).rotate_left(17).wrapping_add(lo);
        hi ^= lo;
        self.lo = lo.rotate_left(49) ^ hi ^ (hi << 21);
        self.hi = hi.rotate_left(28);
        result
    }

    #[inline]
    const fn next_bits(&mut self, bits: u32) -> u64 {
        self.next_u64() >> (64 - bits)
    }
}

impl Random for Xoroshiro {
    fn set_seed(&mut self, seed: u64) {
        let (lo, hi) = upgrade_seed_to_128bit(seed);
        *self = Self::new(lo, hi);
    }

    #[inline]
    fn next_i32(&mut self) -> i32 {
        self.next_u64() as i32
    }

    fn checked_next_i32_bounded(&mut self, bound: i32) -> Result<i32, RandomError> {
        if bound <= 0 {
            return Err(RandomError::NonPositiveBound(bound));
        }
        let bound = u64::from(bound as u32);
        let mut product = u64::from(self.next_i32() as u32) * bound;
        let mut low = product & 0xFFFF_FFFF;
        if low < bound {
            let threshold = (bound as u32).wrapping_neg() % bound as u32;
            while low < u64::from(threshold) {
                product = u64::from(self.next_i32() as u32) * bound;
                low = product & 0xFFFF_FFFF;
            }
        }
        Ok((product >> 32) as i32)
    }

    #[inline]
    fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }

    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 != 0
    }

    fn next_f32(&mut self) -> f32 {
        self.next_bits(24) as f32 * FLOAT_UNIT
    }

    fn next_f64(&mut self) -> f64 {
        self.next_bits(53) as f64 * DOUBLE_UNIT
    }

    fn next_gaussian(&mut self) -> f64 {
        let mut cache = std::mem::take(&mut self.gaussian);
        let value = cache.next(|| self.next_f64());
        self.gaussian = cache;
        value
    }

    fn consume_count(&mut self, count: u32) {
        for _ in 0..count {
            self.next_u64();
        }
    }

    fn fork(&mut self) -> RandomSource {
        let lo = self.next_u64();
        let hi = self.next_u64();
        RandomSource::Xoroshiro(Self::new(lo, hi))
    }

    fn next_positional(&mut self) -> RandomSplitter {
        let lo = self.next_u64();
        let hi = self.next_u64();
        RandomSplitter::Xoroshiro(XoroshiroSplitter::new(lo, hi))
    }
}

/// Positional factory for [`Xoroshiro`] streams.
///
/// Java reference: `XoroshiroRandomSource.XoroshiroPositionalRandomFactory`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XoroshiroSplitter {
    lo: u64,
    hi: u64,
}

impl XoroshiroSplitter {
    /// Create a factory from a 128-bit seed.
    #[must_use]
    pub const fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }
}

impl PositionalRandom for XoroshiroSplitter {
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        RandomSource::Xoroshiro(Xoroshiro::new(get_seed(x, y, z) as u64 ^ self.lo, self.hi))
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        let (lo, hi) = seed_from_hash_of(name);
        RandomSource::Xoroshiro(Xoroshiro::new(lo ^ self.lo, hi ^ self.hi))
    }

    fn with_seed(&self, seed: u64) -> RandomSource {
        RandomSource::Xoroshiro(Xoroshiro::new(seed ^ self.lo, seed ^ self.hi))
    }
}

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
mod tests {
    use super::*;

    #[test]
    fn test_next_i64_reference() {
        let mut random = Xoroshiro::from_seed(0);
        assert_eq!(random.next_i64(), 3038984756725240190);
        assert_eq!(random.next_i64(), -3694039286755638414);
        assert_eq!(random.next_i64(), 4633751808701151732);

        let mut random = Xoroshiro::from_seed(42);
        assert_eq!(random.next_i64(), -4695948378737616609);
        assert_eq!(random.next_i64(), 7341713790291473579);
        assert_eq!(random.next_i64(), -7542733514721318211);
    }

    #[test]
    fn test_bounded_reference() {
        let mut random = Xoroshiro::from_seed(42);
        let values: Vec<i32> = (0..5).map(|_| random.next_i32_bounded(100)).collect();
        assert_eq!(values, [41, 31, 85, 48, 66]);
        assert_eq!(random.next_f64().to_bits(), 0.6480715228911569_f64.to_bits());

        let mut random = Xoroshiro::from_seed(12345);
        let values: Vec<i32> = (0..10).map(|_| random.next_i32_bounded(7)).collect();
        assert_eq!(values, [0, 5, 6, 0, 3, 4, 1, 3, 2, 6]);

        let mut random = Xoroshiro::from_seed(u64::MAX);
        let values: Vec<i32> = (0..4).map(|_| random.next_i32_bounded(i32::MAX)).collect();
        assert_eq!(values, [1421574888, 1004810129, 458210092, 2121564839]);
    }

    #[test]
    fn test_zero_state_is_replaced() {
        let mut zero = Xoroshiro::new(0, 0);
        let mut fixed = Xoroshiro::new(GOLDEN_RATIO_64, SILVER_RATIO_64);
        assert_eq!(zero.next_u64(), fixed.next_u64());
        assert_ne!(zero.next_u64(), 0);
    }

    #[test]
    fn test_seed_from_hash_of() {
        let (lo, hi) = seed_from_hash_of("minecraft:terrain");
        assert_eq!(lo as i64, 2226279196109926164);
        assert_eq!(hi as i64, -2108001439914377933);
    }

    #[test]
    fn test_set_seed_restarts_stream() {
        let mut random = Xoroshiro::from_seed(5);
        let first = random.next_i64();
        random.next_gaussian();
        random.set_seed(5);
        assert_eq!(random.next_i64(), first);
    }

    #[test]
    fn test_bounded_uniformity() {
        let mut random = Xoroshiro::from_seed(12345);
        let bound = 7;
        let samples = 70_000;
        let mut counts = [0u32; 7];
        for _ in 0..samples {
            counts[random.next_i32_bounded(bound) as usize] += 1;
        }
        let expected = f64::from(samples) / f64::from(bound);
        let chi_squared: f64 = counts
            .iter()
            .map(|&c| {
                let d = f64::from(c) - expected;
                d * d / expected
            })
            .sum();
        // 6 degrees of freedom, p = 0.001
        assert!(chi_squared < 22.46, "chi squared {chi_squared} too large");
    }

    #[test]
    fn test_bounded_range() {
        let mut random = Xoroshiro::from_seed(1);
        for bound in [1, 2, 3, 10, 255, 256, 1 << 30, i32::MAX] {
            for _ in 0..500 {
                let v = random.next_i32_bounded(bound);
                assert!((0..bound).contains(&v));
            }
        }
    }
}
