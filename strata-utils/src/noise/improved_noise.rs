//! Single-octave improved Perlin noise.
//!
//! Java reference: `ImprovedNoise`

use crate::math::{lerp, smoothstep};
use crate::random::Random;

/// Gradient directions, indexed by the low four bits of the permutation hash.
/// Shared with [`SimplexNoise`](super::SimplexNoise).
pub(crate) const GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

/// `1.0E-7F` widened to double, as used when snapping y to the fudge grid.
const SHIFT_UP_EPSILON: f64 = 1.000_000_011_686_097_4E-7;

/// Perlin noise with a shuffled permutation table and a random origin offset.
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    permutation: [u8; 256],
    /// Origin offset on x.
    pub xo: f64,
    /// Origin offset on y.
    pub yo: f64,
    /// Origin offset on z.
    pub zo: f64,
}

impl ImprovedNoise {
    /// Draw the offsets (three doubles) and shuffle the permutation table
    /// (256 bounded ints) from `random`.
    pub fn new<R: Random + ?Sized>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut permutation: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in 0..256 {
            let j = random.next_i32_bounded(256 - i as i32) as usize;
            permutation.swap(i, i + j);
        }

        Self {
            permutation,
            xo,
            yo,
            zo,
        }
    }

    /// Sample at a point.
    #[inline]
    #[must_use]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise_with_y_scale(x, y, z, 0.0, 0.0)
    }

    /// Sample with the y-snapping used by the legacy 3D terrain noise.
    ///
    /// When `y_scale` is non-zero the fractional y used for the gradients is
    /// snapped down to a multiple of `y_scale`, capped by `y_max` when that is a
    /// valid offset into the cell.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn noise_with_y_scale(&self, x: f64, y: f64, z: f64, y_scale: f64, y_max: f64) -> f64 {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;
        let cell_x = x.floor();
        let cell_y = y.floor();
        let cell_z = z.floor();
        let dx = x - cell_x;
        let dy = y - cell_y;
        let dz = z - cell_z;

        let snapped = if y_scale == 0.0 {
            0.0
        } else {
            let limit = if y_max >= 0.0 && y_max < dy { y_max } else { dy };
            (limit / y_scale + SHIFT_UP_EPSILON).floor() * y_scale
        };

        self.sample_and_lerp(
            cell_x as i32,
            cell_y as i32,
            cell_z as i32,
            dx,
            dy - snapped,
            dz,
            dy,
        )
    }

    /// Permutation lookup with wrap-around.
    #[inline]
    pub(crate) const fn p(&self, index: i32) -> i32 {
        self.permutation[(index & 0xFF) as usize] as i32
    }

    #[allow(clippy::too_many_arguments, clippy::many_single_char_names)]
    fn sample_and_lerp(
        &self,
        x: i32,
        y: i32,
        z: i32,
        dx: f64,
        dy: f64,
        dz: f64,
        dy_unsnapped: f64,
    ) -> f64 {
        let a = self.p(x);
        let b = self.p(x + 1);
        let aa = self.p(a + y);
        let ab = self.p(a + y + 1);
        let ba = self.p(b + y);
        let bb = self.p(b + y + 1);

        let n000 = grad_dot(self.p(aa + z), dx, dy, dz);
        let n100 = grad_dot(self.p(ba + z), dx - 1.0, dy, dz);
        let n010 = grad_dot(self.p(ab + z), dx, dy - 1.0, dz);
        let n110 = grad_dot(self.p(bb + z), dx - 1.0, dy - 1.0, dz);
        let n001 = grad_dot(self.p(aa + z + 1), dx, dy, dz - 1.0);
        let n101 = grad_dot(self.p(ba + z + 1), dx - 1.0, dy, dz - 1.0);
        let n011 = grad_dot(self.p(ab + z + 1), dx, dy - 1.0, dz - 1.0);
        let n111 = grad_dot(self.p(bb + z + 1), dx - 1.0, dy - 1.0, dz - 1.0);

        let sx = smoothstep(dx);
        let sy = smoothstep(dy_unsnapped);
        let sz = smoothstep(dz);

        lerp(
            sz,
            lerp(sy, lerp(sx, n000, n100), lerp(sx, n010, n110)),
            lerp(sy, lerp(sx, n001, n101), lerp(sx, n011, n111)),
        )
    }
}

#[inline]
fn grad_dot(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let g = GRADIENT[(hash & 15) as usize];
    f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::legacy_random::LegacyRandom;
    use crate::random::xoroshiro::Xoroshiro;

    #[test]
    fn test_permutation_is_a_shuffle() {
        let noise = ImprovedNoise::new(&mut Xoroshiro::from_seed(3));
        let mut seen = [false; 256];
        for &v in &noise.permutation {
            assert!(!seen[v as usize], "duplicate permutation entry {v}");
            seen[v as usize] = true;
        }
        assert!((0.0..256.0).contains(&noise.xo));
        assert!((0.0..256.0).contains(&noise.yo));
        assert!((0.0..256.0).contains(&noise.zo));
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = ImprovedNoise::new(&mut LegacyRandom::from_seed(10));
        // Gradient noise vanishes on the integer lattice.
        let v = noise.noise(1.0 - noise.xo, 2.0 - noise.yo, 3.0 - noise.zo);
        assert!(v.abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = ImprovedNoise::new(&mut Xoroshiro::from_seed(12345));
        let b = ImprovedNoise::new(&mut Xoroshiro::from_seed(12345));
        for i in 0..32 {
            let x = f64::from(i) * 1.37;
            assert_eq!(
                a.noise(x, -x, x * 0.5).to_bits(),
                b.noise(x, -x, x * 0.5).to_bits()
            );
        }
    }

    #[test]
    fn test_bounded_output() {
        let noise = ImprovedNoise::new(&mut Xoroshiro::from_seed(42));
        for x in -10..10 {
            for z in -10..10 {
                let v = noise.noise(f64::from(x) * 3.3, 64.5, f64::from(z) * 3.3);
                assert!((-1.1..=1.1).contains(&v), "{v} out of range at ({x}, {z})");
            }
        }
    }

    #[test]
    fn test_y_scale_only_changes_gradient_offset() {
        let noise = ImprovedNoise::new(&mut Xoroshiro::from_seed(8));
        let plain = noise.noise(0.3, 0.4, 0.5);
        let scaled = noise.noise_with_y_scale(0.3, 0.4, 0.5, 0.0, 0.0);
        assert_eq!(plain.to_bits(), scaled.to_bits());
        let snapped = noise.noise_with_y_scale(0.3, 0.4, 0.5, 0.25, 0.1);
        assert!(snapped.is_finite());
    }
}
