//! Two-dimensional simplex noise, used by the end island field.
//!
//! Java reference: `SimplexNoise`

use crate::math::floor;
use crate::noise::improved_noise::GRADIENT;
use crate::random::Random;

/// Simplex noise over a shuffled 256-entry permutation table.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    permutation: [i32; 256],
    /// Origin offset on x (drawn for parity, unused by 2D sampling).
    pub xo: f64,
    /// Origin offset on y.
    pub yo: f64,
    /// Origin offset on z.
    pub zo: f64,
}

impl SimplexNoise {
    /// Seed the offsets and permutation from `random`.
    pub fn new<R: Random + ?Sized>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;
        let mut permutation: [i32; 256] = std::array::from_fn(|i| i as i32);
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

    #[inline]
    fn p(&self, index: i32) -> i32 {
        self.permutation[(index & 0xFF) as usize]
    }

    /// Sample the 2D field.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn get_value(&self, x: f64, y: f64) -> f64 {
        let sqrt3 = 3.0_f64.sqrt();
        let f2 = 0.5 * (sqrt3 - 1.0);
        let g2 = (3.0 - sqrt3) / 6.0;

        let skew = (x + y) * f2;
        let i = floor(x + skew);
        let j = floor(y + skew);
        let unskew = f64::from(i + j) * g2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
        let x1 = x0 - f64::from(i1) + g2;
        let y1 = y0 - f64::from(j1) + g2;
        let x2 = x0 - 1.0 + 2.0 * g2;
        let y2 = y0 - 1.0 + 2.0 * g2;

        let ii = i & 0xFF;
        let jj = j & 0xFF;
        let gi0 = self.p(ii + self.p(jj)) % 12;
        let gi1 = self.p(ii + i1 + self.p(jj + j1)) % 12;
        let gi2 = self.p(ii + 1 + self.p(jj + 1)) % 12;

        let n0 = corner_noise(gi0, x0, y0, 0.0, 0.5);
        let n1 = corner_noise(gi1, x1, y1, 0.0, 0.5);
        let n2 = corner_noise(gi2, x2, y2, 0.0, 0.5);
        70.0 * (n0 + n1 + n2)
    }
}

fn corner_noise(index: i32, x: f64, y: f64, z: f64, falloff: f64) -> f64 {
    let t = falloff - x * x - y * y - z * z;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        let g = GRADIENT[index as usize];
        t2 * t2 * (f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z)
    }
}
