//! Marsaglia polar method shared by both random algorithms.
//!
//! Java reference: `MarsagliaPolarGaussian`

/// Holds the spare sample produced by the polar method.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussianCache {
    spare: Option<f64>,
}

impl GaussianCache {
    /// Empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { spare: None }
    }

    /// Take the cached spare, if any.
    #[inline]
    pub const fn take(&mut self) -> Option<f64> {
        self.spare.take()
    }

    /// Forget the cached spare. Called whenever the owning stream is reseeded.
    #[inline]
    pub const fn reset(&mut self) {
        self.spare = None;
    }

    /// Produce the next gaussian, drawing uniform doubles from `next_f64` only when
    /// no spare is cached.
    pub fn next<F: FnMut() -> f64>(&mut self, mut next_f64: F) -> f64 {
        if let Some(spare) = self.take() {
            return spare;
        }
        loop {
            let d = 2.0 * next_f64() - 1.0;
            let e = 2.0 * next_f64() - 1.0;
            let s = d * d + e * e;
            if s < 1.0 && s != 0.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(e * scale);
                return d * scale;
            }
        }
    }
}
