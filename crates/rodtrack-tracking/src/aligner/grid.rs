//! Hypothesis grid enumeration.

use rodtrack_core::Pose;

use super::SearchParams;

/// `n` samples evenly spaced over `[-half, half]`.
///
/// Sample `i` is `half * (2i - (n - 1)) / (n - 1)`, so the middle sample of
/// an odd grid is exactly zero. A single sample sits at zero.
pub(crate) fn symmetric_samples(half: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![0.0];
    }
    let d = (n - 1) as f64;
    (0..n)
        .map(|i| (half * (2.0 * i as f64 - d)) / d)
        .collect()
}

/// Cartesian product of angle and translation offsets.
///
/// Enumeration order is angle-major, then `tx`, then `ty`; the flat index of
/// a hypothesis is its position in that order.
#[derive(Clone, Debug)]
pub struct HypothesisGrid {
    rotations: Vec<f64>,
    translations: Vec<f64>,
}

impl HypothesisGrid {
    pub fn new(params: &SearchParams) -> Self {
        Self {
            rotations: symmetric_samples(params.dra, params.nrot),
            translations: symmetric_samples(params.dta, params.nt),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rotations.len() * self.translations.len() * self.translations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset from the window center for hypothesis `index`.
    #[inline]
    pub fn offset(&self, index: usize) -> Pose {
        let nt = self.translations.len();
        Pose {
            rotation: self.rotations[index / (nt * nt)],
            tx: self.translations[(index / nt) % nt],
            ty: self.translations[index % nt],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Pose> + '_ {
        (0..self.len()).map(|i| self.offset(i))
    }
}
