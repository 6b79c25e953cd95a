use log::{debug, warn};
use rodtrack_core::{Frame, FrameSequence, Pixel, Pose, PosePlacer, RegionSample};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::grid::HypothesisGrid;
use super::{AlignError, OutOfBoundsPolicy, SearchWindow};

/// Outcome of one grid search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    /// Best hypothesis relative to the window center.
    pub delta: Pose,
    /// Mean squared intensity difference of the best hypothesis.
    pub score: f64,
    /// Hypotheses that were scored.
    pub evaluated: usize,
    /// Hypotheses dropped because they sampled outside the target frame.
    pub skipped: usize,
}

/// Exhaustive rigid-transform search between two frames of a sequence.
#[derive(Clone, Copy, Debug)]
pub struct Aligner<'a> {
    frames: &'a FrameSequence,
    policy: OutOfBoundsPolicy,
}

impl<'a> Aligner<'a> {
    pub fn new(frames: &'a FrameSequence) -> Self {
        Self {
            frames,
            policy: OutOfBoundsPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> OutOfBoundsPolicy {
        self.policy
    }

    #[inline]
    pub fn frames(&self) -> &'a FrameSequence {
        self.frames
    }

    /// Find the rigid transform that best carries `region` from frame `n` onto frame `m`.
    ///
    /// Every hypothesis `center + offset` of the window grid is scored by the
    /// mean squared difference between frame `n` sampled at the region
    /// pixels and frame `m` sampled at the transformed pixels. The first
    /// minimum in enumeration order wins, and its offset is returned as
    /// `Alignment::delta`.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, region, window),
            fields(samples = region.len(), hypotheses = window.params.hypotheses())
        )
    )]
    pub fn diffind(
        &self,
        region: &RegionSample,
        n: usize,
        m: usize,
        window: &SearchWindow,
    ) -> Result<Alignment, AlignError> {
        validate_window(window)?;
        if region.is_empty() {
            return Err(AlignError::EmptySample);
        }
        let reference_frame = self.frame(n)?;
        let target_frame = self.frame(m)?;
        let reference = sample_reference(reference_frame, region, n)?;

        let grid = HypothesisGrid::new(&window.params);
        let scorer = Scorer {
            frame: target_frame,
            region,
            reference: &reference,
            center: window.center,
        };
        let scores = score_all(&grid, &scorer);

        let mut best: Option<(usize, f64)> = None;
        let mut skipped = 0usize;
        let mut first_outside = None;
        for (idx, score) in scores.into_iter().enumerate() {
            let Some(score) = score else {
                if self.policy == OutOfBoundsPolicy::Abort {
                    return Err(out_of_bounds(n, m, window.center.compose(&grid.offset(idx))));
                }
                if first_outside.is_none() {
                    first_outside = Some(idx);
                }
                skipped += 1;
                continue;
            };
            if best.is_none_or(|(_, b)| score.total_cmp(&b).is_lt()) {
                best = Some((idx, score));
            }
        }

        let Some((best_idx, score)) = best else {
            let idx = first_outside.unwrap_or_default();
            return Err(out_of_bounds(n, m, window.center.compose(&grid.offset(idx))));
        };

        let alignment = Alignment {
            delta: grid.offset(best_idx),
            score,
            evaluated: grid.len() - skipped,
            skipped,
        };
        if skipped > 0 {
            warn!(
                "diffind {n}->{m}: {skipped} of {} hypotheses sampled outside frame {m}",
                grid.len()
            );
        }
        debug!(
            "diffind {n}->{m}: delta=(rot={:.5}, tx={:.3}, ty={:.3}) score={:.6} evaluated={} skipped={}",
            alignment.delta.rotation,
            alignment.delta.tx,
            alignment.delta.ty,
            alignment.score,
            alignment.evaluated,
            alignment.skipped
        );
        Ok(alignment)
    }

    fn frame(&self, index: usize) -> Result<&'a Frame, AlignError> {
        self.frames.get(index).ok_or(AlignError::FrameIndex {
            index,
            len: self.frames.len(),
        })
    }
}

fn validate_window(window: &SearchWindow) -> Result<(), AlignError> {
    let p = &window.params;
    if p.nrot == 0 || p.nt == 0 {
        return Err(AlignError::InvalidWindow {
            reason: "nrot and nt must be at least 1",
        });
    }
    if !(p.dra.is_finite() && p.dra >= 0.0 && p.dta.is_finite() && p.dta >= 0.0) {
        return Err(AlignError::InvalidWindow {
            reason: "dra and dta must be finite and non-negative",
        });
    }
    if !window.center.is_finite() {
        return Err(AlignError::InvalidWindow {
            reason: "window center must be finite",
        });
    }
    Ok(())
}

fn out_of_bounds(reference: usize, target: usize, pose: Pose) -> AlignError {
    AlignError::OutOfBounds {
        reference,
        target,
        rotation: pose.rotation,
        tx: pose.tx,
        ty: pose.ty,
    }
}

/// Frame `n` sampled at the region's own pixels.
fn sample_reference(frame: &Frame, region: &RegionSample, n: usize) -> Result<Vec<f32>, AlignError> {
    region
        .pixels()
        .into_iter()
        .map(|px| {
            frame
                .get(px.row, px.col)
                .ok_or(AlignError::ReferenceOutOfBounds {
                    frame: n,
                    row: px.row,
                    col: px.col,
                })
        })
        .collect()
}

struct Scorer<'s> {
    frame: &'s Frame,
    region: &'s RegionSample,
    reference: &'s [f32],
    center: Pose,
}

impl Scorer<'_> {
    /// Mean squared difference for one hypothesis; `None` if any pixel is outside the frame.
    fn score(&self, offset: &Pose) -> Option<f64> {
        let pose = self.center.compose(offset);
        let placer = PosePlacer::new(&pose, self.region.centroid());
        let mut sum = 0.0f64;
        for (d, &r) in self.region.offsets().iter().zip(self.reference) {
            let px = Pixel::nearest(placer.place(d));
            let v = self.frame.get(px.row, px.col)?;
            let diff = (r - v) as f64;
            sum += diff * diff;
        }
        Some(sum / self.reference.len() as f64)
    }
}

#[cfg(feature = "rayon")]
fn score_all(grid: &HypothesisGrid, scorer: &Scorer<'_>) -> Vec<Option<f64>> {
    (0..grid.len())
        .into_par_iter()
        .map(|idx| scorer.score(&grid.offset(idx)))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn score_all(grid: &HypothesisGrid, scorer: &Scorer<'_>) -> Vec<Option<f64>> {
    grid.iter().map(|offset| scorer.score(&offset)).collect()
}
