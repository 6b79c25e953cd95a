use log::info;
use rodtrack_core::{FrameSequence, MarkerRegion};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{CancelToken, StepRecord, TrackError, TrackMode, TrackParams, TrackResult, Trajectory};
use crate::aligner::{Aligner, Alignment, SearchWindow};

/// Resolve a stop index against a sequence of `len` frames.
///
/// Negative stops count back from the end (`len + stop`); non-negative
/// stops give `stop - 1`.
pub fn resolve_last_index(stop: i64, len: usize) -> i64 {
    if stop < 0 {
        len as i64 + stop
    } else {
        stop - 1
    }
}

/// Sequential path tracker driving [`Aligner::diffind`] over a frame sequence.
pub struct PathTracker<'a> {
    aligner: Aligner<'a>,
    params: TrackParams,
    cancel: Option<CancelToken>,
    on_step: Option<Box<dyn Fn(&StepRecord) + 'a>>,
}

impl<'a> PathTracker<'a> {
    pub fn new(frames: &'a FrameSequence, params: TrackParams) -> Self {
        let aligner = Aligner::new(frames).with_policy(params.out_of_bounds);
        Self {
            aligner,
            params,
            cancel: None,
            on_step: None,
        }
    }

    /// Observe `token` before every step.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Call `f` after every completed step, before the next cancellation check.
    pub fn with_progress(mut self, f: impl Fn(&StepRecord) + 'a) -> Self {
        self.on_step = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    #[inline]
    pub fn aligner(&self) -> &Aligner<'a> {
        &self.aligner
    }

    /// Last frame index the run will reach, validated against the sequence.
    ///
    /// A last index past the end is `SequenceExhausted`; one before `start`
    /// (including a negative one) is `InvalidRange`.
    pub fn last_index(&self) -> Result<usize, TrackError> {
        let available = self.aligner.frames().len();
        let last = resolve_last_index(self.params.stop, available);
        if last >= available as i64 {
            return Err(TrackError::SequenceExhausted { last, available });
        }
        if self.params.start as i64 > last {
            return Err(TrackError::InvalidRange {
                start: self.params.start,
                last,
            });
        }
        Ok(last as usize)
    }

    /// Track `region` (defined on frame 0) through the sequence.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, region),
            fields(mode = self.params.mode.as_str(), start = self.params.start, stop = self.params.stop)
        )
    )]
    pub fn run(&self, region: &MarkerRegion) -> Result<TrackResult, TrackError> {
        let last = self.last_index()?;
        let start = self.params.start;
        let mode = self.params.mode;
        info!(
            "finding path in frames {start}..={last} ({})",
            mode.as_str()
        );

        let mut trajectory = Trajectory::starting_at(region.sample.centroid());
        let mut current = region.clone();
        let mut steps = Vec::with_capacity(last - start);

        for k in start..last {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(TrackError::Cancelled { last_good_frame: k });
            }

            let (from, alignment) = match mode {
                TrackMode::Anchored => (0, self.anchored_step(region, &trajectory, k)?),
                TrackMode::Incremental => {
                    let (alignment, next) = self.incremental_step(&current, k)?;
                    current = next;
                    (k, alignment)
                }
            };

            trajectory.extend_by(&alignment.delta);
            let record = StepRecord {
                from,
                to: k + 1,
                delta: alignment.delta,
                score: alignment.score,
            };
            if let Some(on_step) = self.on_step.as_ref() {
                on_step(&record);
            }
            steps.push(record);
            if let Some(pose) = trajectory.last() {
                info!(
                    "{} to {}: rot={:.4} x={:.2} y={:.2} score={:.5}",
                    k,
                    k + 1,
                    pose.rotation,
                    pose.tx,
                    pose.ty,
                    alignment.score
                );
            }
        }

        Ok(TrackResult {
            mode,
            start,
            last,
            trajectory,
            steps,
            region: current,
        })
    }

    /// One anchored step: frame 0's original sample against frame `k + 1`,
    /// searched around the current cumulative displacement.
    pub fn anchored_step(
        &self,
        initial: &MarkerRegion,
        trajectory: &Trajectory,
        k: usize,
    ) -> Result<Alignment, TrackError> {
        let center = trajectory
            .displacement(trajectory.len().saturating_sub(1))
            .unwrap_or_default();
        let window = SearchWindow::new(self.params.search, center);
        self.aligner
            .diffind(&initial.sample, 0, k + 1, &window)
            .map_err(|source| TrackError::Step {
                from: 0,
                to: k + 1,
                last_good_frame: k,
                source,
            })
    }

    /// One incremental step: frame `k` against frame `k + 1` with a window
    /// centered on zero. Returns the alignment and the re-posed region.
    pub fn incremental_step(
        &self,
        current: &MarkerRegion,
        k: usize,
    ) -> Result<(Alignment, MarkerRegion), TrackError> {
        let window = SearchWindow::centered(self.params.search);
        let alignment = self
            .aligner
            .diffind(&current.sample, k, k + 1, &window)
            .map_err(|source| TrackError::Step {
                from: k,
                to: k + 1,
                last_good_frame: k,
                source,
            })?;
        let next = current.transformed(&alignment.delta);
        Ok((alignment, next))
    }
}
