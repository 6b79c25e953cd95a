use rodtrack_core::{FrameSequence, FrameSource, MarkerRegion, RegionError};
use rodtrack_tracking::{
    CancelToken, PathTracker, StepRecord, TrackError, TrackParams, TrackResult,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::{ConfigError, TrackConfig};
use crate::io::{LoadError, PatternSource};
use crate::render::RenderError;

/// Errors produced by an end-to-end run.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Loaded frames plus the initial marker, ready to be tracked.
#[derive(Clone, Debug)]
pub struct TrackSession {
    pub frames: FrameSequence,
    pub marker: MarkerRegion,
}

impl TrackSession {
    /// Load the frame sequence and rasterize the marker rectangle of `cfg`.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg), fields(frames = %cfg.frames)))]
    pub fn open(cfg: &TrackConfig) -> Result<Self, RunError> {
        let frames = PatternSource::new(cfg.frames.as_str(), cfg.max_frames)
            .with_bit_depth(cfg.bit_depth)
            .load()?;
        let marker = MarkerRegion::from_rect(&cfg.marker)?;
        Ok(Self { frames, marker })
    }

    pub fn track(&self, params: &TrackParams) -> Result<TrackResult, TrackError> {
        PathTracker::new(&self.frames, params.clone()).run(&self.marker)
    }

    /// Track while observing `cancel` before every step; `on_step` sees each
    /// completed step and may cancel the token to stop the run there.
    pub fn track_with_cancel<'s>(
        &'s self,
        params: &TrackParams,
        cancel: CancelToken,
        on_step: impl Fn(&StepRecord) + 's,
    ) -> Result<TrackResult, TrackError> {
        PathTracker::new(&self.frames, params.clone())
            .with_cancel(cancel)
            .with_progress(on_step)
            .run(&self.marker)
    }
}
