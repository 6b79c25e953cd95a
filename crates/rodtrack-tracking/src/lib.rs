//! Rigid marker tracking by exhaustive grid search.
//!
//! [`Aligner::diffind`] finds the rotation and translation that best carries
//! a marker's pixel sample from one frame onto another. [`PathTracker`]
//! repeats that search across a frame sequence, either anchored to frame 0
//! or incrementally from frame to frame, and accumulates a [`Trajectory`].
//!
//! ## Quickstart
//!
//! ```
//! use rodtrack_core::{Frame, FrameSequence, MarkerRegion, RectSpec};
//! use rodtrack_tracking::{PathTracker, TrackParams};
//!
//! let frames = FrameSequence::new(vec![Frame::filled(64, 64, 0.5); 3]);
//! let region = MarkerRegion::from_rect(&RectSpec {
//!     x: 20.0,
//!     y: 20.0,
//!     w: 10.0,
//!     l: 16.0,
//!     angle: 0.0,
//! })
//! .unwrap();
//!
//! let mut params = TrackParams::default();
//! params.search.nrot = 3;
//! params.search.nt = 3;
//! params.search.dta = 2.0;
//!
//! let result = PathTracker::new(&frames, params).run(&region).unwrap();
//! assert_eq!(result.trajectory.len(), 3);
//! ```
//!
//! ## Feature flags
//! - `rayon`: score search hypotheses in parallel.
//! - `tracing`: instrument `diffind` and `PathTracker::run` with spans.

pub mod aligner;
pub mod tracker;

pub use aligner::{
    AlignError, Aligner, Alignment, HypothesisGrid, OutOfBoundsPolicy, SearchParams, SearchWindow,
};
pub use tracker::{
    resolve_last_index, CancelToken, PathTracker, StepRecord, TrackError, TrackMode, TrackParams,
    TrackResult, Trajectory,
};
