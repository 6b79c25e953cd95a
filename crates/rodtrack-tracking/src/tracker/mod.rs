//! Sequential path tracking.
//!
//! Two strategies share one loop over `k in start..last`:
//! - anchored: frame 0's original sample is searched in frame `k + 1`
//!   around the accumulated pose; the region is never modified;
//! - incremental: frame `k` is searched in frame `k + 1` around zero and the
//!   region snapshot is re-posed after every step.
//!
//! Steps run strictly in order. A failed step aborts the run and reports
//! the last frame whose pose was recorded.

mod cancel;
mod error;
mod params;
mod pipeline;
mod result;

pub use cancel::CancelToken;
pub use error::TrackError;
pub use params::{TrackMode, TrackParams};
pub use pipeline::{resolve_last_index, PathTracker};
pub use result::{StepRecord, TrackResult, Trajectory};
