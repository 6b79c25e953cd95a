use serde::{Deserialize, Serialize};

use crate::aligner::{OutOfBoundsPolicy, SearchParams};

/// Which frame each step compares against.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackMode {
    /// Always compare frame 0's original sample against frame `k + 1`,
    /// with the window centered on the current cumulative pose.
    #[default]
    Anchored,
    /// Compare frame `k` against frame `k + 1` and carry the re-posed
    /// region forward after every step.
    Incremental,
}

impl TrackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackMode::Anchored => "anchored",
            TrackMode::Incremental => "incremental",
        }
    }
}

/// Configuration of one tracking run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    pub mode: TrackMode,
    /// First step index.
    pub start: usize,
    /// Stop index. Negative values count back from the end of the
    /// sequence (`lind = N + stop`); non-negative values give
    /// `lind = stop - 1`.
    pub stop: i64,
    pub search: SearchParams,
    pub out_of_bounds: OutOfBoundsPolicy,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            mode: TrackMode::Anchored,
            start: 0,
            stop: -1,
            search: SearchParams::default(),
            out_of_bounds: OutOfBoundsPolicy::default(),
        }
    }
}
