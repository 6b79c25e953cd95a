use rodtrack_core::Pose;
use serde::{Deserialize, Serialize};

/// Extent and resolution of the hypothesis grid.
///
/// Angles are sampled over `[-dra, dra]` and translations over
/// `[-dta, dta]` on each axis, all relative to the window center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Angular half-range in radians.
    pub dra: f64,
    /// Number of angle samples.
    pub nrot: usize,
    /// Translation half-range in pixels.
    pub dta: f64,
    /// Number of translation samples per axis.
    pub nt: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            dra: 10f64.to_radians(),
            nrot: 41,
            dta: 10.0,
            nt: 21,
        }
    }
}

impl SearchParams {
    /// Size of the hypothesis space, `nrot * nt * nt`.
    pub fn hypotheses(&self) -> usize {
        self.nrot.saturating_mul(self.nt).saturating_mul(self.nt)
    }
}

/// What the search does with a hypothesis that samples outside the target frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
    /// Drop the hypothesis; fail only when every hypothesis is dropped.
    #[default]
    Skip,
    /// Fail the whole search on the first such hypothesis.
    Abort,
}

/// Search grid placed around a center pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub params: SearchParams,
    /// `(sr, stx, sty)`: rotation and translation the grid is centered on.
    pub center: Pose,
}

impl SearchWindow {
    pub fn new(params: SearchParams, center: Pose) -> Self {
        Self { params, center }
    }

    /// Window centered on the identity pose.
    pub fn centered(params: SearchParams) -> Self {
        Self::new(params, Pose::IDENTITY)
    }
}
