use nalgebra::Point2;
use rodtrack_core::{MarkerRegion, Pose};
use serde::{Deserialize, Serialize};

use super::TrackMode;

/// Cumulative poses, one entry per processed frame.
///
/// Entry 0 is `(0, centroid_x, centroid_y)` of the initial region; entry
/// `i` belongs to frame `start + i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub rotation: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trajectory {
    /// Trajectory seeded with the initial region centroid.
    pub fn starting_at(centroid: Point2<f64>) -> Self {
        Self {
            rotation: vec![0.0],
            x: vec![centroid.x],
            y: vec![centroid.y],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rotation.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rotation.is_empty()
    }

    /// Cumulative pose at entry `i`, with absolute position in `tx`/`ty`.
    pub fn pose(&self, i: usize) -> Option<Pose> {
        Some(Pose::new(
            *self.rotation.get(i)?,
            *self.x.get(i)?,
            *self.y.get(i)?,
        ))
    }

    pub fn last(&self) -> Option<Pose> {
        self.pose(self.len().checked_sub(1)?)
    }

    /// Pose of entry `i` relative to entry 0.
    pub fn displacement(&self, i: usize) -> Option<Pose> {
        let first = self.pose(0)?;
        let p = self.pose(i)?;
        Some(Pose::new(p.rotation, p.tx - first.tx, p.ty - first.ty))
    }

    /// Append `last + delta`.
    pub(crate) fn extend_by(&mut self, delta: &Pose) {
        if let Some(last) = self.last() {
            let next = last.compose(delta);
            self.rotation.push(next.rotation);
            self.x.push(next.tx);
            self.y.push(next.ty);
        }
    }
}

/// One completed alignment step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub from: usize,
    pub to: usize,
    pub delta: Pose,
    pub score: f64,
}

/// Output of a tracking run.
#[derive(Clone, Debug)]
pub struct TrackResult {
    pub mode: TrackMode,
    pub start: usize,
    /// Resolved last frame index.
    pub last: usize,
    pub trajectory: Trajectory,
    pub steps: Vec<StepRecord>,
    /// Region snapshot at the end of the run. In anchored mode this is the
    /// initial region.
    pub region: MarkerRegion,
}
