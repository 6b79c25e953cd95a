//! Rigid 2-D poses and the centroid-relative pose transform.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Rotation about a pivot followed by a translation.
///
/// `tx` moves along columns (x), `ty` along rows (y). Rotation is in
/// radians; positive angles turn +x towards +y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub rotation: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        rotation: 0.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(rotation: f64, tx: f64, ty: f64) -> Self {
        Self { rotation, tx, ty }
    }

    #[inline]
    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.tx, self.ty)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.tx.is_finite() && self.ty.is_finite()
    }

    /// Component-wise sum, used to accumulate per-step deltas.
    #[inline]
    pub fn compose(&self, delta: &Pose) -> Pose {
        Pose {
            rotation: self.rotation + delta.rotation,
            tx: self.tx + delta.tx,
            ty: self.ty + delta.ty,
        }
    }

    /// Absolute positions of `offsets` rotated about `pivot` and translated.
    ///
    /// For each offset `(dcol, drow)`:
    /// `col' = pivot.x + dcol·cos − drow·sin + tx`,
    /// `row' = pivot.y + dcol·sin + drow·cos + ty`.
    pub fn apply(&self, pivot: Point2<f64>, offsets: &[Vector2<f64>]) -> Vec<Point2<f64>> {
        let placer = PosePlacer::new(self, pivot);
        offsets.iter().map(|d| placer.place(d)).collect()
    }
}

/// A pose bound to a pivot, with the rotation matrix precomputed.
#[derive(Clone, Copy, Debug)]
pub struct PosePlacer {
    rot: Rotation2<f64>,
    origin: Point2<f64>,
}

impl PosePlacer {
    pub fn new(pose: &Pose, pivot: Point2<f64>) -> Self {
        Self {
            rot: Rotation2::new(pose.rotation),
            origin: pivot + pose.translation(),
        }
    }

    #[inline]
    pub fn place(&self, offset: &Vector2<f64>) -> Point2<f64> {
        self.origin + self.rot * offset
    }
}
