/// Errors returned by [`Aligner::diffind`](super::Aligner::diffind).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    #[error("frame index {index} out of range (sequence has {len} frames)")]
    FrameIndex { index: usize, len: usize },

    #[error("invalid search window: {reason}")]
    InvalidWindow { reason: &'static str },

    #[error("region sample is empty")]
    EmptySample,

    #[error("reference pixel ({row}, {col}) lies outside frame {frame}")]
    ReferenceOutOfBounds { frame: usize, row: i64, col: i64 },

    #[error(
        "hypothesis (rot={rotation:.5}, tx={tx:.3}, ty={ty:.3}) samples outside frame {target} \
         (reference frame {reference})"
    )]
    OutOfBounds {
        reference: usize,
        target: usize,
        rotation: f64,
        tx: f64,
        ty: f64,
    },
}
