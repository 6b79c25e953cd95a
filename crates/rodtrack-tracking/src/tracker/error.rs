use crate::aligner::AlignError;

/// Errors returned by [`PathTracker`](super::PathTracker).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("stop index resolves to frame {last}, but the sequence has only {available} frames")]
    SequenceExhausted { last: i64, available: usize },

    #[error("start step {start} lies beyond the last frame {last}")]
    InvalidRange { start: usize, last: i64 },

    #[error("alignment {from} -> {to} failed (last good frame {last_good_frame}): {source}")]
    Step {
        from: usize,
        to: usize,
        last_good_frame: usize,
        #[source]
        source: AlignError,
    },

    #[error("tracking cancelled after frame {last_good_frame}")]
    Cancelled { last_good_frame: usize },
}

impl TrackError {
    /// Last frame whose pose was recorded before the run stopped, if any.
    pub fn last_good_frame(&self) -> Option<usize> {
        match self {
            TrackError::Step {
                last_good_frame, ..
            }
            | TrackError::Cancelled { last_good_frame } => Some(*last_good_frame),
            _ => None,
        }
    }
}
