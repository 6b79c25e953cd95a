//! Brute-force rigid alignment (`diffind`).
//!
//! The search enumerates an `nrot × nt × nt` grid of rotation/translation
//! hypotheses around a window center, scores each by the mean squared
//! intensity difference against the reference sample, and keeps the first
//! minimum in enumeration order (angle-major, then `tx`, then `ty`).
//!
//! Sampling is nearest-pixel for both the reference and the candidates.
//! Candidates that leave the target frame are handled by
//! [`OutOfBoundsPolicy`].

mod error;
mod grid;
mod params;
mod search;

pub use error::AlignError;
pub use grid::HypothesisGrid;
pub use params::{OutOfBoundsPolicy, SearchParams, SearchWindow};
pub use search::{Aligner, Alignment};

#[cfg(test)]
pub(crate) mod test_frames {
    use nalgebra::Point2;
    use rodtrack_core::{Frame, MarkerRegion};

    fn hash(row: i64, col: i64, seed: u64) -> f32 {
        let mut h = (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (col as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ seed;
        h ^= h >> 33;
        h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
        h ^= h >> 33;
        (h % 1024) as f32 / 1023.0
    }

    /// Noise texture whose content is moved by `(dx, dy)` pixels.
    pub fn shifted_texture(width: usize, height: usize, dx: i64, dy: i64) -> Frame {
        Frame::from_fn(width, height, |r, c| hash(r as i64 - dy, c as i64 - dx, 7))
    }

    pub fn texture(width: usize, height: usize) -> Frame {
        shifted_texture(width, height, 0, 0)
    }

    /// Axis-aligned marker covering rows `r0..=r1`, columns `c0..=c1`.
    pub fn block_region(c0: i64, r0: i64, c1: i64, r1: i64) -> MarkerRegion {
        let (c0, r0, c1, r1) = (c0 as f64 - 0.5, r0 as f64 - 0.5, c1 as f64 + 0.5, r1 as f64 + 0.5);
        MarkerRegion::define(&[
            Point2::new(c0, r0),
            Point2::new(c1, r0),
            Point2::new(c1, r1),
            Point2::new(c0, r1),
        ])
        .expect("block region")
    }
}

#[cfg(test)]
mod tests {
    use super::test_frames::{block_region, shifted_texture, texture};
    use super::*;
    use nalgebra::Point2;
    use rodtrack_core::{Frame, FrameSequence, Pose, RegionSample};

    fn params(dra: f64, nrot: usize, dta: f64, nt: usize) -> SearchParams {
        SearchParams { dra, nrot, dta, nt }
    }

    #[test]
    fn self_alignment_returns_zero_delta() {
        let frames = FrameSequence::new(vec![texture(64, 64)]);
        let region = block_region(20, 20, 32, 28);
        let window = SearchWindow::centered(params(0.2, 5, 3.0, 7));

        let res = Aligner::new(&frames)
            .diffind(&region.sample, 0, 0, &window)
            .expect("diffind");
        assert_eq!(res.delta, Pose::IDENTITY);
        assert_eq!(res.score, 0.0);
        assert_eq!(res.evaluated, 5 * 7 * 7);
        assert_eq!(res.skipped, 0);
    }

    #[test]
    fn recovers_integer_shift() {
        let frames = FrameSequence::new(vec![texture(64, 64), shifted_texture(64, 64, 3, -2)]);
        let region = block_region(20, 20, 32, 28);
        let window = SearchWindow::centered(params(0.2, 5, 4.0, 9));

        let res = Aligner::new(&frames)
            .diffind(&region.sample, 0, 1, &window)
            .expect("diffind");
        assert_eq!(res.delta, Pose::new(0.0, 3.0, -2.0));
        assert_eq!(res.score, 0.0);
    }

    #[test]
    fn delta_is_relative_to_window_center() {
        let frames = FrameSequence::new(vec![texture(64, 64), shifted_texture(64, 64, 5, 1)]);
        let region = block_region(20, 20, 32, 28);
        let window = SearchWindow::new(params(0.0, 1, 2.0, 5), Pose::new(0.0, 4.0, 0.0));

        let res = Aligner::new(&frames)
            .diffind(&region.sample, 0, 1, &window)
            .expect("diffind");
        assert_eq!(res.delta, Pose::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn ties_resolve_to_first_hypothesis() {
        let frames = FrameSequence::new(vec![Frame::filled(32, 32, 0.5)]);
        let region = block_region(12, 12, 18, 16);
        let window = SearchWindow::centered(params(0.1, 3, 2.0, 5));

        let res = Aligner::new(&frames)
            .diffind(&region.sample, 0, 0, &window)
            .expect("diffind");
        assert_eq!(res.delta, Pose::new(-0.1, -2.0, -2.0));
    }

    #[test]
    fn degenerate_window_scores_single_hypothesis() {
        let frames = FrameSequence::new(vec![texture(32, 32), shifted_texture(32, 32, 1, 0)]);
        let region = block_region(10, 10, 16, 14);
        let window = SearchWindow::centered(params(0.3, 1, 5.0, 1));

        let res = Aligner::new(&frames)
            .diffind(&region.sample, 0, 1, &window)
            .expect("diffind");
        assert_eq!(res.delta, Pose::IDENTITY);
        assert_eq!(res.evaluated, 1);
        assert!(res.score > 0.0);
    }

    #[test]
    fn out_of_bounds_hypotheses_are_skipped_by_default() {
        let frames = FrameSequence::new(vec![texture(8, 8)]);
        let region = block_region(3, 3, 5, 5);
        let window = SearchWindow::centered(params(0.0, 1, 6.0, 3));

        let res = Aligner::new(&frames)
            .diffind(&region.sample, 0, 0, &window)
            .expect("diffind");
        assert_eq!(res.delta, Pose::IDENTITY);
        assert_eq!(res.evaluated, 1);
        assert_eq!(res.skipped, 8);
    }

    #[test]
    fn abort_policy_fails_on_first_outside_hypothesis() {
        let frames = FrameSequence::new(vec![texture(8, 8)]);
        let region = block_region(3, 3, 5, 5);
        let window = SearchWindow::centered(params(0.0, 1, 6.0, 3));

        let err = Aligner::new(&frames)
            .with_policy(OutOfBoundsPolicy::Abort)
            .diffind(&region.sample, 0, 0, &window)
            .unwrap_err();
        assert_eq!(
            err,
            AlignError::OutOfBounds {
                reference: 0,
                target: 0,
                rotation: 0.0,
                tx: -6.0,
                ty: -6.0,
            }
        );
    }

    #[test]
    fn all_hypotheses_outside_is_an_error() {
        let frames = FrameSequence::new(vec![texture(8, 8)]);
        let region = block_region(3, 3, 5, 5);
        let window = SearchWindow::centered(params(0.0, 1, 6.0, 2));

        let err = Aligner::new(&frames)
            .diffind(&region.sample, 0, 0, &window)
            .unwrap_err();
        assert!(matches!(err, AlignError::OutOfBounds { target: 0, .. }));
    }

    #[test]
    fn reference_outside_frame_is_reported() {
        let frames = FrameSequence::new(vec![texture(8, 8)]);
        let sample =
            RegionSample::from_coords(vec![Point2::new(2.0, 2.0), Point2::new(9.0, 3.0)]).unwrap();
        let window = SearchWindow::centered(params(0.0, 1, 0.0, 1));

        let err = Aligner::new(&frames)
            .diffind(&sample, 0, 0, &window)
            .unwrap_err();
        assert_eq!(
            err,
            AlignError::ReferenceOutOfBounds {
                frame: 0,
                row: 3,
                col: 9
            }
        );
    }

    #[test]
    fn rejects_bad_window_and_frame_index() {
        let frames = FrameSequence::new(vec![texture(16, 16)]);
        let region = block_region(5, 5, 9, 9);
        let aligner = Aligner::new(&frames);

        let zero = SearchWindow::centered(params(0.1, 0, 1.0, 3));
        assert!(matches!(
            aligner.diffind(&region.sample, 0, 0, &zero),
            Err(AlignError::InvalidWindow { .. })
        ));

        let ok = SearchWindow::centered(params(0.1, 3, 1.0, 3));
        assert_eq!(
            aligner.diffind(&region.sample, 0, 2, &ok),
            Err(AlignError::FrameIndex { index: 2, len: 1 })
        );
    }
}
