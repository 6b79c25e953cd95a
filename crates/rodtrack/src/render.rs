//! Overlays of the tracked outline and trajectory on top of frames.
//!
//! Marks are written at intensity [`MARK`]; pixels that fall outside the
//! frame are clipped.

use std::path::{Path, PathBuf};

use log::info;
use nalgebra::Point2;
use rodtrack_core::{line, Frame, FrameSequence, MarkerOutline, Pixel, Pose};
use rodtrack_tracking::{TrackResult, Trajectory};

use crate::io::save_frame_png;

/// Intensity used for drawn overlays.
pub const MARK: f32 = 1.0;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("trajectory entry {index} out of range (len {len})")]
    EntryOutOfRange { index: i64, len: usize },

    #[error("frame {index} not in sequence (len {len})")]
    MissingFrame { index: usize, len: usize },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Copy of `frame` with the outline perimeter drawn on it.
pub fn render_outline(frame: &Frame, outline: &MarkerOutline) -> Frame {
    let mut out = frame.clone();
    draw_pixels(&mut out, outline.perimeter());
    out
}

/// The initial outline carried to trajectory entry `i`.
///
/// Vertices are taken relative to entry 0, rotated by `rotation[i]` and
/// placed at `(x[i], y[i])`.
pub fn outline_at(
    outline: &MarkerOutline,
    trajectory: &Trajectory,
    i: usize,
) -> Option<MarkerOutline> {
    let origin = trajectory.pose(0)?;
    let delta = trajectory.displacement(i)?;
    Some(outline.posed_about(Point2::new(origin.tx, origin.ty), &delta))
}

/// Resolve a possibly negative entry index against a trajectory length.
fn resolve_entry(n: i64, len: usize) -> Result<usize, RenderError> {
    let i = if n < 0 { len as i64 + n } else { n };
    if i < 0 || i >= len as i64 {
        return Err(RenderError::EntryOutOfRange { index: n, len });
    }
    Ok(i as usize)
}

/// Frame of entry `n` with the path up to `n` and the outline posed at `n`.
///
/// Entry `n` (negative counts from the end) belongs to frame
/// `result.start + n`. With `outline_only` the path lines are omitted.
pub fn render_path(
    frames: &FrameSequence,
    result: &TrackResult,
    outline: &MarkerOutline,
    n: i64,
    outline_only: bool,
) -> Result<Frame, RenderError> {
    let trajectory = &result.trajectory;
    let i = resolve_entry(n, trajectory.len())?;
    let index = result.start + i;
    let frame = frames.get(index).ok_or(RenderError::MissingFrame {
        index,
        len: frames.len(),
    })?;

    let mut out = frame.clone();
    if !outline_only {
        for k in 1..=i {
            if let (Some(a), Some(b)) = (trajectory.pose(k - 1), trajectory.pose(k)) {
                draw_pixels(&mut out, line(position(&a), position(&b)));
            }
        }
    }
    if let Some(posed) = outline_at(outline, trajectory, i) {
        draw_pixels(&mut out, posed.perimeter());
    }
    Ok(out)
}

/// Write `pt{k}.png` into `dir` for every trajectory entry.
pub fn export_sequence(
    frames: &FrameSequence,
    result: &TrackResult,
    outline: &MarkerOutline,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, RenderError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(result.trajectory.len());
    for k in 0..result.trajectory.len() {
        let frame = render_path(frames, result, outline, k as i64, false)?;
        let path = dir.join(format!("pt{k}.png"));
        save_frame_png(&frame, &path)?;
        written.push(path);
    }
    info!("exported {} overlays to {}", written.len(), dir.display());
    Ok(written)
}

fn position(pose: &Pose) -> Pixel {
    Pixel::nearest(Point2::new(pose.tx, pose.ty))
}

fn draw_pixels(frame: &mut Frame, pixels: impl IntoIterator<Item = Pixel>) {
    for p in pixels {
        frame.put(p.row, p.col, MARK);
    }
}
