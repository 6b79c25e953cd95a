//! Frame loading from numbered image files and PNG output.
//!
//! File names are produced from a pattern with one index placeholder,
//! `{}` or `{:0N}` (zero padded to `N` digits), filled with the 1-based
//! frame number: frame `k` of the sequence is read from index `k + 1`.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma};
use log::{debug, info};
use rodtrack_core::{Frame, FrameError, FrameSequence, FrameSource};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while loading frames.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("frame pattern {pattern:?} has no `{{}}` or `{{:0N}}` placeholder")]
    InvalidPattern { pattern: String },

    #[error("first frame {path} not found")]
    NoFrames { path: PathBuf },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("frame {index} has size {got:?}, expected {expected:?}")]
    SizeMismatch {
        index: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Substitute `index` into the first placeholder of `pattern`.
///
/// Returns `None` if the pattern has no supported placeholder.
pub fn format_frame_path(pattern: &str, index: usize) -> Option<String> {
    let open = pattern.find('{')?;
    let close = open + pattern[open..].find('}')?;
    let number = match &pattern[open + 1..close] {
        "" => index.to_string(),
        spec => {
            let spec = spec.strip_prefix(':')?;
            let (zero, digits) = match spec.strip_prefix('0') {
                Some(rest) => (true, rest),
                None => (false, spec),
            };
            let width: usize = digits.parse().ok()?;
            if zero {
                format!("{index:0width$}")
            } else {
                format!("{index:width$}")
            }
        }
    };
    Some(format!("{}{}{}", &pattern[..open], number, &pattern[close + 1..]))
}

/// Numbered image files on disk, read as one [`FrameSequence`].
#[derive(Clone, Debug)]
pub struct PatternSource {
    pattern: String,
    max_frames: usize,
    bit_depth: u32,
}

impl PatternSource {
    pub fn new(pattern: impl Into<String>, max_frames: usize) -> Self {
        Self {
            pattern: pattern.into(),
            max_frames,
            bit_depth: 8,
        }
    }

    /// Samples are divided by `2^bit_depth`.
    pub fn with_bit_depth(mut self, bit_depth: u32) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Path of sequence frame `k` (file index `k + 1`).
    pub fn path_for(&self, k: usize) -> Result<PathBuf, LoadError> {
        format_frame_path(&self.pattern, k + 1)
            .map(PathBuf::from)
            .ok_or_else(|| LoadError::InvalidPattern {
                pattern: self.pattern.clone(),
            })
    }
}

impl FrameSource for PatternSource {
    type Error = LoadError;

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(pattern = %self.pattern, max = self.max_frames))
    )]
    fn load(&self) -> Result<FrameSequence, LoadError> {
        let mut frames: Vec<Frame> = Vec::with_capacity(self.max_frames);
        for k in 0..self.max_frames {
            let path = self.path_for(k)?;
            if !path.is_file() {
                if k == 0 {
                    return Err(LoadError::NoFrames { path });
                }
                break;
            }
            let img = image::open(&path).map_err(|source| LoadError::Decode {
                path: path.clone(),
                source,
            })?;
            let frame = frame_from_image(img, self.bit_depth)?;
            if let Some(first) = frames.first() {
                let expected = (first.width(), first.height());
                let got = (frame.width(), frame.height());
                if expected != got {
                    return Err(LoadError::SizeMismatch {
                        index: k,
                        expected,
                        got,
                    });
                }
            }
            debug!("loaded {} ({}x{})", path.display(), frame.width(), frame.height());
            frames.push(frame);
        }
        info!("{} images read", frames.len());
        Ok(FrameSequence::new(frames))
    }
}

/// Load up to `max_frames` numbered frames matching `pattern`.
pub fn load_sequence(
    pattern: &str,
    max_frames: usize,
    bit_depth: u32,
) -> Result<FrameSequence, LoadError> {
    PatternSource::new(pattern, max_frames)
        .with_bit_depth(bit_depth)
        .load()
}

/// Convert a decoded image into a frame scaled by `2^-bit_depth`.
///
/// 16-bit grayscale keeps its raw values; every other layout is reduced to
/// 8-bit luma first.
pub fn frame_from_image(img: DynamicImage, bit_depth: u32) -> Result<Frame, FrameError> {
    let scale = (-(bit_depth as f32)).exp2();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let data: Vec<f32> = match img {
        DynamicImage::ImageLuma16(buf) => buf
            .into_raw()
            .into_iter()
            .map(|v| v as f32 * scale)
            .collect(),
        other => other
            .into_luma8()
            .into_raw()
            .into_iter()
            .map(|v| v as f32 * scale)
            .collect(),
    };
    Frame::new(width, height, data)
}

/// Map `[0, 1]` intensities to 8-bit gray, clamping out-of-range samples.
pub fn frame_to_gray(frame: &Frame) -> GrayImage {
    let width = frame.width() as u32;
    GrayImage::from_fn(width, frame.height() as u32, |col, row| {
        let v = frame.data()[row as usize * frame.width() + col as usize];
        Luma([(v.clamp(0.0, 1.0) * 255.0).round() as u8])
    })
}

/// Write a frame as an 8-bit grayscale PNG.
pub fn save_frame_png(frame: &Frame, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
    frame_to_gray(frame).save_with_format(path, image::ImageFormat::Png)
}
