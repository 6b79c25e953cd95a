//! Grayscale intensity frames.

/// Errors produced when building frames from raw buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame buffer length (expected {expected} samples, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },
}

/// Immutable 2-D grid of floating-point intensity samples.
///
/// Samples are stored row-major. Rows run vertically and columns
/// horizontally; intensities are expected in `[0, 1]` but the type does not
/// enforce it.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Frame {
    /// Wrap a row-major buffer of `width * height` samples.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, FrameError> {
        let expected = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(FrameError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(FrameError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a frame by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Constant-intensity frame.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major sample buffer.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Sample at an integer pixel; `None` outside the frame.
    #[inline]
    pub fn get(&self, row: i64, col: i64) -> Option<f32> {
        if !self.contains(row, col) {
            return None;
        }
        Some(self.data[row as usize * self.width + col as usize])
    }

    /// Write a sample, silently clipping pixels outside the frame.
    #[inline]
    pub fn put(&mut self, row: i64, col: i64, value: f32) {
        if self.contains(row, col) {
            self.data[row as usize * self.width + col as usize] = value;
        }
    }
}

/// Ordered, randomly indexable sequence of frames.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn get(&self, n: usize) -> Option<&Frame> {
        self.frames.get(n)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

impl From<Vec<Frame>> for FrameSequence {
    fn from(frames: Vec<Frame>) -> Self {
        Self::new(frames)
    }
}

/// Supplier of an ordered frame sequence, consumed once at session start.
pub trait FrameSource {
    type Error: std::error::Error;

    fn load(&self) -> Result<FrameSequence, Self::Error>;
}

impl FrameSource for FrameSequence {
    type Error = std::convert::Infallible;

    fn load(&self) -> Result<FrameSequence, Self::Error> {
        Ok(self.clone())
    }
}
