//! Core types for rigid marker tracking in grayscale image sequences.
//!
//! This crate is purely geometric: frames, the marker region model, poses and
//! a small rasterizer. It does not decode images and knows nothing about the
//! search or tracking strategies built on top of it.
//!
//! Coordinates follow the image convention: `x` is the column, `y` the row.

mod image;
mod logger;
mod pose;
mod raster;
mod region;

pub use image::{Frame, FrameError, FrameSequence, FrameSource};
pub use pose::{Pose, PosePlacer};
pub use raster::{fill_polygon, line, polygon_perimeter, Pixel};
pub use region::{MarkerOutline, MarkerRegion, RectSpec, RegionError, RegionSample};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
