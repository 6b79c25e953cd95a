//! High-level facade for the `rodtrack-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core model and tracking crates
//! - (feature `image`) frame loading from numbered image files, trajectory
//!   rendering and PNG export
//! - JSON configuration and report types shared by the `rodtrack` CLI
//!
//! ## Quickstart
//!
//! ```no_run
//! use rodtrack::io::load_sequence;
//! use rodtrack::core::{MarkerRegion, RectSpec};
//! use rodtrack::tracking::{PathTracker, TrackParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frames = load_sequence("rod/rod{:05}.png", 10, 8)?;
//! let marker = MarkerRegion::from_rect(&RectSpec {
//!     x: 172.0,
//!     y: 480.0,
//!     w: 30.0,
//!     l: 150.0,
//!     angle: 23f64.to_radians(),
//! })?;
//! let result = PathTracker::new(&frames, TrackParams::default()).run(&marker)?;
//! println!("tracked {} frames", result.trajectory.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `rodtrack::core`: frames, poses, marker region model and rasterizer.
//! - `rodtrack::tracking`: exhaustive pose search and the two tracking modes.
//! - `rodtrack::io` (feature `image`): numbered-file frame loader and PNG output.
//! - `rodtrack::render` (feature `image`): trajectory overlays.
//! - `rodtrack::config`: JSON run configuration and report.

pub use rodtrack_core as core;
pub use rodtrack_tracking as tracking;

pub use rodtrack_core::{Frame, FrameSequence, MarkerRegion, Pose, RectSpec};
pub use rodtrack_tracking::{PathTracker, TrackMode, TrackParams, TrackResult, Trajectory};

pub mod config;

#[cfg(feature = "image")]
pub mod io;
#[cfg(feature = "image")]
pub mod render;
#[cfg(feature = "image")]
mod session;

#[cfg(feature = "image")]
pub use session::{RunError, TrackSession};
