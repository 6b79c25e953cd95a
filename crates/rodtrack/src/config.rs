//! JSON configuration and report helpers for tracking runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rodtrack_core::RectSpec;
use rodtrack_tracking::{StepRecord, TrackMode, TrackParams, TrackResult};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_max_frames() -> usize {
    10
}

fn default_bit_depth() -> u32 {
    8
}

/// Configuration for one tracking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    /// File pattern with a `{}` or `{:0N}` placeholder for the 1-based frame number.
    pub frames: String,
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u32,
    /// Initial marker rectangle. Anchored runs sample it from frame 0,
    /// incremental runs from frame `tracking.start`.
    pub marker: RectSpec,
    #[serde(default)]
    pub tracking: TrackParams,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Overlay of the full path on the last tracked frame.
    #[serde(default)]
    pub path_image: Option<String>,
    /// Directory receiving one `pt{k}.png` overlay per tracked frame.
    #[serde(default)]
    pub export_dir: Option<String>,
}

impl TrackConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("rodtrack_report.json"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load_frames: u64,
    pub track: u64,
    pub render: u64,
    pub total: u64,
}

/// Tracking report: cumulative poses per processed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackReport {
    pub frames: String,
    pub config_path: String,
    pub num_frames: usize,
    pub marker: RectSpec,
    pub mode: TrackMode,
    pub start: usize,
    /// Resolved last frame index.
    pub lind: Option<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Cumulative rotation in radians.
    pub rotation: Vec<f64>,
    pub rotation_deg: Vec<f64>,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
    #[serde(default)]
    pub timings_ms: TimingsMs,
    #[serde(default)]
    pub error: Option<String>,
}

impl TrackReport {
    /// Base report for a config before tracking ran.
    pub fn new(cfg: &TrackConfig, config_path: &Path, num_frames: usize) -> Self {
        Self {
            frames: cfg.frames.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            num_frames,
            marker: cfg.marker,
            mode: cfg.tracking.mode,
            start: cfg.tracking.start,
            lind: None,
            x: Vec::new(),
            y: Vec::new(),
            rotation: Vec::new(),
            rotation_deg: Vec::new(),
            steps: Vec::new(),
            timings_ms: TimingsMs::default(),
            error: None,
        }
    }

    /// Populate the trajectory from a finished run.
    pub fn set_result(&mut self, res: &TrackResult) {
        let t = &res.trajectory;
        self.mode = res.mode;
        self.start = res.start;
        self.lind = Some(res.last);
        self.x = t.x.clone();
        self.y = t.y.clone();
        self.rotation = t.rotation.clone();
        self.rotation_deg = t.rotation.iter().map(|r| r.to_degrees()).collect();
        self.steps = res.steps.clone();
        self.error = None;
    }

    /// Record a failure.
    pub fn set_error(&mut self, err: &dyn std::error::Error) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
