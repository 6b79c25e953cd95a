use std::{path::PathBuf, time::Instant};

use clap::{Parser, ValueEnum};
use log::{error, info};
use rodtrack::config::{TrackConfig, TrackReport};
use rodtrack::io::save_frame_png;
use rodtrack::render::{export_sequence, render_path, RenderError};
use rodtrack::{TrackMode, TrackResult, TrackSession};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Anchored,
    Incremental,
}

impl From<ModeArg> for TrackMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Anchored => TrackMode::Anchored,
            ModeArg::Incremental => TrackMode::Incremental,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Track a rigid marker through a numbered image sequence.
#[derive(Parser, Debug)]
#[command(name = "rodtrack", version, about)]
struct Cli {
    /// JSON run configuration.
    config: PathBuf,

    /// Override the tracking mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Override the first step index.
    #[arg(long)]
    start: Option<usize>,

    /// Override the stop index (negative counts from the end).
    #[arg(long, allow_hyphen_values = true)]
    stop: Option<i64>,

    /// Override the report path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level. With the `tracing` feature `RUST_LOG` is used instead.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Emit JSON tracing events instead of plain log lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    log_json: bool,
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    rodtrack::core::init_tracing(cli.log_json);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // `SetLoggerError` is only a `std::error::Error` with `log/std`.
    rodtrack::core::init_with_level(cli.log_level.into()).map_err(|e| e.to_string())?;
    Ok(())
}

/// Path overlay on the last tracked frame and the per-frame export, as configured.
fn write_overlays(
    cfg: &TrackConfig,
    session: &TrackSession,
    res: &TrackResult,
) -> Result<(), RenderError> {
    let outline = &session.marker.outline;
    if let Some(path) = cfg.path_image.as_ref() {
        let frame = render_path(&session.frames, res, outline, -1, false)?;
        save_frame_png(&frame, path)?;
        info!("wrote path overlay to {path}");
    }
    if let Some(dir) = cfg.export_dir.as_ref() {
        export_sequence(&session.frames, res, outline, dir)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut cfg = TrackConfig::load_json(&cli.config)?;
    if let Some(mode) = cli.mode {
        cfg.tracking.mode = mode.into();
    }
    if let Some(start) = cli.start {
        cfg.tracking.start = start;
    }
    if let Some(stop) = cli.stop {
        cfg.tracking.stop = stop;
    }
    if let Some(output) = cli.output.as_ref() {
        cfg.output_path = Some(output.to_string_lossy().into_owned());
    }

    let t_total = Instant::now();
    let t_load = Instant::now();
    let session = TrackSession::open(&cfg)?;
    let load_ms = t_load.elapsed().as_millis() as u64;

    let mut report = TrackReport::new(&cfg, &cli.config, session.frames.len());
    report.timings_ms.load_frames = load_ms;

    let t_track = Instant::now();
    let outcome = session.track(&cfg.tracking);
    report.timings_ms.track = t_track.elapsed().as_millis() as u64;

    let t_render = Instant::now();
    match outcome {
        Ok(res) => {
            report.set_result(&res);
            if let Err(err) = write_overlays(&cfg, &session, &res) {
                error!("writing overlays failed: {err}");
                report.set_error(&err);
            }
        }
        Err(err) => {
            error!("tracking failed: {err}");
            report.set_error(&err);
        }
    }
    report.timings_ms.render = t_render.elapsed().as_millis() as u64;
    report.timings_ms.total = t_total.elapsed().as_millis() as u64;

    let output_path = cfg.output_path();
    report.write_json(&output_path)?;
    println!("wrote report JSON to {}", output_path.display());

    if let Some(err) = report.error {
        return Err(err.into());
    }
    Ok(())
}
