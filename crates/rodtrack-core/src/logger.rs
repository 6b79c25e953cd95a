//! Stderr logger for tracking runs.
//!
//! Lines look like `[   1.234s  INFO tracker] message`: time since the
//! logger was installed, level, and the last segment of the record's module
//! path. Records from the `rodtrack*` crates pass at the configured level;
//! everything else (image decoders, rayon) is capped at `warn` so a `debug`
//! run shows per-hypothesis search output without dependency chatter.
//! Install it once at startup with [`init_with_level`].

use std::fmt::Write as _;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Crate prefix whose records follow the configured level.
const OWN_TARGET: &str = "rodtrack";
/// Ceiling for records from other crates.
const FOREIGN_CEILING: LevelFilter = LevelFilter::Warn;

struct RunLogger {
    level: LevelFilter,
    started: Instant,
}

impl RunLogger {
    fn level_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET) {
            self.level
        } else {
            self.level.min(FOREIGN_CEILING)
        }
    }
}

/// Render one log line without the trailing newline.
fn format_line(elapsed_secs: f64, level: Level, target: &str, message: &str) -> String {
    let short = target.rsplit("::").next().unwrap_or(target);
    let mut line = String::with_capacity(message.len() + 32);
    let _ = write!(line, "[{elapsed_secs:9.3}s {level:>5} {short}] {message}");
    line
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<RunLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs the logger; later calls keep the original
/// level and return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| RunLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Default `tracing` directives when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
const DEFAULT_DIRECTIVES: &str = "warn,rodtrack=info,rodtrack_core=info,rodtrack_tracking=info";

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG`, the workspace crates log at `info` and everything else
/// at `warn`. Span close events are reported, which gives per-step and
/// per-search timings for instrumented functions.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: LevelFilter) -> RunLogger {
        RunLogger {
            level,
            started: Instant::now(),
        }
    }

    #[test]
    fn line_uses_last_target_segment() {
        let line = format_line(1.5, Level::Info, "rodtrack_tracking::tracker::pipeline", "0 to 1");
        assert_eq!(line, "[    1.500s  INFO pipeline] 0 to 1");
        assert_eq!(
            format_line(0.0, Level::Warn, "png", "chunk"),
            "[    0.000s  WARN png] chunk"
        );
    }

    #[test]
    fn foreign_targets_are_capped_at_warn() {
        let l = logger(LevelFilter::Debug);
        assert_eq!(l.level_for("rodtrack_tracking::aligner::search"), LevelFilter::Debug);
        assert_eq!(l.level_for("image::codecs::png"), LevelFilter::Warn);

        let quiet = logger(LevelFilter::Error);
        assert_eq!(quiet.level_for("image"), LevelFilter::Error);
        assert_eq!(quiet.level_for("rodtrack"), LevelFilter::Error);
    }
}
