//! File-based logging using simplelog
//!
//! The terminal belongs to the UI, so log lines go to
//! `<cache dir>/browserselector/browserselector.log` instead.

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

use crate::config::APP_DIR;

fn log_file_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join(APP_DIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("browserselector.log"))
}

fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(str::to_lowercase).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize file logging. `verbose` forces the `debug` level, otherwise
/// `RUST_LOG` decides.
///
/// Returns the log file path, or `None` when logging could not be set up.
pub fn init(verbose: bool) -> Option<PathBuf> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        level_from_env(std::env::var("RUST_LOG").ok().as_deref())
    };

    let path = log_file_path()?;
    let file = File::options().create(true).append(true).open(&path).ok()?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, config, file).ok()?;

    Some(path)
}
