//! Logging setup
//!
//! The engine logs through the `log` facade. Binaries call [`init`] once to
//! install an `env_logger` backend that prints `(timestamp module:line LEVEL)`
//! prefixed lines to stderr and, when a debug log path is configured, appends
//! the same lines to that file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use log::{debug, error, info, trace, warn, LevelFilter};

use crate::config::Config;

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level; `None` picks Debug in debug builds and Warn otherwise
    pub level: Option<String>,

    /// Optional debug log file, opened in append mode
    pub file: Option<PathBuf>,
}

impl Config for LogConfig {}

impl LogConfig {
    /// Config that also appends to `path`
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    /// Resolve the configured level
    ///
    /// Unparseable names fall back to the build default.
    pub fn level_filter(&self) -> LevelFilter {
        let build_default = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        self.level
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(build_default)
    }
}

/// Writes every line to stderr and to the debug log file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Initialize the logging system
///
/// A log file that cannot be opened is reported on stderr and logging
/// continues there alone. Fails only if a global logger is already set.
pub fn init(config: &LogConfig) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.level_filter()).format(|buf, record| {
        writeln!(
            buf,
            "({} {}:{} {}): {}",
            buf.timestamp_seconds(),
            record.module_path().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.level(),
            record.args()
        )
    });

    let mut file_error = None;
    if let Some(path) = &config.file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder
                    .write_style(env_logger::WriteStyle::Never)
                    .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
            }
            Err(e) => file_error = Some((path.clone(), e)),
        }
    }

    builder.try_init()?;

    if let Some((path, e)) = file_error {
        log::error!("failed to open the log file {}: {e}", path.display());
    }
    Ok(())
}
