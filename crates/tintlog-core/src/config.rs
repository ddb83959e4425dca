//! Logger configuration
//!
//! A `LoggerConfig` is owned by the embedding application and handed to
//! [`Logger::new`](crate::Logger::new) or [`Logger::reset`](crate::Logger::reset).
//! It can be built in code, loaded from JSON, and overridden from the
//! environment or the `-debug` command-line flag.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LogError, Result};
use crate::flags;
use crate::severity::Severity;

/// File name of the default log file under the platform temp directory
pub const LOG_FILE_NAME: &str = "tintlog.log";

/// Environment variable overrides read by [`LoggerConfig::apply_env`]
pub mod env_keys {
    pub const DEBUG: &str = "TINTLOG_DEBUG";
    pub const LOG_PATH: &str = "TINTLOG_LOG_PATH";
    pub const COLOR: &str = "TINTLOG_COLOR";
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Default log file location: `<temp_dir>/tintlog.log`
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Sub-second precision of the record timestamp
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    Seconds,
    Millis,
    #[default]
    Micros,
}

/// Record header layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LineFlags {
    /// Include the date (`2009/01/23`)
    pub date: bool,

    /// Include the time of day (`01:23:23`)
    pub time: bool,

    /// Fractional seconds appended to the time of day
    pub precision: TimePrecision,

    /// Render timestamps in UTC instead of local time
    pub utc: bool,

    /// Insert `file.rs:LINE: ` of the call site before the message
    pub caller: bool,

    /// Place the prefix after the timestamp instead of at the start of the line
    pub prefix_after_timestamp: bool,
}

impl Default for LineFlags {
    fn default() -> Self {
        Self {
            date: false,
            time: true,
            precision: TimePrecision::Micros,
            utc: false,
            caller: false,
            prefix_after_timestamp: false,
        }
    }
}

impl LineFlags {
    /// chrono format string for the timestamp, or `None` when no timestamp is written
    pub fn timestamp_format(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if self.date {
            parts.push("%Y/%m/%d".to_string());
        }
        if self.time {
            let fraction = match self.precision {
                TimePrecision::Seconds => "",
                TimePrecision::Millis => "%.3f",
                TimePrecision::Micros => "%.6f",
            };
            parts.push(format!("%H:%M:%S{}", fraction));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Prefix labels, one per severity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Prefixes {
    pub info: String,
    pub debug: String,
    pub error: String,
    pub panic: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            info: Severity::Info.default_label().to_string(),
            debug: Severity::Debug.default_label().to_string(),
            error: Severity::Error.default_label().to_string(),
            panic: Severity::Panic.default_label().to_string(),
        }
    }
}

impl Prefixes {
    pub fn label(&self, severity: Severity) -> &str {
        match severity {
            Severity::Info => &self.info,
            Severity::Debug => &self.debug,
            Severity::Error => &self.error,
            Severity::Panic => &self.panic,
        }
    }
}

/// Console stream the sink writes to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Emit debug records and compute trace breadcrumbs
    pub debug: bool,

    /// Color and bold the prefixes on the console destination
    pub color_prefixes: bool,

    /// Also color the prefixes in the log file
    pub color_file: bool,

    /// Console stream
    pub console: ConsoleTarget,

    /// Log file mirrored from the console; `None` logs to the console only
    pub log_path: Option<PathBuf>,

    /// Prefix labels
    pub prefixes: Prefixes,

    /// Grey intensity of the debug prefix (0..=23)
    pub debug_grey_level: u8,

    /// Timestamp and header layout
    pub line_flags: LineFlags,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            color_prefixes: true,
            color_file: false,
            console: ConsoleTarget::Stderr,
            log_path: Some(default_log_path()),
            prefixes: Prefixes::default(),
            debug_grey_level: 11,
            line_flags: LineFlags::default(),
        }
    }
}

impl LoggerConfig {
    /// Default config without the file sink
    pub fn console_only() -> Self {
        Self {
            log_path: None,
            ..Default::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn without_log_file(mut self) -> Self {
        self.log_path = None;
        self
    }

    pub fn with_color(mut self, color_prefixes: bool) -> Self {
        self.color_prefixes = color_prefixes;
        self
    }

    pub fn with_line_flags(mut self, line_flags: LineFlags) -> Self {
        self.line_flags = line_flags;
        self
    }

    pub fn with_prefixes(mut self, prefixes: Prefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LogError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Override fields from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup
    ///
    /// - `TINTLOG_DEBUG`: boolean
    /// - `TINTLOG_LOG_PATH`: file path; empty or `off` disables the file sink
    /// - `TINTLOG_COLOR`: boolean
    /// - `NO_COLOR`: any non-empty value disables colored prefixes
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env_keys::DEBUG) {
            self.debug = flags::parse_bool(&value)?;
        }

        if let Some(value) = lookup(env_keys::LOG_PATH) {
            let trimmed = value.trim();
            self.log_path = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("off") {
                None
            } else {
                Some(PathBuf::from(trimmed))
            };
        }

        if let Some(value) = lookup(env_keys::COLOR) {
            self.color_prefixes = flags::parse_bool(&value)?;
        }

        if lookup(env_keys::NO_COLOR).is_some_and(|v| !v.is_empty()) {
            self.color_prefixes = false;
        }

        Ok(self)
    }

    /// Fold a `-debug` flag from command-line arguments into the config.
    ///
    /// Leaves `debug` untouched when the flag is absent.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(debug) = flags::debug_flag(args)? {
            self.debug = debug;
        }
        Ok(self)
    }
}
