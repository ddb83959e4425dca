//! Output sink - console destination plus an optional mirrored log file
//!
//! A record is fully rendered before any lock is taken and goes out to each
//! destination in a single `write_all`. The sink holds one fan-out lock across
//! all destinations, so every destination sees records in the same order.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ConsoleTarget, LoggerConfig};
use crate::error::{LogError, Result};

/// Unix permission bits of a newly created log file
pub const LOG_FILE_MODE: u32 = 0o775;

/// A single writer plus its color policy
pub struct Destination {
    writer: Mutex<Box<dyn Write + Send>>,
    colored: bool,
    path: Option<PathBuf>,
}

impl Destination {
    /// Wrap an arbitrary writer
    pub fn new(writer: impl Write + Send + 'static, colored: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            colored,
            path: None,
        }
    }

    /// Console stream destination
    pub fn console(target: ConsoleTarget, colored: bool) -> Self {
        match target {
            ConsoleTarget::Stderr => Self::new(std::io::stderr(), colored),
            ConsoleTarget::Stdout => Self::new(std::io::stdout(), colored),
        }
    }

    /// Open `path` for appending, creating it if needed
    pub fn open_file(path: impl AsRef<Path>, colored: bool) -> Result<Self> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(LOG_FILE_MODE);
        }

        let file = options.open(path).map_err(|source| LogError::OpenLogFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::new(file, colored)
        })
    }

    /// Whether this destination receives colored prefixes
    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// File path, for file destinations
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write one complete line. Failures are dropped.
    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock();
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Destination")
            .field("colored", &self.colored)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Fan-out of the console destination and an optional file destination
#[derive(Debug)]
pub struct Sink {
    console: Destination,
    file: Option<Destination>,
    fan_out: Mutex<()>,
}

impl Sink {
    pub fn new(console: Destination) -> Self {
        Self {
            console,
            file: None,
            fan_out: Mutex::new(()),
        }
    }

    /// Add (or replace) the mirrored file destination
    pub fn with_file(mut self, file: Destination) -> Self {
        self.file = Some(file);
        self
    }

    /// Console-only sink for `config`
    pub fn console_only(config: &LoggerConfig) -> Self {
        Self::new(Destination::console(config.console, config.color_prefixes))
    }

    /// Build the sink described by `config`.
    ///
    /// Fails if the configured log file cannot be opened.
    pub fn open(config: &LoggerConfig) -> Result<Self> {
        let sink = Self::console_only(config);
        match &config.log_path {
            Some(path) => Ok(sink.with_file(Destination::open_file(path, config.color_file)?)),
            None => Ok(sink),
        }
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the mirrored log file, if any
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().and_then(Destination::path)
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        std::iter::once(&self.console).chain(self.file.as_ref())
    }

    /// Write one record to every destination.
    ///
    /// `render(colored)` is called at most once per color mode.
    pub(crate) fn write_with<F>(&self, render: F)
    where
        F: Fn(bool) -> String,
    {
        let mut plain: Option<String> = None;
        let mut colored: Option<String> = None;
        for destination in self.destinations() {
            let slot = if destination.is_colored() {
                &mut colored
            } else {
                &mut plain
            };
            slot.get_or_insert_with(|| render(destination.is_colored()));
        }

        let _order = self.fan_out.lock();
        for destination in self.destinations() {
            let line = if destination.is_colored() {
                colored.as_deref()
            } else {
                plain.as_deref()
            };
            if let Some(line) = line {
                destination.write_line(line);
            }
        }
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Useful for capturing log output (log panes, tests).
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<BufferState>>,
}

#[derive(Debug, Default)]
struct BufferState {
    bytes: Vec<u8>,
    writes: usize,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().bytes).into_owned()
    }

    /// Written content split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Number of `write` calls received
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().bytes.is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut state = self.inner.lock();
        state.bytes.extend_from_slice(buf);
        state.writes += 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
