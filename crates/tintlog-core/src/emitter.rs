//! Severity emitter - formats one record and hands it to the sink

use chrono::{Local, Utc};
use std::fmt::Write as _;
use std::panic::Location;
use std::sync::Arc;

use crate::config::{LineFlags, LoggerConfig};
use crate::severity::Severity;
use crate::sink::Sink;

/// Source position shown when `LineFlags::caller` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }
}

impl<'a> From<&'a Location<'a>> for CallSite<'a> {
    fn from(location: &'a Location<'a>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// A severity-bound channel: prefix, header layout, and the shared sink.
#[derive(Debug)]
pub struct Emitter {
    prefix: String,
    colored_prefix: String,
    timestamp_format: Option<String>,
    flags: LineFlags,
    sink: Arc<Sink>,
}

impl Emitter {
    pub fn new(severity: Severity, config: &LoggerConfig, sink: Arc<Sink>) -> Self {
        let label = config.prefixes.label(severity);
        let colored_prefix = severity
            .style(label, config.debug_grey_level)
            .to_string();

        Self {
            prefix: label.to_string(),
            colored_prefix,
            timestamp_format: config.line_flags.timestamp_format(),
            flags: config.line_flags.clone(),
            sink,
        }
    }

    /// Uncolored prefix label
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Write `message` as one record on every sink destination
    pub fn emit(&self, message: &str, caller: Option<CallSite<'_>>) {
        let timestamp = self.timestamp();
        let caller = caller.filter(|_| self.flags.caller);
        self.sink
            .write_with(|colored| self.render(timestamp.as_deref(), message, caller, colored));
    }

    fn timestamp(&self) -> Option<String> {
        let format = self.timestamp_format.as_deref()?;
        let now = Utc::now();
        let rendered = if self.flags.utc {
            now.format(format).to_string()
        } else {
            now.with_timezone(&Local).format(format).to_string()
        };
        Some(rendered)
    }

    pub(crate) fn render(
        &self,
        timestamp: Option<&str>,
        message: &str,
        caller: Option<CallSite<'_>>,
        colored: bool,
    ) -> String {
        let prefix = if colored {
            &self.colored_prefix
        } else {
            &self.prefix
        };

        let mut line = String::with_capacity(prefix.len() + message.len() + 32);
        if !self.flags.prefix_after_timestamp {
            line.push_str(prefix);
        }
        if let Some(timestamp) = timestamp {
            line.push_str(timestamp);
            line.push(' ');
        }
        if let Some(site) = caller {
            let _ = write!(line, "{}:{}: ", base_name(site.file), site.line);
        }
        if self.flags.prefix_after_timestamp {
            line.push_str(prefix);
        }
        line.push_str(message);
        if !message.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

/// Last path component, for `/` and `\` separators
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
