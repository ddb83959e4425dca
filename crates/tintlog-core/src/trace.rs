//! Call-stack breadcrumbs
//!
//! Stack inspection goes through the [`StackWalker`] capability so it can be
//! swapped per platform or replaced by a mock. The default
//! [`BacktraceWalker`] reads `std::backtrace`; it needs debug info for file
//! and line numbers, frames without it render as `<unknown>:0`.

use std::backtrace::Backtrace;
use std::fmt::Write as _;

use crate::emitter::base_name;

/// Number of frames rendered into a breadcrumb
pub const TRACE_DEPTH: usize = 6;

/// Returned by `Logger::trace` while debug output is disabled
pub const TRACE_UNAVAILABLE: &str = "<TRACE N/A>";

const UNKNOWN_FILE: &str = "<unknown>";

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub line: u32,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Placeholder for a frame without location info
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_FILE, 0)
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", base_name(&self.file), self.line)
    }
}

/// Capability to enumerate the caller's stack frames
pub trait StackWalker: Send + Sync {
    /// Up to `count` frames, innermost first.
    ///
    /// `skip == 0` starts at the function that called `frames`. Stacks
    /// shallower than `skip + count` yield fewer frames.
    fn frames(&self, skip: usize, count: usize) -> Vec<Frame>;
}

/// `StackWalker` backed by `std::backtrace::Backtrace`
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceWalker;

/// Symbol name fragment identifying the walker's own frame
const WALKER_SYMBOL: &str = "BacktraceWalker";

impl StackWalker for BacktraceWalker {
    #[inline(never)]
    fn frames(&self, skip: usize, count: usize) -> Vec<Frame> {
        let rendered = Backtrace::force_capture().to_string();
        caller_window(&parse_backtrace(&rendered), skip, count)
    }
}

/// Frames above the walker's own symbol.
///
/// Empty when that symbol is absent (stripped binaries).
fn caller_window(symbols: &[Symbol], skip: usize, count: usize) -> Vec<Frame> {
    let Some(walker) = symbols.iter().position(|s| s.name.contains(WALKER_SYMBOL)) else {
        return Vec::new();
    };

    symbols[walker + 1..]
        .iter()
        .skip(skip)
        .take(count)
        .map(Symbol::frame)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Symbol {
    name: String,
    location: Option<(String, u32)>,
}

impl Symbol {
    fn frame(&self) -> Frame {
        match &self.location {
            Some((file, line)) => Frame::new(file.clone(), *line),
            None => Frame::unknown(),
        }
    }
}

/// Split a rendered backtrace into symbols, innermost first.
///
/// Inlined functions appear as separate symbols, matching what a reader of the
/// source sees as separate calls.
fn parse_backtrace(rendered: &str) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = Vec::new();

    for raw in rendered.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(last) = symbols.last_mut() {
                if last.location.is_none() {
                    last.location = parse_location(location);
                }
            }
            continue;
        }

        let name = match line.split_once(": ") {
            Some((index, rest)) if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => line,
        };
        symbols.push(Symbol {
            name: name.to_string(),
            location: None,
        });
    }

    symbols
}

/// `path:line:column` or `path:line`; the path itself may contain `:`
fn parse_location(location: &str) -> Option<(String, u32)> {
    let (head, last) = location.rsplit_once(':')?;
    let last: u32 = last.parse().ok()?;

    match head.rsplit_once(':') {
        Some((path, line)) => match line.parse::<u32>() {
            Ok(line) => Some((path.to_string(), line)),
            Err(_) => Some((head.to_string(), last)),
        },
        None => Some((head.to_string(), last)),
    }
}

/// Render frames (innermost first) as `"<seq> ::: outer:1 > ... > inner:9 >"`
pub fn render_breadcrumb(sequence: u64, frames: &[Frame]) -> String {
    let mut out = format!("{} :::", sequence);
    for frame in frames.iter().rev() {
        let _ = write!(out, " {} >", frame);
    }
    out
}
