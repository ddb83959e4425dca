//! Logger handle
//!
//! A `Logger` owns four severity emitters (info, debug, error, panic) that all
//! write to one shared [`Sink`]. The handle is cheap to clone and safe to use
//! from any thread.
//!
//! # Usage
//!
//! ```ignore
//! let log = Logger::new(LoggerConfig::default().apply_args(std::env::args())?);
//!
//! tintlog_core::info!(log, "listening on {}", addr);
//! tintlog_core::debug!(log, "state = {:?}", expensive_dump());
//!
//! // Switch sinks later; all four emitters move together.
//! log.reset(LoggerConfig::console_only());
//! ```

use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::bench::{Benchmark, BenchmarkLoop};
use crate::config::LoggerConfig;
use crate::emitter::{CallSite, Emitter};
use crate::error::Result;
use crate::severity::Severity;
use crate::sink::Sink;
use crate::trace::{render_breadcrumb, BacktraceWalker, StackWalker, TRACE_DEPTH, TRACE_UNAVAILABLE};

/// Exit status used by the fatal operations
pub const FATAL_EXIT_CODE: i32 = 1;

/// The four emitters plus the config and sink they were built from.
///
/// Always replaced as a unit.
struct Emitters {
    config: LoggerConfig,
    sink: Arc<Sink>,
    info: Emitter,
    debug: Emitter,
    error: Emitter,
    panic: Emitter,
}

impl Emitters {
    fn new(config: LoggerConfig, sink: Arc<Sink>) -> Self {
        Self {
            info: Emitter::new(Severity::Info, &config, Arc::clone(&sink)),
            debug: Emitter::new(Severity::Debug, &config, Arc::clone(&sink)),
            error: Emitter::new(Severity::Error, &config, Arc::clone(&sink)),
            panic: Emitter::new(Severity::Panic, &config, Arc::clone(&sink)),
            config,
            sink,
        }
    }

    /// Build against the sink `config` describes, falling back to the console
    /// when the log file cannot be opened.
    fn open(config: LoggerConfig) -> Self {
        match Sink::open(&config) {
            Ok(sink) => Self::new(config, Arc::new(sink)),
            Err(err) => {
                let sink = Arc::new(Sink::console_only(&config));
                let emitters = Self::new(config, sink);
                emitters.error.emit(&err.to_string(), None);
                emitters
            }
        }
    }

    fn get(&self, severity: Severity) -> &Emitter {
        match severity {
            Severity::Info => &self.info,
            Severity::Debug => &self.debug,
            Severity::Error => &self.error,
            Severity::Panic => &self.panic,
        }
    }
}

struct Inner {
    emitters: RwLock<Arc<Emitters>>,
    debug: AtomicBool,
    walker: RwLock<Arc<dyn StackWalker>>,
    trace_sequence: AtomicU64,
}

/// Leveled logging handle
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Create a logger from `config`.
    ///
    /// If the configured log file cannot be opened the failure is reported at
    /// error level on the console and the logger continues console-only.
    pub fn new(config: LoggerConfig) -> Self {
        Self::from_emitters(Emitters::open(config))
    }

    /// Like [`Logger::new`], but fails instead of degrading to console-only
    pub fn try_new(config: LoggerConfig) -> Result<Self> {
        let sink = Sink::open(&config)?;
        Ok(Self::with_sink(config, sink))
    }

    /// Create a logger writing to an explicit sink.
    ///
    /// `config.log_path`, `config.console` and the color flags are not used to
    /// build destinations here; the sink decides.
    pub fn with_sink(config: LoggerConfig, sink: Sink) -> Self {
        Self::from_emitters(Emitters::new(config, Arc::new(sink)))
    }

    fn from_emitters(emitters: Emitters) -> Self {
        let debug = emitters.config.debug;
        Self {
            inner: Arc::new(Inner {
                emitters: RwLock::new(Arc::new(emitters)),
                debug: AtomicBool::new(debug),
                walker: RwLock::new(Arc::new(BacktraceWalker)),
                trace_sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the stack walker used by [`Logger::trace`]
    pub fn with_walker(self, walker: impl StackWalker + 'static) -> Self {
        self.set_walker(walker);
        self
    }

    pub fn set_walker(&self, walker: impl StackWalker + 'static) {
        *self.inner.walker.write() = Arc::new(walker);
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Rebuild the sink and all four emitters from `config`.
    ///
    /// The new emitter set is swapped in as one unit: a record is written
    /// either entirely through the old set or entirely through the new one.
    pub fn reset(&self, config: LoggerConfig) {
        self.install(Emitters::open(config));
    }

    /// Rebuild all four emitters against an explicit sink
    pub fn reset_with_sink(&self, config: LoggerConfig, sink: Sink) {
        self.install(Emitters::new(config, Arc::new(sink)));
    }

    fn install(&self, emitters: Emitters) {
        let debug = emitters.config.debug;
        let mut current = self.inner.emitters.write();
        *current = Arc::new(emitters);
        self.inner.debug.store(debug, Ordering::Relaxed);
    }

    fn emitters(&self) -> Arc<Emitters> {
        Arc::clone(&*self.inner.emitters.read())
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> LoggerConfig {
        self.emitters().config.clone()
    }

    /// The active sink
    pub fn sink(&self) -> Arc<Sink> {
        Arc::clone(&self.emitters().sink)
    }

    /// Uncolored prefix label of `severity`'s emitter
    pub fn prefix(&self, severity: Severity) -> String {
        self.emitters().get(severity).prefix().to_string()
    }

    pub fn debug_enabled(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    /// Turn debug output on or off; takes effect for the next call
    pub fn set_debug(&self, enabled: bool) {
        self.inner.debug.store(enabled, Ordering::Relaxed);
    }

    // ------------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------------

    /// Write a preformatted message through `severity`'s emitter
    #[track_caller]
    pub fn log(&self, severity: Severity, message: &str) {
        if severity == Severity::Debug && !self.debug_enabled() {
            return;
        }
        self.emit(severity, message, Location::caller());
    }

    /// Like [`Logger::log`], with the call site supplied by the caller.
    ///
    /// For bridges forwarding records that were produced elsewhere.
    pub fn log_at(&self, severity: Severity, message: &str, caller: Option<CallSite<'_>>) {
        if severity == Severity::Debug && !self.debug_enabled() {
            return;
        }
        self.emitters().get(severity).emit(message, caller);
    }

    fn emit(&self, severity: Severity, message: &str, caller: &Location<'_>) {
        self.emitters().get(severity).emit(message, Some(caller.into()));
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Info, &render_args(args), Location::caller());
    }

    /// Values joined by single spaces
    #[track_caller]
    pub fn info_line(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Info, &join_values(values), Location::caller());
    }

    /// Alias of [`Logger::info`]
    #[track_caller]
    pub fn print(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Info, &render_args(args), Location::caller());
    }

    /// Alias of [`Logger::info_line`]
    #[track_caller]
    pub fn print_line(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Info, &join_values(values), Location::caller());
    }

    /// No-op unless debug output is enabled.
    ///
    /// Use the `debug!` macro to also skip evaluating the arguments.
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        if !self.debug_enabled() {
            return;
        }
        self.emit(Severity::Debug, &render_args(args), Location::caller());
    }

    #[track_caller]
    pub fn debug_line(&self, values: &[&dyn fmt::Display]) {
        if !self.debug_enabled() {
            return;
        }
        self.emit(Severity::Debug, &join_values(values), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Error, &render_args(args), Location::caller());
    }

    #[track_caller]
    pub fn error_line(&self, values: &[&dyn fmt::Display]) {
        self.emit(Severity::Error, &join_values(values), Location::caller());
    }

    /// Write the message through the panic emitter, then panic with it
    #[track_caller]
    pub fn panic(&self, args: fmt::Arguments<'_>) -> ! {
        let message = render_args(args).into_owned();
        self.emit(Severity::Panic, &message, Location::caller());
        panic!("{}", message)
    }

    #[track_caller]
    pub fn panic_line(&self, values: &[&dyn fmt::Display]) -> ! {
        let message = join_values(values);
        self.emit(Severity::Panic, &message, Location::caller());
        panic!("{}", message)
    }

    /// Write the message through the panic emitter, then exit the process
    /// with status 1. Destructors and unwinding do not run.
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        self.emit(Severity::Panic, &render_args(args), Location::caller());
        std::process::exit(FATAL_EXIT_CODE)
    }

    #[track_caller]
    pub fn fatal_line(&self, values: &[&dyn fmt::Display]) -> ! {
        self.emit(Severity::Panic, &join_values(values), Location::caller());
        std::process::exit(FATAL_EXIT_CODE)
    }

    // ------------------------------------------------------------------------
    // Trace and benchmarks
    // ------------------------------------------------------------------------

    /// Breadcrumb of the last six frames ending `skip` frames above the caller.
    ///
    /// Returns [`TRACE_UNAVAILABLE`] without walking the stack while debug
    /// output is disabled.
    #[inline(never)]
    pub fn trace(&self, skip: usize) -> String {
        if !self.debug_enabled() {
            return TRACE_UNAVAILABLE.to_string();
        }

        let walker = Arc::clone(&*self.inner.walker.read());
        let frames = walker.frames(skip + 1, TRACE_DEPTH);
        let sequence = self.inner.trace_sequence.fetch_add(1, Ordering::Relaxed);
        render_breadcrumb(sequence, &frames)
    }

    /// Start timing `label`; see [`Benchmark::done`]
    pub fn benchmark(&self, label: impl Into<String>) -> Benchmark {
        Benchmark::start(self.clone(), label)
    }

    /// Start a lap-timed session for `label`; see [`BenchmarkLoop`]
    pub fn benchmark_loop(&self, label: impl Into<String>) -> BenchmarkLoop {
        BenchmarkLoop::start(self.clone(), label)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let emitters = self.emitters();
        f.debug_struct("Logger")
            .field("debug", &self.debug_enabled())
            .field("sink", &emitters.sink)
            .finish_non_exhaustive()
    }
}

fn render_args(args: fmt::Arguments<'_>) -> Cow<'static, str> {
    match args.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(args.to_string()),
    }
}

fn join_values(values: &[&dyn fmt::Display]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = fmt::Write::write_fmt(&mut out, format_args!("{}", value));
    }
    out
}
