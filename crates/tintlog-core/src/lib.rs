//! # Tintlog Core Library
//!
//! Leveled, color-prefixed logging facade for command-line tools and desktop
//! apps.
//!
//! ## Modules
//!
//! - `config` - Logger configuration (serde, env and flag overrides)
//! - `severity` - The four severities and their prefix styles
//! - `sink` - Console/file fan-out writer with per-destination line locking
//! - `emitter` - Record formatting for a single severity
//! - `logger` - The `Logger` handle (emit, reset, debug gating)
//! - `trace` - Call-stack breadcrumbs behind a `StackWalker` capability
//! - `bench` - Elapsed-time helpers that report at debug level
//! - `flags` - `-debug` command-line flag parsing
//! - `macros` - `info!`, `debug!`, `error!`, `log_panic!`, `fatal!` and line forms

pub mod bench;
pub mod config;
pub mod emitter;
pub mod error;
pub mod flags;
pub mod logger;
pub mod macros;
pub mod severity;
pub mod sink;
pub mod trace;

// Re-export commonly used types
pub use bench::{Benchmark, BenchmarkLoop, LoopReport};
pub use config::{ConsoleTarget, LineFlags, LoggerConfig, Prefixes, TimePrecision};
pub use error::{LogError, Result};
pub use flags::debug_flag;
pub use emitter::CallSite;
pub use logger::Logger;
pub use severity::Severity;
pub use sink::{Destination, Sink};
pub use trace::{BacktraceWalker, Frame, StackWalker, TRACE_DEPTH, TRACE_UNAVAILABLE};
