//! # Tintlog tracing bridge
//!
//! Routes `tracing` events into a [`Logger`] so crates that log through
//! `tracing` macros share the same prefixes, debug flag and sinks.
//!
//! | tracing level    | emitter |
//! |------------------|---------|
//! | `ERROR`, `WARN`  | error   |
//! | `INFO`           | info    |
//! | `DEBUG`, `TRACE` | debug   |
//!
//! Event fields other than `message` are appended as ` key=value` text.

use std::fmt::{self, Write as _};
use tintlog_core::{CallSite, Logger, Severity};
use tracing::field::{Field, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

/// `tracing_subscriber` layer writing events through a [`Logger`]
#[derive(Debug, Clone)]
pub struct TintlogLayer {
    logger: Logger,
    with_target: bool,
}

impl TintlogLayer {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            with_target: false,
        }
    }

    /// Prefix every message with the event target (`my_crate::net: ...`)
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

}

/// Emitter used for a tracing level
pub fn severity_for(level: &Level) -> Severity {
    // tracing orders levels by verbosity: ERROR < WARN < INFO < DEBUG < TRACE
    if *level <= Level::WARN {
        Severity::Error
    } else if *level == Level::INFO {
        Severity::Info
    } else {
        Severity::Debug
    }
}

impl<S: Subscriber> Layer<S> for TintlogLayer {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        // The debug flag can flip at runtime; never cache a verdict for debug callsites.
        if severity_for(metadata.level()) == Severity::Debug {
            Interest::sometimes()
        } else {
            Interest::always()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        severity_for(metadata.level()) != Severity::Debug || self.logger.debug_enabled()
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = severity_for(metadata.level());
        if severity == Severity::Debug && !self.logger.debug_enabled() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = String::new();
        if self.with_target {
            let _ = write!(message, "{}: ", metadata.target());
        }
        message.push_str(&visitor.message);
        message.push_str(&visitor.fields);

        let caller = metadata
            .file()
            .zip(metadata.line())
            .map(|(file, line)| CallSite::new(file, line));
        self.logger.log_at(severity, &message, caller);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Install a global subscriber that forwards every event to `logger`.
///
/// `RUST_LOG` narrows what reaches the logger; without it everything is
/// forwarded and the logger's debug flag decides.
pub fn try_init(logger: Logger) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(TintlogLayer::new(logger))
        .try_init()
}
