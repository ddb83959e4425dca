//! Ad-hoc timing helpers
//!
//! Both helpers report through the debug emitter, so they cost one clock read
//! per call and nothing else while debug output is off.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::logger::Logger;

/// Single-interval timer from [`Logger::benchmark`]
#[derive(Debug, Clone)]
pub struct Benchmark {
    logger: Logger,
    label: String,
    started: Instant,
}

impl Benchmark {
    pub(crate) fn start(logger: Logger, label: impl Into<String>) -> Self {
        Self {
            logger,
            label: label.into(),
            started: Instant::now(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Log `"<label> took <elapsed>"` at debug level and return the elapsed time.
    ///
    /// Every call measures from the same start, so calling it again reports
    /// the total elapsed so far.
    pub fn done(&self) -> Duration {
        let elapsed = self.started.elapsed();
        self.logger
            .debug_line(&[&self.label, &"took", &DurationDisplay(elapsed)]);
        elapsed
    }
}

/// Totals reported by [`BenchmarkLoop::report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    pub total: Duration,
    pub laps: Vec<Duration>,
}

/// Lap timer from [`Logger::benchmark_loop`]
#[derive(Debug, Clone)]
pub struct BenchmarkLoop {
    logger: Logger,
    label: String,
    started: Instant,
    last_lap: Instant,
    laps: Vec<Duration>,
}

impl BenchmarkLoop {
    pub(crate) fn start(logger: Logger, label: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            logger,
            label: label.into(),
            started: now,
            last_lap: now,
            laps: Vec::new(),
        }
    }

    /// Record the time since the previous lap (or the start) and return it
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let lap = now.duration_since(self.last_lap);
        self.laps.push(lap);
        self.last_lap = now;
        lap
    }

    /// Recorded laps, oldest first
    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    /// Log the total and the individual laps at debug level
    pub fn report(&self) -> LoopReport {
        let total = self.started.elapsed();
        self.logger.debug_line(&[
            &self.label,
            &"took cumulatively",
            &DurationDisplay(total),
            &"individually:",
            &LapsDisplay(&self.laps),
        ]);
        LoopReport {
            total,
            laps: self.laps.clone(),
        }
    }

    /// Split into a `lap` closure and a `report` closure sharing one session
    pub fn into_callbacks(self) -> (impl FnMut() + Send, impl Fn() + Send) {
        let shared = Arc::new(Mutex::new(self));
        let reporter = Arc::clone(&shared);
        (
            move || {
                shared.lock().lap();
            },
            move || {
                reporter.lock().report();
            },
        )
    }
}

struct DurationDisplay(Duration);

impl fmt::Display for DurationDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

struct LapsDisplay<'a>(&'a [Duration]);

impl fmt::Display for LapsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, lap) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:?}", lap)?;
        }
        f.write_str("]")
    }
}
