//! Logging macros
//!
//! Every macro takes the [`Logger`](crate::Logger) as its first argument.
//! The debug forms check the debug flag before their arguments are
//! evaluated.

/// Info record: `info!(log, "loaded {} items", n)`
#[macro_export]
macro_rules! info {
    ($log:expr, $($arg:tt)+) => {
        $log.info(::core::format_args!($($arg)+))
    };
}

/// Debug record; arguments are not evaluated while debug output is off
#[macro_export]
macro_rules! debug {
    ($log:expr, $($arg:tt)+) => {{
        let log = &$log;
        if log.debug_enabled() {
            log.debug(::core::format_args!($($arg)+));
        }
    }};
}

/// Error record: `error!(log, "save failed: {}", err)`
#[macro_export]
macro_rules! error {
    ($log:expr, $($arg:tt)+) => {
        $log.error(::core::format_args!($($arg)+))
    };
}

/// Write through the panic emitter, then panic with the same message
#[macro_export]
macro_rules! log_panic {
    ($log:expr, $($arg:tt)+) => {
        $log.panic(::core::format_args!($($arg)+))
    };
}

/// Write through the panic emitter, then exit the process with status 1
#[macro_export]
macro_rules! fatal {
    ($log:expr, $($arg:tt)+) => {
        $log.fatal(::core::format_args!($($arg)+))
    };
}

/// Info record of space-separated values: `info_line!(log, "took", elapsed)`
#[macro_export]
macro_rules! info_line {
    ($log:expr $(, $value:expr)* $(,)?) => {
        $log.info_line(&[$(&$value as &dyn ::core::fmt::Display),*])
    };
}

/// Debug record of space-separated values; skipped entirely while debug is off
#[macro_export]
macro_rules! debug_line {
    ($log:expr $(, $value:expr)* $(,)?) => {{
        let log = &$log;
        if log.debug_enabled() {
            log.debug_line(&[$(&$value as &dyn ::core::fmt::Display),*]);
        }
    }};
}

/// Error record of space-separated values
#[macro_export]
macro_rules! error_line {
    ($log:expr $(, $value:expr)* $(,)?) => {
        $log.error_line(&[$(&$value as &dyn ::core::fmt::Display),*])
    };
}
