//! `-debug` command-line flag
//!
//! Hosts that do their own argument parsing can ignore this and set
//! [`LoggerConfig::debug`](crate::LoggerConfig) directly.

use crate::error::{LogError, Result};

/// Name of the boolean flag that enables debug output
pub const DEBUG_FLAG: &str = "debug";

/// Find the `debug` flag in `args`.
///
/// Accepts `-debug`, `--debug`, `-debug=<bool>` and `--debug=<bool>`. Scanning
/// stops at a bare `--`. The last occurrence wins; `None` means the flag was
/// not given.
pub fn debug_flag<I, S>(args: I) -> Result<Option<bool>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found = None;

    for arg in args {
        let arg = arg.as_ref();
        if arg == "--" {
            break;
        }

        let Some(body) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            continue;
        };

        match body.split_once('=') {
            Some((name, value)) if name == DEBUG_FLAG => found = Some(parse_bool(value)?),
            None if body == DEBUG_FLAG => found = Some(true),
            _ => {}
        }
    }

    Ok(found)
}

/// Parse a boolean the way command-line flags spell them
/// (`1`, `t`, `true`, `0`, `f`, `false`, any case).
pub(crate) fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "no" | "off" => Ok(false),
        _ => Err(LogError::InvalidFlag {
            value: value.to_string(),
        }),
    }
}
