//! Error types

use std::path::PathBuf;

/// Result type for fallible logger setup
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors surfaced while setting a logger up.
///
/// Emission itself never returns these: write failures on a live sink are
/// swallowed.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log file could not be opened for appending
    #[error("Failed to open log file {}: {source}", path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config document was not valid
    #[error("Invalid logger config: {0}")]
    ParseConfig(#[from] serde_json::Error),

    /// A boolean flag carried a value that is not a boolean
    #[error("Invalid boolean value for -debug: {value:?}")]
    InvalidFlag { value: String },
}
