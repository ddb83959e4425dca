//! Severities and their prefix styles

use colored::{ColoredString, Colorize};

/// Highest grey intensity accepted for the debug prefix (24-step ramp)
pub const MAX_GREY_LEVEL: u8 = 23;

/// Log severity
///
/// Each severity owns one emitter. `Panic` backs both the panic and the
/// fatal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Debug,
    Error,
    Panic,
}

impl Severity {
    /// All severities, in emitter construction order
    pub const ALL: [Severity; 4] = [Self::Panic, Self::Error, Self::Info, Self::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Error => "error",
            Self::Panic => "panic",
        }
    }

    /// Default prefix label
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Info => "Info:  ",
            Self::Debug => "Debug: ",
            Self::Error => "Error: ",
            Self::Panic => "PANIC! ",
        }
    }

    /// Apply this severity's bold color style to `label`.
    ///
    /// `grey_level` only affects `Debug` and is clamped to `0..=23`.
    pub fn style(&self, label: &str, grey_level: u8) -> ColoredString {
        let styled = match self {
            Self::Info => label.blue(),
            Self::Error => label.red(),
            Self::Panic => label.white().on_red(),
            Self::Debug => {
                let (r, g, b) = grey_rgb(grey_level);
                label.truecolor(r, g, b)
            }
        };
        styled.bold()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGB value of step `level` on the xterm 256-color grey ramp (232..=255)
pub fn grey_rgb(level: u8) -> (u8, u8, u8) {
    let v = 8 + 10 * level.min(MAX_GREY_LEVEL);
    (v, v, v)
}
