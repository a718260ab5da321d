//! Centralized status output.
//!
//! Every user-visible line is prefixed with the `configure:` tag and written
//! to stderr as soon as it is produced, so a failing run shows its progress
//! up to the failing check.
//!
//! # Design Principles
//!
//! 1. **Callers never format the tag themselves** - Shell owns the prefix and colors
//! 2. **Errors are always printed** - quiet mode only suppresses progress
//! 3. **Tests can capture output** - a buffered shell records lines instead of printing

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::sync::Mutex;

/// The tag every status line starts with.
pub const TAG: &str = "configure:";

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Default: step and status messages.
    #[default]
    Normal,
    /// Also echo every subprocess invocation.
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Semantic kind of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Note,
    Step,
    Warning,
    Error,
}

impl Status {
    /// Label inserted after the tag, if any.
    fn label(&self) -> Option<&'static str> {
        match self {
            Status::Note | Status::Step => None,
            Status::Warning => Some("warning:"),
            Status::Error => Some("error:"),
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            // bold blue
            Status::Note => "\x1b[1;34m",
            // bold cyan
            Status::Step => "\x1b[1;36m",
            // bold yellow
            Status::Warning => "\x1b[1;33m",
            // bold red
            Status::Error => "\x1b[1;31m",
        }
    }
}

#[derive(Debug)]
enum Sink {
    Stderr,
    Buffer(Mutex<Vec<String>>),
}

/// Central shell for all status output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    sink: Sink,
}

impl Shell {
    /// Create a shell writing to stderr.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            sink: Sink::Stderr,
        }
    }

    /// Create a shell that records lines (uncolored) instead of printing them.
    pub fn buffered(verbosity: Verbosity) -> Self {
        Shell {
            verbosity,
            use_color: false,
            sink: Sink::Buffer(Mutex::new(Vec::new())),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status line.
    ///
    /// Format: `configure: [label ]{message}`
    ///
    /// In quiet mode, only Error status is printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }

        if status == Status::Step {
            self.emit(self.format_line(status, ""));
        }
        let line = self.format_line(status, &msg.to_string());
        self.emit(line);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Note, msg);
    }

    /// Announce the start of a configure phase.
    pub fn step(&self, msg: impl Display) {
        self.status(Status::Step, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    /// Print a note only in verbose mode.
    pub fn verbose(&self, msg: impl Display) {
        if self.is_verbose() {
            self.status(Status::Note, msg);
        }
    }

    /// Lines recorded by a buffered shell. Empty for a stderr shell.
    pub fn captured(&self) -> Vec<String> {
        match &self.sink {
            Sink::Buffer(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Sink::Stderr => Vec::new(),
        }
    }

    fn format_line(&self, status: Status, msg: &str) -> String {
        let tag = if self.use_color {
            format!("{}{}\x1b[0m", status.color_code(), TAG)
        } else {
            TAG.to_string()
        };

        let mut line = tag;
        if let Some(label) = status.label() {
            line.push(' ');
            line.push_str(label);
        }
        if !msg.is_empty() {
            line.push(' ');
            line.push_str(msg);
        }
        line
    }

    fn emit(&self, line: String) {
        match &self.sink {
            Sink::Stderr => eprintln!("{}", line),
            Sink::Buffer(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}
