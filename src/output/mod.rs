//! Leveled console output for hashtool.
//!
//! Messages carry one of five levels (`DEBUG < INFO < WARNING < ERROR <
//! FATAL`) and are printed when their level reaches the global threshold:
//! - Quiet prints nothing at all, errors included
//! - Normal prints warnings and above
//! - Verbose adds informational summaries
//! - Debug adds per-file trace lines
//!
//! Debug and info go to stdout; warnings, errors and fatal messages go to
//! stderr.

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Severity of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Routine per-file trace
    Debug = 10,
    /// Summaries and progress
    Info = 20,
    /// Findings that do not fail the run
    Warning = 30,
    /// Findings that fail the run
    Error = 40,
    /// Unrecoverable failures
    Fatal = 50,
}

/// Output threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress all output.
    Quiet = 0,
    /// Default: warnings and errors.
    Normal = 1,
    /// Informational messages as well.
    Verbose = 2,
    /// Everything, including per-file trace.
    Debug = 3,
}

impl Verbosity {
    /// Lowest level printed at this verbosity, `None` when quiet.
    #[must_use]
    pub const fn threshold(self) -> Option<Level> {
        match self {
            Self::Quiet => None,
            Self::Normal => Some(Level::Warning),
            Self::Verbose => Some(Level::Info),
            Self::Debug => Some(Level::Debug),
        }
    }

    /// Resolve the CLI flags. Quiet beats debug, debug beats verbose.
    #[must_use]
    pub const fn from_flags(verbose: bool, debug: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        3 => Verbosity::Debug,
        _ => Verbosity::Normal,
    }
}

/// Whether a message at `level` would currently be printed.
#[must_use]
pub fn enabled(level: Level) -> bool {
    get_verbosity()
        .threshold()
        .is_some_and(|threshold| level >= threshold)
}

/// Turn colored output on or off for the whole process.
pub fn set_color(enabled: bool) {
    colored::control::set_override(enabled);
}

/// Prints a per-file trace line.
pub fn debug(message: &str) {
    if enabled(Level::Debug) {
        println!("{}", message.dimmed());
    }
}

/// Prints an informational message.
pub fn info(message: &str) {
    if enabled(Level::Info) {
        println!("{message}");
    }
}

/// Prints a success summary in green (info level).
pub fn success(message: &str) {
    if enabled(Level::Info) {
        println!("{}", message.green());
    }
}

/// Prints a warning message in bold yellow.
pub fn warning(message: &str) {
    if enabled(Level::Warning) {
        eprintln!("{}", message.yellow().bold());
    }
}

/// Prints an error message in bold red.
pub fn error(message: &str) {
    if enabled(Level::Error) {
        eprintln!("{}", message.red().bold());
    }
}

/// Prints a fatal error message.
pub fn fatal(message: &str) {
    if enabled(Level::Fatal) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

/// Prints a bracketed status tag followed by a path, e.g. `[MISSING] a/b.txt`.
pub fn status(level: Level, tag: &str, subject: &str) {
    if !enabled(level) {
        return;
    }
    let tag = format!("[{tag}]");
    match level {
        Level::Debug => println!("{} {}", tag.dimmed(), subject.dimmed()),
        Level::Info => println!("{} {subject}", tag.green()),
        Level::Warning => eprintln!("{} {subject}", tag.yellow().bold()),
        Level::Error | Level::Fatal => eprintln!("{} {subject}", tag.red().bold()),
    }
}
