//! A minimal, zero-dependency logging crate for the Pyrite toolchain.
//!
//! Every phase of the pipeline reports through these macros. Records go to
//! standard error so that program output written by `print` on standard
//! output is never interleaved with diagnostics.
//!
//! # Example
//!
//! ```
//! use pyrite_log::{debug, info, warn, Level};
//!
//! pyrite_log::set_level(Level::Debug);
//!
//! let tokens = 42;
//! debug!("lexed {} tokens", tokens);
//! info!("pipeline ready");
//! warn!("falling back to the interpreter");
//! ```

use std::fmt::Arguments;
use std::io::{IsTerminal, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "PYRITE_LOG";

/// Log levels, ordered from most severe (Error) to least severe (Trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Failures the caller cannot recover from
    Error = 0,
    /// Suspicious situations
    Warn = 1,
    /// High-level progress
    Info = 2,
    /// Phase boundaries and sizes
    Debug = 3,
    /// Per-call and per-instruction detail
    Trace = 4,
}

impl Level {
    const fn color_code(&self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use pyrite_log::Level;
    ///
    /// assert_eq!(Level::from_str("trace"), Ok(Level::Trace));
    /// assert!(Level::from_str("verbose").is_err());
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

/// The global logger.
///
/// The level lives in an atomic so the logger can be shared as a `'static`
/// singleton via [`get_logger`].
pub struct Logger {
    level: AtomicU8,
    colored: bool,
}

impl Logger {
    const fn new(level: Level, colored: bool) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            colored,
        }
    }

    /// Sets the minimum level; less severe records are dropped.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Checks whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    fn write(&self, level: Level, target: &str, args: Arguments) {
        let mut stderr = std::io::stderr().lock();
        let _ = if self.colored {
            writeln!(
                stderr,
                "{}[{}]\x1b[0m {target}: {args}",
                level.color_code(),
                level.as_str()
            )
        } else {
            writeln!(stderr, "[{}] {target}: {args}", level.as_str())
        };
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at `Level::Warn` on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn, std::io::stderr().is_terminal()))
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum level of the global logger from a level name.
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    let level = Level::from_str(s)?;
    set_level(level);
    Ok(())
}

/// Applies the level named by `PYRITE_LOG`, if set.
///
/// Returns the level in effect afterwards. An unparsable value leaves the
/// current level untouched and is reported at `Warn`.
pub fn init_from_env() -> Level {
    if let Ok(value) = std::env::var(LOG_ENV_VAR)
        && let Err(err) = set_level_from_str(&value)
    {
        __log_with_target(
            Level::Warn,
            module_path!(),
            format_args!("ignoring {LOG_ENV_VAR}: {err}"),
        );
    }
    get_logger().level()
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    let logger = get_logger();
    if logger.enabled(level) {
        logger.write(level, target, args);
    }
}

/// Logs a record at an explicit level, tagged with the calling module path.
///
/// ```
/// use pyrite_log::{log, Level};
///
/// log!(level: Level::Info, "compiled {} functions", 3);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs at the Error level.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at the Warn level.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at the Info level.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at the Debug level.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at the Trace level.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
