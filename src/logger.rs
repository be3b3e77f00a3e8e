//! Logging with colored module prefixes.
//!
//! Provides the `log!` macro for formatted terminal output:
//!
//! ```ignore
//! log!("sync"; "offset={} count={}", offset, page.len());
//! log!(warn: "mirror"; "quarantined {}", path.display());
//! ```
//!
//! Output goes to stderr so the rendered site can be piped around freely.

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Suppresses all output when set (used by tests).
static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence or re-enable all log output.
#[allow(dead_code)]
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Severity of a log line, controls prefix color only.
#[derive(Debug, Clone, Copy)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Print one log line with a colored `[module]` prefix.
pub fn log(level: Level, module: &str, message: &str) {
    if QUIET.load(Ordering::Relaxed) {
        return;
    }
    let prefix = format!("[{module}]");
    let prefix = match level {
        Level::Info => prefix.green(),
        Level::Warn => prefix.yellow(),
        Level::Error => prefix.red(),
    };
    eprintln!("{prefix} {message}");
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// log!(warn: "module"; "message");
/// log!(error: "module"; "message");
/// ```
#[macro_export]
macro_rules! log {
    (warn: $module:expr; $($arg:tt)*) => {{
        $crate::logger::log($crate::logger::Level::Warn, $module, &format!($($arg)*))
    }};
    (error: $module:expr; $($arg:tt)*) => {{
        $crate::logger::log($crate::logger::Level::Error, $module, &format!($($arg)*))
    }};
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($crate::logger::Level::Info, $module, &format!($($arg)*))
    }};
}
