//! Logging macros for one-chunk entries.
//!
//! These macros build, append, and finalize an entry in one call, with
//! automatic string formatting like `format!`. They return the `Result`
//! from `finalize`, so escalation errors stay visible to the caller.
//!
//! # Examples
//!
//! ```
//! use prism_log::{Level, Logger};
//! use prism_log::message;
//!
//! let logger = Logger::new();
//! message!(logger, Level::Minor, "frame {} rendered", 42)?;
//! # Ok::<(), prism_log::LoggerError>(())
//! ```

/// Build and finalize a one-chunk entry with automatic formatting.
///
/// # Examples
///
/// ```
/// # use prism_log::{Category, Level, Logger};
/// # let logger = Logger::new();
/// use prism_log::emit;
/// emit!(logger, Category::Info, Level::Negligible, "cache warm in {}ms", 12)?;
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $category:expr, $level:expr, $($arg:tt)+) => {
        $logger.entry($category).append(format!($($arg)+), $level).finalize()
    };
}

/// Build and finalize an error entry.
///
/// Under the default escalation policy error entries terminate the
/// process; configure the policy first.
///
/// # Examples
///
/// ```
/// # use prism_log::{Level, Logger};
/// # let logger = Logger::new();
/// # logger.disable_termination();
/// use prism_log::error;
/// error!(logger, Level::Major, "shader compile failed: {}", "pass 2")?;
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::emit!($logger, $crate::Category::Error, $level, $($arg)+)
    };
}

/// Build and finalize a warning entry.
///
/// # Examples
///
/// ```
/// # use prism_log::{Level, Logger};
/// # let logger = Logger::new();
/// use prism_log::warning;
/// warning!(logger, Level::Minor, "vsync unavailable")?;
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::emit!($logger, $crate::Category::Warning, $level, $($arg)+)
    };
}

/// Build and finalize a message entry.
///
/// # Examples
///
/// ```
/// # use prism_log::{Level, Logger};
/// # let logger = Logger::new();
/// use prism_log::message;
/// message!(logger, Level::Minor, "scene loaded: {}", "atrium")?;
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
#[macro_export]
macro_rules! message {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::emit!($logger, $crate::Category::Message, $level, $($arg)+)
    };
}

/// Build and finalize an info entry.
///
/// # Examples
///
/// ```
/// # use prism_log::{Level, Logger};
/// # let logger = Logger::new();
/// use prism_log::info;
/// info!(logger, Level::Negligible, "{} draw calls", 1280)?;
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::emit!($logger, $crate::Category::Info, $level, $($arg)+)
    };
}
