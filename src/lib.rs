//! # Prism Log
//!
//! An asynchronous logging pipeline with severity-mask filtering across
//! independently configured sinks, strict FIFO dispatch on a single
//! background thread, and severity-driven escalation.
//!
//! ## Features
//!
//! - **Severity mask algebra**: 4 categories × 4 priority bands with
//!   bitwise operators and cumulative presets
//! - **Entry builder**: compose multi-chunk entries with tags; nothing is
//!   observable until `finalize`
//! - **Independent sinks**: streams or files, each with its own masks and
//!   preferences; a failing sink never disturbs the others
//! - **Drain guarantees**: `stop()` writes every finalized entry before
//!   returning; escalation drains before raising or terminating

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Category, Chunk, DispatcherState, Entry, EntryBuilder, Escalation, EscalationPolicy,
        Level, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, SeverityMask,
    };
    pub use crate::sinks::{Sink, SinkRef, SinkTarget};
}

pub use crate::core::logger::{
    add_file, add_stream, disable_exceptions, disable_termination, enable_exceptions,
    enable_termination, entry, global, is_running, start, stop,
};
pub use crate::core::{
    Category, Chunk, DispatcherState, Entry, EntryBuilder, Escalation, EscalationPolicy, Level,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, SeverityMask,
};
pub use crate::sinks::{Sink, SinkRef, SinkTarget};
