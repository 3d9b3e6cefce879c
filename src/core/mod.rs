//! Core pipeline types and traits

pub mod builder;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod escalation;
pub mod logger;
pub mod metrics;
pub mod severity;
pub mod timestamp;

pub use builder::EntryBuilder;
pub use dispatch::DispatcherState;
pub use entry::{Chunk, Entry};
pub use error::{LoggerError, Result};
pub use escalation::{Escalation, EscalationPolicy};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use severity::{Category, Level, SeverityMask};
