//! Pipeline metrics for observability
//!
//! Counters for monitoring pipeline health: throughput, sink write
//! failures, and rejected empty entries.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pipeline observability
///
/// # Example
///
/// ```
/// use prism_log::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_written();
/// assert_eq!(metrics.entries_enqueued(), 1);
/// assert_eq!(metrics.entries_written(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries moved into the dispatch queue
    entries_enqueued: AtomicU64,

    /// Entries fully processed by the dispatcher
    entries_written: AtomicU64,

    /// Chunk lines written across all sinks
    chunks_written: AtomicU64,

    /// Sink write failures (the sink was skipped for that entry)
    sink_failures: AtomicU64,

    /// Entries rejected at finalize for having no chunks
    empty_entries: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            entries_enqueued: AtomicU64::new(0),
            entries_written: AtomicU64::new(0),
            chunks_written: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            empty_entries: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn entries_enqueued(&self) -> u64 {
        self.entries_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_written(&self) -> u64 {
        self.entries_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn chunks_written(&self) -> u64 {
        self.chunks_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn empty_entries(&self) -> u64 {
        self.empty_entries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.entries_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.entries_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_chunks(&self, count: u64) -> u64 {
        self.chunks_written.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_empty_entry(&self) -> u64 {
        self.empty_entries.fetch_add(1, Ordering::Relaxed)
    }

    /// Entries enqueued but not yet written
    pub fn entries_pending(&self) -> u64 {
        self.entries_enqueued()
            .saturating_sub(self.entries_written())
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.entries_enqueued.store(0, Ordering::Relaxed);
        self.entries_written.store(0, Ordering::Relaxed);
        self.chunks_written.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.empty_entries.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            entries_enqueued: AtomicU64::new(self.entries_enqueued()),
            entries_written: AtomicU64::new(self.entries_written()),
            chunks_written: AtomicU64::new(self.chunks_written()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            empty_entries: AtomicU64::new(self.empty_entries()),
        }
    }
}
