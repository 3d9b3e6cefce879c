//! Entry builder
//!
//! Accumulates chunks and tags for one log event. Nothing is observable
//! until `finalize`, which moves the entry into the dispatch queue and
//! evaluates escalation on the calling thread.

use super::entry::{sanitize, Chunk, Entry};
use super::error::Result;
use super::logger::Logger;
use super::severity::{Category, Level};

/// Builder for a single log entry.
///
/// # Example
///
/// ```
/// use prism_log::{Category, Level, Logger};
///
/// let logger = Logger::new();
/// logger
///     .entry(Category::Message)
///     .append("engine started", Level::Minor)
///     .append_extra("3 sinks registered", Level::Negligible)
///     .append_tag("startup")
///     .finalize()?;
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
pub struct EntryBuilder<'a> {
    logger: &'a Logger,
    entry: Entry,
}

impl<'a> EntryBuilder<'a> {
    pub(crate) fn new(logger: &'a Logger, category: Category) -> Self {
        Self {
            logger,
            entry: Entry::new(category),
        }
    }

    /// Add a primary chunk.
    #[must_use = "builder methods return a new value"]
    pub fn append(mut self, text: impl Into<String>, level: Level) -> Self {
        self.entry
            .chunks
            .push(Chunk::new(text.into(), self.entry.category, level, false));
        self
    }

    /// Add a chunk marked as supplementary detail for the most recent
    /// primary chunk. Extra chunks are filtered by a sink's extra mask and
    /// never contribute to the entry's maximum severity.
    #[must_use = "builder methods return a new value"]
    pub fn append_extra(mut self, text: impl Into<String>, level: Level) -> Self {
        self.entry
            .chunks
            .push(Chunk::new(text.into(), self.entry.category, level, true));
        self
    }

    /// Attach a tag, order-preserving; duplicates allowed. Tag text is
    /// sanitized like chunk text.
    #[must_use = "builder methods return a new value"]
    pub fn append_tag(mut self, tag: impl Into<String>) -> Self {
        self.entry.tags.push(sanitize(&tag.into()));
        self
    }

    /// Number of chunks accumulated so far.
    pub fn len(&self) -> usize {
        self.entry.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.chunks.is_empty()
    }

    /// Finalize the entry: enqueue it, wake the dispatcher, and evaluate
    /// escalation against the entry's maximum severity.
    ///
    /// An empty entry is not enqueued; it produces a single pipeline
    /// warning instead. Returns `LoggerError::Escalated` when the
    /// exception mask matches; terminates the process (after draining)
    /// when the termination mask matches.
    pub fn finalize(self) -> Result<()> {
        self.logger.finalize_entry(self.entry)
    }
}

impl std::fmt::Debug for EntryBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryBuilder")
            .field("category", &self.entry.category)
            .field("chunks", &self.entry.chunks.len())
            .field("tags", &self.entry.tags.len())
            .finish()
    }
}
