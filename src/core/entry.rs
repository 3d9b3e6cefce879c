//! Log entry structure

use super::severity::{Category, Level};
use chrono::{DateTime, Utc};

/// One unit of text produced by a single append operation.
///
/// Extra chunks are supplementary detail attached to the preceding primary
/// chunk; they are filtered against a sink's extra mask and never count
/// toward an entry's maximum severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub category: Category,
    pub level: Level,
    pub is_extra: bool,
}

impl Chunk {
    /// Build a chunk, sanitizing the text.
    pub fn new(text: String, category: Category, level: Level, is_extra: bool) -> Self {
        Self {
            text: sanitize(&text),
            category,
            level,
            is_extra,
        }
    }
}

/// Sanitize chunk or tag text to prevent log injection attacks.
///
/// Replaces newlines, carriage returns, and tabs with escape sequences so
/// appended text can never masquerade as additional log lines.
pub(crate) fn sanitize(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// An ordered sequence of chunks plus tags, immutable once finalized.
///
/// After `finalize` the entry is owned exclusively by the dispatch queue;
/// the producer thread never sees it again.
#[derive(Debug, Clone)]
pub struct Entry {
    pub category: Category,
    pub chunks: Vec<Chunk>,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Entries emitted by the pipeline about itself. They skip escalation
    /// and never produce further pipeline warnings, capping re-entry at
    /// depth 1.
    pub(crate) internal: bool,
}

impl Entry {
    pub(crate) fn new(category: Category) -> Self {
        Self {
            category,
            chunks: Vec::new(),
            tags: Vec::new(),
            timestamp: Utc::now(),
            internal: false,
        }
    }

    pub(crate) fn internal(category: Category) -> Self {
        let mut entry = Self::new(category);
        entry.internal = true;
        entry
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Highest severity (minimum numeric level) among non-extra chunks.
    ///
    /// `None` when the entry holds no primary chunks; such entries are
    /// dispatched but never escalate.
    pub fn max_severity(&self) -> Option<Level> {
        self.chunks
            .iter()
            .filter(|chunk| !chunk.is_extra)
            .map(|chunk| chunk.level)
            .min()
    }

    /// Text of the first primary chunk, used to summarize the entry in
    /// escalation errors.
    pub(crate) fn summary(&self) -> String {
        self.chunks
            .iter()
            .find(|chunk| !chunk.is_extra)
            .map(|chunk| chunk.text.clone())
            .unwrap_or_default()
    }
}
