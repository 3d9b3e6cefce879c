//! Sink registration and filtering
//!
//! A sink wraps one destination together with two severity masks and
//! per-sink preferences. The primary mask filters ordinary chunks, the
//! extra mask filters supplementary chunks. Each sink owns its destination
//! behind its own lock, so no sink ever blocks another.

pub mod target;

pub use target::SinkTarget;

use crate::core::dispatch::Pipeline;
use crate::core::entry::Chunk;
use crate::core::severity::SeverityMask;
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A registered output destination with its filtering masks and
/// preferences. Registered exactly once; identified by a stable id.
pub struct Sink {
    id: usize,
    name: String,
    primary_mask: SeverityMask,
    extra_mask: SeverityMask,
    render_tags: AtomicBool,
    auto_flush: AtomicBool,
    target: Mutex<SinkTarget>,
}

impl Sink {
    /// Wrap a destination with its masks. The sink carries default
    /// preferences until toggled through its [`SinkRef`].
    pub fn new(
        name: impl Into<String>,
        primary_mask: SeverityMask,
        extra_mask: SeverityMask,
        target: SinkTarget,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            primary_mask,
            extra_mask,
            render_tags: AtomicBool::new(false),
            auto_flush: AtomicBool::new(true),
            target: Mutex::new(target),
        }
    }

    /// Stable registry id, assigned once at registration.
    pub(crate) fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_mask(&self) -> SeverityMask {
        self.primary_mask
    }

    pub fn extra_mask(&self) -> SeverityMask {
        self.extra_mask
    }

    pub fn renders_tags(&self) -> bool {
        self.render_tags.load(Ordering::Relaxed)
    }

    pub fn auto_flushes(&self) -> bool {
        self.auto_flush.load(Ordering::Relaxed)
    }

    /// True iff this sink's mask passes the chunk: the primary mask for
    /// ordinary chunks, the extra mask for extra chunks.
    pub fn should_write(&self, chunk: &Chunk) -> bool {
        let mask = if chunk.is_extra {
            self.extra_mask
        } else {
            self.primary_mask
        };
        mask.matches(chunk.category, chunk.level)
    }

    /// Write one formatted entry block: header, optional tag line, one
    /// line per passing chunk (extra chunks indented), trailing blank line.
    pub(crate) fn write_block(
        &self,
        header: &str,
        tag_line: Option<&str>,
        chunks: &[&Chunk],
    ) -> io::Result<()> {
        let mut block = String::with_capacity(header.len() + 64);
        block.push_str(header);
        block.push('\n');
        if self.renders_tags() {
            if let Some(tags) = tag_line {
                block.push_str(tags);
                block.push('\n');
            }
        }
        for chunk in chunks {
            if chunk.is_extra {
                block.push_str("    ");
            }
            block.push_str(&chunk.text);
            block.push('\n');
        }
        block.push('\n');

        let mut target = self.target.lock();
        target.write_all(block.as_bytes())?;
        if self.auto_flushes() {
            target.flush()?;
        }
        Ok(())
    }

    pub(crate) fn flush(&self) -> io::Result<()> {
        self.target.lock().flush()
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("primary_mask", &self.primary_mask)
            .field("extra_mask", &self.extra_mask)
            .finish_non_exhaustive()
    }
}

/// Handle to a registered sink, returned from `add_stream` / `add_file`.
///
/// An inert reference (registration failed) carries no sink; preference
/// changes through it warn through the pipeline and are otherwise no-ops.
#[derive(Clone)]
pub struct SinkRef {
    sink: Option<Arc<Sink>>,
    pipeline: Arc<Pipeline>,
}

impl SinkRef {
    pub(crate) fn live(sink: Arc<Sink>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            sink: Some(sink),
            pipeline,
        }
    }

    pub(crate) fn inert(pipeline: Arc<Pipeline>) -> Self {
        Self {
            sink: None,
            pipeline,
        }
    }

    /// True when registration failed and this reference is a no-op.
    pub fn is_inert(&self) -> bool {
        self.sink.is_none()
    }

    /// Stable id of the registered sink; `None` for inert references.
    pub fn id(&self) -> Option<usize> {
        self.sink.as_ref().map(|sink| sink.id())
    }

    /// Enable or disable tag-line rendering on this sink.
    pub fn with_tags(&self, enabled: bool) -> &Self {
        match &self.sink {
            Some(sink) => sink.render_tags.store(enabled, Ordering::Relaxed),
            None => self.warn_inert("with_tags"),
        }
        self
    }

    /// Enable or disable flushing after every written entry.
    pub fn with_auto_flush(&self, enabled: bool) -> &Self {
        match &self.sink {
            Some(sink) => sink.auto_flush.store(enabled, Ordering::Relaxed),
            None => self.warn_inert("with_auto_flush"),
        }
        self
    }

    fn warn_inert(&self, operation: &str) {
        self.pipeline
            .warn_internal(format!("{} ignored: sink reference is inert", operation));
    }
}

impl std::fmt::Debug for SinkRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkRef").field("id", &self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::severity::{Category, Level};

    fn chunk(category: Category, level: Level, is_extra: bool) -> Chunk {
        Chunk::new("text".to_string(), category, level, is_extra)
    }

    fn memory_sink(primary: SeverityMask, extra: SeverityMask) -> Sink {
        Sink::new(
            "memory",
            primary,
            extra,
            SinkTarget::Stream(Box::new(Vec::new())),
        )
    }

    #[test]
    fn test_should_write_uses_primary_mask_for_primary_chunks() {
        let sink = memory_sink(SeverityMask::every(Category::Error), SeverityMask::EMPTY);

        assert!(sink.should_write(&chunk(Category::Error, Level::Negligible, false)));
        assert!(!sink.should_write(&chunk(Category::Error, Level::Negligible, true)));
        assert!(!sink.should_write(&chunk(Category::Message, Level::Critical, false)));
    }

    #[test]
    fn test_should_write_uses_extra_mask_for_extra_chunks() {
        let sink = memory_sink(SeverityMask::EMPTY, SeverityMask::minor(Category::Warning));

        assert!(sink.should_write(&chunk(Category::Warning, Level::Minor, true)));
        assert!(!sink.should_write(&chunk(Category::Warning, Level::Negligible, true)));
        assert!(!sink.should_write(&chunk(Category::Warning, Level::Minor, false)));
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_block_layout() {
        let buffer = SharedBuf::default();
        let sink = Sink::new(
            "memory",
            SeverityMask::FULL,
            SeverityMask::FULL,
            SinkTarget::Stream(Box::new(buffer.clone())),
        );
        sink.render_tags.store(true, Ordering::Relaxed);

        let mut primary = chunk(Category::Message, Level::Minor, false);
        primary.text = "tick".to_string();
        let mut extra = chunk(Category::Message, Level::Minor, true);
        extra.text = "detail".to_string();

        sink.write_block("-- MESSAGE [0x000001] now --", Some("[startup]"), &[&primary, &extra])
            .expect("write");

        let written = String::from_utf8(buffer.0.lock().clone()).expect("utf-8");
        assert_eq!(
            written,
            "-- MESSAGE [0x000001] now --\n[startup]\ntick\n    detail\n\n"
        );
    }

    #[test]
    fn test_write_block_skips_tag_line_when_disabled() {
        let buffer = SharedBuf::default();
        let sink = Sink::new(
            "memory",
            SeverityMask::FULL,
            SeverityMask::FULL,
            SinkTarget::Stream(Box::new(buffer.clone())),
        );

        let primary = chunk(Category::Info, Level::Negligible, false);
        sink.write_block(".. INFO [0x000002] now ..", Some("[startup]"), &[&primary])
            .expect("write");

        let written = String::from_utf8(buffer.0.lock().clone()).expect("utf-8");
        assert!(!written.contains("[startup]"));
    }

    #[test]
    fn test_preferences_default_and_toggle() {
        let sink = memory_sink(SeverityMask::FULL, SeverityMask::EMPTY);
        assert!(!sink.renders_tags());
        assert!(sink.auto_flushes());

        sink.render_tags.store(true, Ordering::Relaxed);
        sink.auto_flush.store(false, Ordering::Relaxed);
        assert!(sink.renders_tags());
        assert!(!sink.auto_flushes());
    }
}
