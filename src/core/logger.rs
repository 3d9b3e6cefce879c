//! Main logger implementation

use super::builder::EntryBuilder;
use super::dispatch::{DispatcherState, Pipeline};
use super::error::{LoggerError, Result};
use super::escalation::{Escalation, EscalationPolicy};
use super::metrics::LoggerMetrics;
use super::severity::{Category, SeverityMask};
use super::timestamp;
use crate::sinks::{Sink, SinkRef, SinkTarget};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread;

/// The logging service: sink registry, dispatch queue, escalation policy,
/// and the background consumer thread.
///
/// All methods take `&self`; a `Logger` can be shared across producer
/// threads directly or behind an `Arc`. Dropping a logger drains the queue
/// so no finalized entry is lost.
///
/// # Example
///
/// ```
/// use prism_log::{Category, Level, Logger, SeverityMask};
///
/// let logger = Logger::new();
/// logger.disable_termination();
/// let sink = logger.add_stream(
///     Box::new(std::io::stdout()),
///     SeverityMask::every(Category::Error) | SeverityMask::minor(Category::Message),
///     SeverityMask::EMPTY,
/// );
/// sink.with_tags(true);
///
/// logger
///     .entry(Category::Message)
///     .append("renderer online", Level::Minor)
///     .finalize()?;
/// logger.stop();
/// # Ok::<(), prism_log::LoggerError>(())
/// ```
pub struct Logger {
    pipeline: Arc<Pipeline>,
    policy: RwLock<EscalationPolicy>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline: Arc::new(Pipeline::new()),
            policy: RwLock::new(EscalationPolicy::default()),
            handle: Mutex::new(None),
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Start a new entry. Nothing is enqueued until `finalize`.
    pub fn entry(&self, category: Category) -> EntryBuilder<'_> {
        EntryBuilder::new(self, category)
    }

    /// Register an arbitrary byte stream as a sink.
    ///
    /// The stream is probed once; if it is already unwritable the
    /// registration degrades to an inert reference and a warning flows
    /// through the pipeline instead.
    pub fn add_stream(
        &self,
        mut stream: Box<dyn Write + Send>,
        primary_mask: SeverityMask,
        extra_mask: SeverityMask,
    ) -> SinkRef {
        if let Err(err) = stream.flush() {
            self.pipeline
                .warn_internal(format!("stream sink rejected: {}", err));
            return SinkRef::inert(Arc::clone(&self.pipeline));
        }
        self.register(|id| {
            Sink::new(
                format!("stream-{}", id),
                primary_mask,
                extra_mask,
                SinkTarget::Stream(stream),
            )
            .with_id(id)
        })
    }

    /// Register a log file as a sink, creating parent directories as
    /// needed. When `timestamped` is set the opened file name carries a
    /// filename-safe stamp appended to the stem.
    ///
    /// On open failure the registration degrades to an inert reference and
    /// a warning flows through the pipeline.
    pub fn add_file(
        &self,
        path: impl Into<PathBuf>,
        primary_mask: SeverityMask,
        extra_mask: SeverityMask,
        timestamped: bool,
    ) -> SinkRef {
        let path = path.into();
        match open_log_file(&path, timestamped) {
            Ok((writer, opened_path)) => self.register(|id| {
                Sink::new(
                    format!("file:{}", opened_path.display()),
                    primary_mask,
                    extra_mask,
                    SinkTarget::File(writer),
                )
                .with_id(id)
            }),
            Err(err) => {
                self.pipeline.warn_internal(format!(
                    "file sink '{}' rejected: {}",
                    path.display(),
                    err
                ));
                SinkRef::inert(Arc::clone(&self.pipeline))
            }
        }
    }

    fn register(&self, make_sink: impl FnOnce(usize) -> Sink) -> SinkRef {
        let sink = {
            let mut registry = self.pipeline.registry.write();
            let sink = Arc::new(make_sink(registry.len()));
            registry.push(Arc::clone(&sink));
            sink
        };
        // First registration brings the dispatcher up.
        self.start();
        SinkRef::live(sink, Arc::clone(&self.pipeline))
    }

    /// Raise a typed error from `finalize` for entries whose maximum
    /// severity matches `mask`.
    pub fn enable_exceptions(&self, mask: SeverityMask) {
        self.policy.write().exception_mask = mask;
    }

    pub fn disable_exceptions(&self) {
        self.policy.write().exception_mask = SeverityMask::EMPTY;
    }

    /// Terminate the process (after draining) for entries whose maximum
    /// severity matches `mask`. Default: `every(error)`.
    pub fn enable_termination(&self, mask: SeverityMask) {
        self.policy.write().termination_mask = mask;
    }

    pub fn disable_termination(&self) {
        self.policy.write().termination_mask = SeverityMask::EMPTY;
    }

    /// Current escalation policy snapshot.
    pub fn escalation_policy(&self) -> EscalationPolicy {
        *self.policy.read()
    }

    /// Spawn the consumer thread if the dispatcher is stopped. Idempotent.
    pub fn start(&self) {
        let mut handle = self.handle.lock();
        if self.pipeline.begin_running() {
            let pipeline = Arc::clone(&self.pipeline);
            *handle = Some(thread::spawn(move || pipeline.run()));
        }
    }

    /// Request a drain and wait until every queued entry has been written
    /// and the consumer thread has exited. Idempotent; a stopped logger
    /// returns immediately.
    pub fn stop(&self) {
        // The drain request and the handle take happen under the handle
        // lock, so a concurrent registration cannot store a fresh consumer
        // handle between them.
        let handle = {
            let mut handle = self.handle.lock();
            if !self.pipeline.request_drain() {
                return;
            }
            handle.take()
        };
        match handle {
            Some(handle) => {
                let _ = handle.join();
            }
            // Another stop already took the handle; wait for its drain.
            None => self.pipeline.wait_until_stopped(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.pipeline.is_running()
    }

    /// Dispatcher lifecycle state.
    pub fn state(&self) -> DispatcherState {
        self.pipeline.state()
    }

    /// Pipeline metrics for observability.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.pipeline.metrics
    }

    /// Flush every registered sink. Every sink is attempted even when an
    /// earlier one fails; the first failure is returned afterwards.
    pub fn flush(&self) -> Result<()> {
        let sinks: Vec<Arc<Sink>> = self.pipeline.registry.read().clone();
        let mut first_failure = None;
        for sink in sinks {
            if let Err(err) = sink.flush() {
                if first_failure.is_none() {
                    first_failure = Some(LoggerError::io_operation(
                        format!("flushing sink '{}'", sink.name()),
                        err,
                    ));
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Finalization: enqueue (if non-empty) then evaluate escalation.
    ///
    /// Escalation runs synchronously on the calling producer thread and
    /// forces a full drain first so the triggering entry is never lost.
    pub(crate) fn finalize_entry(&self, entry: super::entry::Entry) -> Result<()> {
        if entry.is_empty() {
            self.pipeline.metrics.record_empty_entry();
            if !entry.internal {
                self.pipeline.warn_internal("empty entry ignored".to_string());
            }
            return Ok(());
        }

        let category = entry.category;
        let severity = entry.max_severity();
        let internal = entry.internal;
        let summary = entry.summary();

        self.pipeline.push(entry);

        if internal {
            return Ok(());
        }
        // Entries with only extra chunks dispatch but never escalate.
        let Some(level) = severity else {
            return Ok(());
        };

        let policy = *self.policy.read();
        match policy.decide(category, level) {
            Escalation::None => Ok(()),
            Escalation::Exception => {
                self.stop();
                Err(LoggerError::Escalated {
                    category,
                    level,
                    summary,
                })
            }
            Escalation::Terminate => {
                self.stop();
                std::process::exit(1);
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Drain everything finalized before shutdown, then flush.
        self.stop();
        let _ = self.flush();
    }
}

fn open_log_file(path: &Path, timestamped: bool) -> io::Result<(BufWriter<File>, PathBuf)> {
    let path = if timestamped {
        timestamped_path(path)
    } else {
        path.to_path_buf()
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((BufWriter::new(file), path))
}

fn timestamped_path(path: &Path) -> PathBuf {
    let stamp = timestamp::file_stamp(&Utc::now());
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("log");
    let name = match path.extension().and_then(OsStr::to_str) {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext),
        None => format!("{}_{}", stem, stamp),
    };
    path.with_file_name(name)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use prism_log::{Category, Logger, SeverityMask};
///
/// let logger = Logger::builder()
///     .exceptions(SeverityMask::critical(Category::Error))
///     .termination(SeverityMask::EMPTY)
///     .build();
/// assert!(!logger.is_running());
/// ```
pub struct LoggerBuilder {
    policy: EscalationPolicy,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            policy: EscalationPolicy::default(),
        }
    }

    /// Set the exception mask
    #[must_use = "builder methods return a new value"]
    pub fn exceptions(mut self, mask: SeverityMask) -> Self {
        self.policy.exception_mask = mask;
        self
    }

    /// Set the termination mask
    #[must_use = "builder methods return a new value"]
    pub fn termination(mut self, mask: SeverityMask) -> Self {
        self.policy.termination_mask = mask;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let logger = Logger::new();
        *logger.policy.write() = self.policy;
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Process-wide logger instance.
///
/// Statics run no destructors, so call [`Logger::stop`] (or the free
/// [`stop`]) before process exit to guarantee the drain; owned `Logger`
/// instances drain automatically on drop.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Start a new entry on the global logger.
pub fn entry(category: Category) -> EntryBuilder<'static> {
    global().entry(category)
}

/// Register a stream sink on the global logger.
pub fn add_stream(
    stream: Box<dyn Write + Send>,
    primary_mask: SeverityMask,
    extra_mask: SeverityMask,
) -> SinkRef {
    global().add_stream(stream, primary_mask, extra_mask)
}

/// Register a file sink on the global logger.
pub fn add_file(
    path: impl Into<PathBuf>,
    primary_mask: SeverityMask,
    extra_mask: SeverityMask,
    timestamped: bool,
) -> SinkRef {
    global().add_file(path, primary_mask, extra_mask, timestamped)
}

pub fn enable_exceptions(mask: SeverityMask) {
    global().enable_exceptions(mask);
}

pub fn disable_exceptions() {
    global().disable_exceptions();
}

pub fn enable_termination(mask: SeverityMask) {
    global().enable_termination(mask);
}

pub fn disable_termination() {
    global().disable_termination();
}

pub fn start() {
    global().start();
}

pub fn stop() {
    global().stop();
}

pub fn is_running() -> bool {
    global().is_running()
}
