//! Sink destination variants

use std::fs::File;
use std::io::{self, BufWriter, Write};

/// A sink's destination, chosen once at registration.
///
/// The variant set is closed; dispatch never re-decides the destination
/// kind per write.
pub enum SinkTarget {
    /// Arbitrary byte stream whose lifetime exceeds the logger's.
    Stream(Box<dyn Write + Send>),
    /// Owned log file, buffered.
    File(BufWriter<File>),
}

impl SinkTarget {
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            SinkTarget::Stream(stream) => stream.write_all(bytes),
            SinkTarget::File(file) => file.write_all(bytes),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkTarget::Stream(stream) => stream.flush(),
            SinkTarget::File(file) => file.flush(),
        }
    }
}

impl std::fmt::Debug for SinkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkTarget::Stream(_) => f.write_str("SinkTarget::Stream"),
            SinkTarget::File(_) => f.write_str("SinkTarget::File"),
        }
    }
}
