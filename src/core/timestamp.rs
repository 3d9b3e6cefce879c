//! Timestamp rendering for entry headers and timestamped file names

use chrono::{DateTime, Utc};

/// Verbose human-readable stamp used in entry headers.
///
/// # Examples
///
/// ```
/// use prism_log::core::timestamp::header_stamp;
/// use chrono::Utc;
///
/// let stamp = header_stamp(&Utc::now());
/// // "Tuesday 25 August 2026, 10:30:45.123"
/// assert!(stamp.contains(','));
/// ```
#[must_use]
pub fn header_stamp(datetime: &DateTime<Utc>) -> String {
    datetime.format("%A %d %B %Y, %H:%M:%S%.3f").to_string()
}

/// Filename-safe stamp appended to timestamped log file stems.
#[must_use]
pub fn file_stamp(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d_%H-%M-%S").to_string()
}
