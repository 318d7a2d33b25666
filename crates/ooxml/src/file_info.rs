//! Filesystem attributes for processed documents.

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use office_meta_core::{FileInfo, Result};
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

/// Stat a file and collect its size and timestamps.
///
/// Creation time is the birth time where the platform reports one and the
/// inode change time otherwise (Unix only).
pub fn collect_file_info(path: &Path) -> Result<FileInfo> {
    let metadata = fs::metadata(path)?;

    Ok(FileInfo {
        file_size: Some(metadata.len()),
        modified_time: metadata.modified().ok().map(format_local),
        created_time: created_time(&metadata).map(format_local),
    })
}

/// Format a timestamp as a local-time ISO-8601 string without offset.
pub fn format_local(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    format_naive(&local.naive_local())
}

/// `YYYY-MM-DDTHH:MM:SS`, with microseconds appended only when non-zero.
fn format_naive(time: &NaiveDateTime) -> String {
    if time.nanosecond() / 1_000 == 0 {
        time.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        time.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn created_time(metadata: &Metadata) -> Option<SystemTime> {
    metadata.created().ok().or_else(|| change_time(metadata))
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}
