//! Atomic output commit.
//!
//! Bytes are written to a temporary file in the destination directory and
//! renamed over the target, so a reader never observes a partial file. If
//! the target stays locked after a few retries, the bytes go to a
//! timestamped sibling instead.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Commit behavior.
#[derive(Debug, Clone)]
pub struct CommitOptions {
    /// Attempts after the first one when the target is locked
    pub retries: u32,

    /// Pause between attempts
    pub retry_delay: Duration,

    /// Write `<stem>.<unix-timestamp>.<ext>` when every attempt failed
    pub timestamp_fallback: bool,
}

impl CommitOptions {
    /// Create commit options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Enable or disable the timestamped fallback.
    pub fn with_timestamp_fallback(mut self, enabled: bool) -> Self {
        self.timestamp_fallback = enabled;
        self
    }
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_millis(100),
            timestamp_fallback: true,
        }
    }
}

/// Commit `bytes` to `path` with default options.
///
/// Returns the path actually written.
pub fn commit(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    commit_with(path, bytes, &CommitOptions::default())
}

/// Commit `bytes` to `path`.
pub fn commit_with(path: &Path, bytes: &[u8], options: &CommitOptions) -> Result<PathBuf> {
    commit_using(path, bytes, options, write_atomic)
}

fn commit_using<F>(path: &Path, bytes: &[u8], options: &CommitOptions, mut write: F) -> Result<PathBuf>
where
    F: FnMut(&Path, &[u8]) -> io::Result<()>,
{
    let mut attempt = 0;
    let last_error = loop {
        match write(path, bytes) {
            Ok(()) => {
                debug!("wrote {} ({} bytes)", path.display(), bytes.len());
                return Ok(path.to_path_buf());
            }
            Err(e) if is_contention(&e) => {
                if attempt >= options.retries {
                    break e;
                }
                attempt += 1;
                debug!(
                    "{} is locked, retry {}/{}: {}",
                    path.display(),
                    attempt,
                    options.retries,
                    e
                );
                thread::sleep(options.retry_delay);
            }
            Err(e) => {
                return Err(Error::Commit {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    };

    if !options.timestamp_fallback {
        return Err(Error::Commit {
            path: path.to_path_buf(),
            source: last_error,
        });
    }

    let fallback = timestamped_path(path, Utc::now());
    write(&fallback, bytes).map_err(|source| Error::Commit {
        path: fallback.clone(),
        source,
    })?;
    warn!(
        "{} could not be replaced ({}); wrote {} instead",
        path.display(),
        last_error,
        fallback.display()
    );
    Ok(fallback)
}

/// Write through a temporary sibling and rename it over `path`.
///
/// The temporary file is deleted if any step fails.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Check if an error means another process holds the target.
fn is_contention(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return true;
    }
    // EBUSY, ETXTBSY
    #[cfg(unix)]
    if matches!(err.raw_os_error(), Some(16) | Some(26)) {
        return true;
    }
    false
}

/// Build `<stem>.<unix-timestamp>.<ext>` next to `path`.
pub fn timestamped_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, at.timestamp(), ext.to_string_lossy()),
        None => format!("{}.{}", stem, at.timestamp()),
    };
    path.with_file_name(name)
}
