//! Archive retention management
//!
//! Deletes rotated-out archive files once they age past the retention
//! window. Runs after every successful rotation.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::Result;

/// Default retention period in days
pub const DEFAULT_KEEP_DAYS: u64 = 30;

/// Delete archives of `base` in `dir` older than the retention period
///
/// Archives are the files named `{base}-*.{ext}`; the active file
/// `{base}.{ext}` never matches the prefix and is never touched. Age is
/// measured from the file's modification time. Entries whose metadata or
/// mtime cannot be read, and files whose deletion fails, are skipped.
///
/// Returns the number of files deleted.
pub fn cleanup_old_archives(dir: &Path, base: &str, ext: &str, keep_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let retention = Duration::from_secs(keep_days * 24 * 60 * 60);
    let cutoff = SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let prefix = format!("{}-", base);
    let suffix = format!(".{}", ext);

    let mut deleted_count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Only process archives belonging to this base name
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !name.starts_with(&prefix) || !name.ends_with(&suffix) {
                continue;
            }
        } else {
            continue;
        }

        // Check file type and modification time
        if let Ok(metadata) = entry.metadata() {
            if !metadata.is_file() {
                continue;
            }
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff && fs::remove_file(&path).is_ok() {
                    deleted_count += 1;
                }
            }
        }
    }

    Ok(deleted_count)
}
