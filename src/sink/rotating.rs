//! Size-based rotating file sink
//!
//! Wraps a plain append-only file writer with a rotation check that runs
//! before every append: once the active file reaches the size limit it is
//! renamed to a dated, numbered archive and a fresh file takes its place on
//! the next write. Rotation and cleanup are best-effort; only the append
//! itself can fail the write.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use super::retention::{self, DEFAULT_KEEP_DAYS};

/// Default rotation threshold: 5 MiB
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Extension used for archives when the active path has none
const FALLBACK_EXTENSION: &str = "log";

/// Size and retention limits attached to one sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the active file reaches this many bytes
    pub max_size_bytes: u64,
    /// Delete archives older than this many days
    pub keep_days: u64,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            keep_days: DEFAULT_KEEP_DAYS,
        }
    }
}

/// Append-only file sink with size-based rotation and age-based retention
///
/// The sink exclusively owns one lazily-opened write handle. A single
/// process must own a given active file path; concurrent rotation from
/// independent processes is not coordinated beyond rename atomicity.
pub struct RotatingSink {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
}

impl RotatingSink {
    /// Create a sink for an active file path
    ///
    /// The file itself is created lazily on first write. The parent
    /// directory must already exist.
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            file: None,
        }
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one newline-terminated formatted line
    ///
    /// Rotates the active file first if it has grown past the size limit.
    /// Rotation failures never surface here; only the append can error.
    pub fn write(&mut self, line: &str) -> io::Result<()> {
        self.rotate_if_needed();

        let file = self.open_handle()?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Lazily open the append handle, creating the active file if absent
    fn open_handle(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }
        // Handle was either already open or just created above
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file handle unavailable"))
    }

    /// Rotate the active file if it has reached the size limit
    ///
    /// Best-effort: every failure leaves the current file in place and the
    /// pending write proceeds against it.
    fn rotate_if_needed(&mut self) {
        // Fresh stat every time; the size can change between writes and a
        // missing or unreadable file means there is nothing to rotate
        let size = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(_) => return,
        };
        if size < self.policy.max_size_bytes {
            return;
        }

        let archive_path = self.next_archive_path(Local::now().date_naive());

        // Close our handle before the rename so no writer keeps appending
        // to the archived inode, and so the rename works on platforms that
        // refuse to move open files
        self.file = None;

        if let Err(err) = fs::rename(&self.path, &archive_path) {
            tracing::warn!(
                "Failed to rotate {} to {}: {}",
                self.path.display(),
                archive_path.display(),
                err
            );
            return;
        }

        // Cleanup only runs after a successful rotation
        let (dir, base, ext) = self.split_path();
        match retention::cleanup_old_archives(&dir, &base, &ext, self.policy.keep_days) {
            Ok(count) if count > 0 => {
                tracing::debug!("Removed {} expired archive(s) of {}", count, base);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("Archive cleanup for {} failed: {}", base, err);
            }
        }
    }

    /// First unused archive name for the given date, probing from index 1
    fn next_archive_path(&self, date: NaiveDate) -> PathBuf {
        let (dir, base, ext) = self.split_path();
        let stamp = date.format("%Y-%m-%d");

        let mut index: u32 = 1;
        loop {
            let candidate = dir.join(format!("{}-{}-{}.{}", base, stamp, index, ext));
            if !candidate.exists() {
                return candidate;
            }
            index += 1;
        }
    }

    /// Split the active path into directory, base name, and extension
    fn split_path(&self) -> (PathBuf, String, String) {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let base = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string());
        let ext = self
            .path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
        (dir, base, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today_stamp() -> String {
        Local::now().date_naive().format("%Y-%m-%d").to_string()
    }

    fn dir_entry_count(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_write_creates_file_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut sink = RotatingSink::new(&path, RotationPolicy::default());
        assert!(!path.exists());

        sink.write("first line\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first line\n");
    }

    #[test]
    fn test_no_rotation_below_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 1024,
                keep_days: 30,
            },
        );

        sink.write("one\n").unwrap();
        sink.write("two\n").unwrap();
        sink.write("three\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
        assert_eq!(dir_entry_count(temp_dir.path()), 1);
    }

    #[test]
    fn test_rotation_at_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 16,
                keep_days: 30,
            },
        );

        sink.write("a line that crosses sixteen bytes\n").unwrap();
        sink.write("fresh line\n").unwrap();

        let archive = temp_dir.path().join(format!("app-{}-1.log", today_stamp()));
        assert!(archive.exists());
        assert_eq!(
            fs::read_to_string(&archive).unwrap(),
            "a line that crosses sixteen bytes\n"
        );
        // Active file holds only the post-rotation line
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh line\n");
    }

    #[test]
    fn test_same_day_rotation_increments_index() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 8,
                keep_days: 30,
            },
        );

        sink.write("long enough line\n").unwrap();
        sink.write("another long line\n").unwrap();
        sink.write("short\n").unwrap();

        let stamp = today_stamp();
        let first = temp_dir.path().join(format!("app-{}-1.log", stamp));
        let second = temp_dir.path().join(format!("app-{}-2.log", stamp));
        assert!(first.exists());
        assert!(second.exists());
        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            "long enough line\n"
        );
        assert_eq!(
            fs::read_to_string(&second).unwrap(),
            "another long line\n"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_rotating_fresh_file_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 1024,
                keep_days: 30,
            },
        );

        // No active file yet, then an empty one
        sink.rotate_if_needed();
        fs::write(&path, b"").unwrap();
        sink.rotate_if_needed();

        assert!(path.exists());
        assert_eq!(dir_entry_count(temp_dir.path()), 1);
    }

    #[test]
    fn test_extensionless_path_archives_with_log_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events");

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 4,
                keep_days: 30,
            },
        );

        sink.write("roll me over\n").unwrap();
        sink.write("next\n").unwrap();

        let archive = temp_dir
            .path()
            .join(format!("events-{}-1.log", today_stamp()));
        assert!(archive.exists());
    }

    #[test]
    fn test_rotation_prunes_expired_archives() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let expired = temp_dir.path().join("app-2025-05-01-1.log");
        fs::write(&expired, b"ancient").unwrap();
        let past = std::time::SystemTime::now()
            - std::time::Duration::from_secs(45 * 24 * 60 * 60);
        OpenOptions::new()
            .write(true)
            .open(&expired)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 4,
                keep_days: 30,
            },
        );

        sink.write("rotate now\n").unwrap();
        sink.write("after\n").unwrap();

        assert!(!expired.exists());
        let archive = temp_dir.path().join(format!("app-{}-1.log", today_stamp()));
        assert!(archive.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_rename_keeps_active_file_and_appends() {
        use std::os::unix::fs::PermissionsExt;

        // Directory permissions don't bind root, so the rename would
        // succeed there and invalidate the setup
        let uid = std::process::Command::new("id").arg("-u").output().unwrap();
        if String::from_utf8_lossy(&uid.stdout).trim() == "0" {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut sink = RotatingSink::new(
            &path,
            RotationPolicy {
                max_size_bytes: 4,
                keep_days: 30,
            },
        );

        sink.write("past the limit\n").unwrap();

        // A read-only directory makes the rename fail while appends to the
        // already-open file would still be possible; the sink must fall
        // back to appending without rotating
        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        let result = sink.write("still logged\n");
        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        result.unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "past the limit\nstill logged\n"
        );
        assert_eq!(dir_entry_count(temp_dir.path()), 1);
    }
}
