//! Append-only line writer with size-based rotation.
//!
//! Once the file grows past [`MAX_FILE_SIZE_BYTES`] it is renamed to
//! `<stem>.json.<unix seconds>` and a fresh file is started. Only the newest
//! [`MAX_BACKUP_FILES`] rotated files are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size at which the current file is rotated (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated files kept next to the current one.
const MAX_BACKUP_FILES: usize = 3;

pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    /// Opened on first write and dropped on rotation.
    file: Mutex<Option<File>>,
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl FileWriter {
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limit(file_path, MAX_FILE_SIZE_BYTES)
    }

    const fn with_limit(file_path: PathBuf, max_bytes: u64) -> Self {
        Self {
            file_path,
            max_bytes,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline, rotating first if the file is too big.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be rotated, opened or written, or if the lock
    /// was poisoned by a panicking writer.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("writer lock poisoned: {e}")))?;

        if self.needs_rotation() {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            let opened = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *guard = Some(opened);
        }
        let Some(file) = guard.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable"));
        };

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.file_path).is_ok_and(|m| m.len() > self.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let mut backup = self.file_path.with_extension(format!("json.{stamp}"));
        let mut suffix = 1;
        while backup.exists() {
            backup = self.file_path.with_extension(format!("json.{stamp}-{suffix}"));
            suffix += 1;
        }

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup)?;
        }

        prune_backups(&self.file_path)
    }
}

/// Deletes all but the newest [`MAX_BACKUP_FILES`] rotated copies of `path`.
fn prune_backups(path: &Path) -> io::Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return Ok(());
    };
    let prefix = format!("{stem}.json.");

    let mut backups: Vec<(Option<SystemTime>, PathBuf)> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .map(|p| (fs::metadata(&p).and_then(|m| m.modified()).ok(), p))
        .collect();

    backups.sort_by(|a, b| b.cmp(a));

    for (_, stale) in backups.iter().skip(MAX_BACKUP_FILES) {
        let _ = fs::remove_file(stale);
    }
    Ok(())
}
