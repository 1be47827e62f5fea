use crate::BillboardError;
use chrono::{DateTime, Local};
use image::{ImageFormat, RgbImage};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Every file the store writes starts with this
pub const FILE_PREFIX: &str = "billboard_";

/// How long generated images are kept by default
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// A generated image that was written to an [OutputStore]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub filename: String,
    pub path: PathBuf,
}

/// A directory of generated billboard PNGs, named by creation time and pruned
/// after a retention period
#[derive(Debug, Clone)]
pub struct OutputStore {
    pub dir: PathBuf,
    pub retention: Duration,
}

impl OutputStore {
    pub fn new<P: AsRef<Path>>(dir: P, retention: Duration) -> OutputStore {
        OutputStore {
            dir: dir.as_ref().to_owned(),
            retention,
        }
    }

    /// A store in the system temporary directory with the default retention
    pub fn in_temp_dir() -> OutputStore {
        OutputStore::new(std::env::temp_dir(), DEFAULT_RETENTION)
    }

    /// File name for an image created at `when`, e.g. `billboard_20240704_120000.png`
    pub fn filename_for(when: DateTime<Local>) -> String {
        format!("{FILE_PREFIX}{}.png", when.format("%Y%m%d_%H%M%S"))
    }

    /// Writes `image` as a PNG named after the current time. Several images made
    /// within the same second, from any thread or process, get `_1`, `_2`, ...
    /// suffixes instead of overwriting each other
    pub fn save(&self, image: &RgbImage) -> Result<StoredImage, BillboardError> {
        std::fs::create_dir_all(&self.dir)?;

        let base = Self::filename_for(Local::now());
        let stem = base.trim_end_matches(".png").to_string();
        let mut filename = base;
        let mut n = 0usize;
        let (path, file) = loop {
            let path = self.dir.join(&filename);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    n += 1;
                    filename = format!("{stem}_{n}.png");
                }
                Err(e) => return Err(e.into()),
            }
        };

        let mut writer = BufWriter::new(file);
        let written = image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(BillboardError::from)
            .and_then(|()| writer.flush().map_err(BillboardError::from));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }
        tracing::info!(path = %path.display(), "saved billboard");

        Ok(StoredImage { filename, path })
    }

    /// Path of a previously saved image. Only plain file names produced by this
    /// store are accepted, so requests can't reach outside the directory
    pub fn path_of(&self, filename: &str) -> Result<PathBuf, BillboardError> {
        let plain = !filename.is_empty()
            && filename.starts_with(FILE_PREFIX)
            && !filename.contains(['/', '\\'])
            && !filename.contains("..");
        if !plain {
            return Err(BillboardError::OutputNotFound(filename.to_string()));
        }

        let path = self.dir.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(BillboardError::OutputNotFound(filename.to_string()))
        }
    }

    /// Removes store files whose modification time is older than the retention
    /// period. Files that can't be inspected or removed are left alone, and a
    /// directory that doesn't exist yet has nothing to remove. Returns how many
    /// files were removed
    pub fn cleanup_expired(&self) -> Result<usize, BillboardError> {
        self.cleanup_older_than(SystemTime::now(), self.retention)
    }

    fn cleanup_older_than(&self, now: SystemTime, max_age: Duration) -> Result<usize, BillboardError> {
        let mut removed = 0usize;

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(FILE_PREFIX) {
                continue;
            }

            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age > max_age && std::fs::remove_file(entry.path()).is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, dir = %self.dir.display(), "cleaned up expired billboards");
        }
        Ok(removed)
    }
}
