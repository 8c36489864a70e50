//! The directory of captured images.
//!
//! Images are named `<sequence>.<ext>`; the sequence number is the captured
//! point's name.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::SurveyError;
use crate::model::PointName;

/// Where captured images live. Validates duplicate names and deletes images.
pub trait CaptureStore {
    fn contains(&self, name: PointName) -> bool;

    /// Delete the image for `name`, returning the removed path.
    fn remove(&mut self, name: PointName) -> Result<PathBuf, SurveyError>;
}

#[derive(Debug, Clone)]
pub struct ImageDirectory {
    dir: PathBuf,
    extension: String,
}

impl ImageDirectory {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self { dir: dir.into(), extension: extension.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the image for `name`. Extension compared case-insensitively.
    pub fn path_for(&self, name: PointName) -> Option<PathBuf> {
        let stem = name.to_string();
        let entries = fs::read_dir(&self.dir).ok()?;
        entries
            .flatten()
            .map(|e| e.path())
            .find(|p| p.is_file() && self.matches(p) && stem_of(p) == Some(stem.as_str()))
    }

    /// Names of all images with a numeric stem, ascending.
    pub fn names(&self) -> Result<Vec<PointName>, SurveyError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| SurveyError::Io(format!("{}: {e}", self.dir.display())))?;
        let mut names: Vec<PointName> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && self.matches(p))
            .filter_map(|p| stem_of(&p).and_then(|s| s.parse().ok()))
            .collect();
        names.sort_unstable();
        Ok(names)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

impl CaptureStore for ImageDirectory {
    fn contains(&self, name: PointName) -> bool {
        self.path_for(name).is_some()
    }

    fn remove(&mut self, name: PointName) -> Result<PathBuf, SurveyError> {
        let path = self.path_for(name).ok_or_else(|| {
            SurveyError::Io(format!("no image {name}.{} in {}", self.extension, self.dir.display()))
        })?;
        fs::remove_file(&path).map_err(|e| SurveyError::Io(format!("{}: {e}", path.display())))?;
        log::info!("deleted image {}", path.display());
        Ok(path)
    }
}

fn stem_of(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

// ---------------------------------------------------------------------------
// Timed rename
// ---------------------------------------------------------------------------

const RENAMEABLE: &[&str] = &["jpg", "jpeg"];

/// Rename every JPEG in `dir` to `1.<ext>`, `2.<ext>`, ... in capture order,
/// so image numbers line up with waypoint numbers. With `batch`, names become
/// `<batch>#<n>.<ext>`.
///
/// Capture time is the earlier of the created and modified timestamps: a
/// copied file gets a fresh creation time but keeps its modification time.
/// Returns `(old, new)` file names in capture order.
pub fn timed_rename(dir: &Path, batch: Option<&str>) -> Result<Vec<(String, String)>, SurveyError> {
    let io_err = |e: std::io::Error| SurveyError::Io(format!("{}: {e}", dir.display()));

    let mut files: Vec<(SystemTime, String, String)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)?.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !path.is_file() || !RENAMEABLE.iter().any(|r| ext.eq_ignore_ascii_case(r)) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let meta = entry.metadata().map_err(io_err)?;
        let modified = meta.modified().map_err(io_err)?;
        let taken = match meta.created() {
            Ok(created) if created < modified => created,
            _ => modified,
        };
        files.push((taken, file_name.to_string(), ext.to_string()));
    }
    files.sort();

    // Two phases so a target name never collides with a not-yet-renamed file
    let mut staged = Vec::with_capacity(files.len());
    for (i, (_, name, ext)) in files.iter().enumerate() {
        let tmp = format!(".flightcheck-rename-{i}.{ext}");
        fs::rename(dir.join(name), dir.join(&tmp)).map_err(io_err)?;
        staged.push(tmp);
    }

    let mut renamed = Vec::with_capacity(files.len());
    for (i, ((_, name, ext), tmp)) in files.iter().zip(staged).enumerate() {
        let target = match batch {
            Some(prefix) => format!("{prefix}#{}.{ext}", i + 1),
            None => format!("{}.{ext}", i + 1),
        };
        fs::rename(dir.join(&tmp), dir.join(&target)).map_err(io_err)?;
        log::debug!("renamed {name} -> {target}");
        renamed.push((name.clone(), target));
    }

    log::info!("renamed {} images in {}", renamed.len(), dir.display());
    Ok(renamed)
}
