//! Derived outputs that follow the point sets.
//!
//! Whenever reconciliation mutates a set, the files derived from it are
//! rebuilt so what is on disk always matches what is in memory.

use std::path::{Path, PathBuf};

use crate::accuracy::AccuracyReport;
use crate::error::SurveyError;
use crate::model::PointSet;
use crate::tabular;

pub trait ArtifactSink {
    /// The planned set lost points.
    fn planned_changed(&mut self, planned: &PointSet) -> Result<(), SurveyError>;

    /// The captured set lost points.
    fn captured_changed(&mut self, captured: &PointSet) -> Result<(), SurveyError>;

    /// The sets are aligned and measured.
    fn accuracy_ready(
        &mut self,
        captured: &PointSet,
        report: &AccuracyReport,
    ) -> Result<(), SurveyError>;
}

/// Rewrites the planned and captured point tables in place.
#[derive(Debug, Clone)]
pub struct CsvArtifacts {
    planned: PathBuf,
    captured: PathBuf,
}

impl CsvArtifacts {
    pub fn new(planned: impl Into<PathBuf>, captured: impl Into<PathBuf>) -> Self {
        Self { planned: planned.into(), captured: captured.into() }
    }
}

impl ArtifactSink for CsvArtifacts {
    fn planned_changed(&mut self, planned: &PointSet) -> Result<(), SurveyError> {
        tabular::write_point_set(&self.planned, planned, None)?;
        log::info!("regenerated {}", self.planned.display());
        Ok(())
    }

    fn captured_changed(&mut self, captured: &PointSet) -> Result<(), SurveyError> {
        tabular::write_point_set(&self.captured, captured, None)?;
        log::info!("regenerated {}", self.captured.display());
        Ok(())
    }

    fn accuracy_ready(
        &mut self,
        captured: &PointSet,
        report: &AccuracyReport,
    ) -> Result<(), SurveyError> {
        tabular::write_point_set(&self.captured, captured, Some(report))?;
        log::info!("wrote distances to {}", self.captured.display());
        Ok(())
    }
}

/// Sink that writes nothing, for dry runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoArtifacts;

impl ArtifactSink for NoArtifacts {
    fn planned_changed(&mut self, _: &PointSet) -> Result<(), SurveyError> {
        Ok(())
    }

    fn captured_changed(&mut self, _: &PointSet) -> Result<(), SurveyError> {
        Ok(())
    }

    fn accuracy_ready(&mut self, _: &PointSet, _: &AccuracyReport) -> Result<(), SurveyError> {
        Ok(())
    }
}

/// Copy `files` into `dir` (created if needed) before anything mutates them.
/// Returns the backup paths.
pub fn backup(files: &[&Path], dir: &Path) -> Result<Vec<PathBuf>, SurveyError> {
    std::fs::create_dir_all(dir).map_err(|e| SurveyError::Io(format!("{}: {e}", dir.display())))?;

    let mut copies = Vec::with_capacity(files.len());
    for file in files {
        let name = file
            .file_name()
            .ok_or_else(|| SurveyError::Io(format!("{}: not a file", file.display())))?;
        let target = dir.join(name);
        std::fs::copy(file, &target)
            .map_err(|e| SurveyError::Io(format!("{}: {e}", file.display())))?;
        log::info!("backed up {} to {}", file.display(), target.display());
        copies.push(target);
    }
    Ok(copies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, SetKind};

    #[test]
    fn rewrites_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let pre = tmp.path().join("pre.csv");
        let post = tmp.path().join("post.csv");
        let mut sink = CsvArtifacts::new(&pre, &post);

        let set = PointSet::new(SetKind::Planned, vec![Point::new(1, 1.0, 2.0)]).unwrap();
        sink.planned_changed(&set).unwrap();
        let text = std::fs::read_to_string(&pre).unwrap();
        assert!(text.starts_with("Name,Latitude,Longitude,Easting,Northing,Geometry\n"));
        assert!(text.contains("1,,,1,2,POINT (1 2)"));
        assert!(!post.exists());
    }

    #[test]
    fn backup_copies_into_new_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let pre = tmp.path().join("PreCoordinates.csv");
        std::fs::write(&pre, "Name\n").unwrap();

        let dir = tmp.path().join("InitialOutputsBackup");
        let copies = backup(&[pre.as_path()], &dir).unwrap();
        assert_eq!(copies, vec![dir.join("PreCoordinates.csv")]);
        assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), "Name\n");
        assert!(pre.exists());
    }

    #[test]
    fn backup_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = backup(&[tmp.path().join("nope.csv").as_path()], tmp.path()).unwrap_err();
        assert!(matches!(err, SurveyError::Io(_)));
    }
}
