//! On-disk directory convention of a floodmap project.
//!
//! `ProjectLayout` only describes paths; nothing is created until
//! [`ProjectLayout::materialize`] is called explicitly.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory layout rooted at a project directory:
///
/// ```text
/// <root>/data/dem
/// <root>/data/rainfall
/// <root>/data/validation
/// <root>/outputs/maps
/// <root>/outputs/statistics
/// <root>/outputs/reports
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Input DEM rasters
    pub fn dem_dir(&self) -> PathBuf {
        self.root.join("data").join("dem")
    }

    /// Input rainfall rasters
    pub fn rainfall_dir(&self) -> PathBuf {
        self.root.join("data").join("rainfall")
    }

    /// Ground-truth data for validating flood maps
    pub fn validation_dir(&self) -> PathBuf {
        self.root.join("data").join("validation")
    }

    /// Derived map products
    pub fn maps_dir(&self) -> PathBuf {
        self.root.join("outputs").join("maps")
    }

    /// Zonal and summary statistics
    pub fn statistics_dir(&self) -> PathBuf {
        self.root.join("outputs").join("statistics")
    }

    /// Rendered reports
    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("outputs").join("reports")
    }

    /// Every directory the layout describes
    pub fn directories(&self) -> [PathBuf; 6] {
        [
            self.dem_dir(),
            self.rainfall_dir(),
            self.validation_dir(),
            self.maps_dir(),
            self.statistics_dir(),
            self.reports_dir(),
        ]
    }

    /// Create the directory tree on disk.
    ///
    /// Idempotent: existing directories are left untouched and repeated
    /// calls succeed.
    pub fn materialize(&self) -> Result<()> {
        for dir in self.directories() {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new("/project");
        assert_eq!(layout.dem_dir(), PathBuf::from("/project/data/dem"));
        assert_eq!(layout.maps_dir(), PathBuf::from("/project/outputs/maps"));
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(tmp.path());

        layout.materialize().unwrap();
        for dir in layout.directories() {
            assert!(dir.is_dir(), "{} should exist", dir.display());
        }

        // Second call must not fail on already-existing directories
        layout.materialize().unwrap();
    }

    #[test]
    fn test_materialize_does_not_run_at_construction() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(tmp.path().join("sub"));
        assert!(!layout.dem_dir().exists());
    }
}
