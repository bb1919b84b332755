//! Serialized form of a project.
//!
//! `ProjectData` is what actually lands in the project's data file: the
//! ordered image records with paths reduced to bare file names (resolved
//! against the project's originals folder on load), the annotation data,
//! and the analysis settings the project was computed with. Selection and
//! any other view state are never persisted.
//!
//! # Versioning
//!
//! The format uses semantic versioning. Version 0.x.x is unstable: minor
//! bumps may change the format, and files are only guaranteed compatible
//! within the same minor version.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::AnalysisSettings;
use crate::model::{FiberSet, Nucleus};
use crate::store::{AnnotationCollection, ImageEntry};

/// Complete serialized project state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    /// Format version for compatibility checking.
    pub version: String,

    /// Analysis settings the annotations were computed with.
    #[serde(default)]
    pub settings: AnalysisSettings,

    /// Image records in display order.
    pub images: Vec<ImageRecord>,
}

/// One image's serialized annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// File name inside the project's originals folder.
    pub file: PathBuf,

    /// Nucleus markers.
    #[serde(default)]
    pub nuclei: Vec<Nucleus>,

    /// Fiber outlines and area ratio.
    #[serde(default)]
    pub fibers: FiberSet,
}

impl ProjectData {
    /// Current version of the project data format.
    pub const CURRENT_VERSION: &'static str = "0.1.0";

    /// Major version number for compatibility checking.
    pub const VERSION_MAJOR: u32 = 0;

    /// Minor version number.
    pub const VERSION_MINOR: u32 = 1;

    /// Snapshot a collection for serialization.
    ///
    /// Every path is reduced to its file name; the collection's uniqueness
    /// invariant guarantees names stay unambiguous.
    pub fn from_collection(collection: &AnnotationCollection, settings: &AnalysisSettings) -> Self {
        let images = collection
            .iter()
            .map(|entry| ImageRecord {
                file: PathBuf::from(entry.file_name()),
                nuclei: entry.nuclei.clone(),
                fibers: entry.fibers.clone(),
            })
            .collect();

        Self {
            version: Self::CURRENT_VERSION.to_string(),
            settings: settings.clone(),
            images,
        }
    }

    /// Parse a version string into (major, minor, patch) components.
    ///
    /// Returns None if the version string is invalid.
    pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return None;
        }
        let major = parts[0].parse().ok()?;
        let minor = parts[1].parse().ok()?;
        let patch = parts[2].parse().ok()?;
        Some((major, minor, patch))
    }

    /// Check if a file with this version can be read at all.
    pub fn is_version_readable(file_version: &str) -> bool {
        let Some((file_major, _, _)) = Self::parse_version(file_version) else {
            return false;
        };
        file_major == 0 || file_major == Self::VERSION_MAJOR
    }

    /// Check if a version is fully compatible with the current one.
    ///
    /// In unstable v0, only the same minor version is fully compatible.
    pub fn is_version_compatible(file_version: &str) -> bool {
        let Some((file_major, file_minor, _)) = Self::parse_version(file_version) else {
            return false;
        };
        if Self::VERSION_MAJOR == 0 {
            file_major == 0 && file_minor == Self::VERSION_MINOR
        } else {
            file_major == Self::VERSION_MAJOR
        }
    }
}

impl ImageRecord {
    /// Turn this record back into a live entry rooted in `originals`.
    pub fn into_entry(self, originals: &Path) -> ImageEntry {
        ImageEntry {
            path: originals.join(&self.file),
            nuclei: self.nuclei,
            fibers: self.fibers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_reduced_to_file_names() {
        let mut collection = AnnotationCollection::new();
        collection.append(vec![
            ImageEntry::new("/somewhere/deep/a.png"),
            ImageEntry::new("/elsewhere/b.png"),
        ]);

        let data = ProjectData::from_collection(&collection, &AnalysisSettings::default());
        assert_eq!(data.images.len(), 2);
        assert_eq!(data.images[0].file, PathBuf::from("a.png"));
        assert_eq!(data.images[1].file, PathBuf::from("b.png"));
    }

    #[test]
    fn test_record_rebasing() {
        let record = ImageRecord {
            file: PathBuf::from("a.png"),
            nuclei: vec![Nucleus::inside(1.0, 2.0)],
            fibers: FiberSet::new(),
        };
        let entry = record.into_entry(Path::new("/proj/Original Images"));
        assert_eq!(entry.path, PathBuf::from("/proj/Original Images/a.png"));
        assert_eq!(entry.nuclei.len(), 1);
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(ProjectData::parse_version("0.1.0"), Some((0, 1, 0)));
        assert_eq!(ProjectData::parse_version("1.2.3"), Some((1, 2, 3)));
        assert_eq!(ProjectData::parse_version("invalid"), None);
        assert_eq!(ProjectData::parse_version("1.2"), None);
    }

    #[test]
    fn test_version_compatibility() {
        assert!(ProjectData::is_version_compatible(
            ProjectData::CURRENT_VERSION
        ));
        assert!(!ProjectData::is_version_compatible("0.2.0"));
        assert!(!ProjectData::is_version_compatible("1.0.0"));

        assert!(ProjectData::is_version_readable("0.2.0"));
        assert!(!ProjectData::is_version_readable("nonsense"));
    }

    #[test]
    fn test_settings_default_when_absent() {
        // Data files written before settings were stored must still load.
        let json = r#"{"version": "0.1.0", "images": []}"#;
        let data: ProjectData = serde_json::from_str(json).unwrap();
        assert_eq!(data.settings, AnalysisSettings::default());
    }
}
