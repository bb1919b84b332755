//! One image's worth of annotation data.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOutput, ImageStats};
use crate::model::{FiberSet, Nucleus};

/// An image with its nuclei and fiber annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Path to the source image.
    pub path: PathBuf,

    /// Nucleus markers, detected or manually placed.
    #[serde(default)]
    pub nuclei: Vec<Nucleus>,

    /// Fiber outlines and area ratio.
    #[serde(default)]
    pub fibers: FiberSet,
}

impl ImageEntry {
    /// Create an entry with no annotation data yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            nuclei: Vec::new(),
            fibers: FiberSet::new(),
        }
    }

    /// The entry's file name component (empty if the path has none).
    pub fn file_name(&self) -> OsString {
        self.path.file_name().map(OsString::from).unwrap_or_default()
    }

    /// Replace the annotation data with a fresh analysis result.
    pub fn apply_analysis(&mut self, output: AnalysisOutput) {
        self.nuclei = output.nuclei;
        self.fibers = output.fibers;
    }

    /// Current summary statistics for this entry.
    pub fn stats(&self) -> ImageStats {
        ImageStats::compute(&self.nuclei, &self.fibers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FiberContour;

    #[test]
    fn test_new_entry_is_blank() {
        let entry = ImageEntry::new("/images/a.png");
        assert!(entry.nuclei.is_empty());
        assert!(entry.fibers.is_empty());
        assert_eq!(entry.file_name(), "a.png");
        assert_eq!(entry.stats().positive_ratio, None);
    }

    #[test]
    fn test_apply_analysis_replaces_wholesale() {
        let mut entry = ImageEntry::new("/images/a.png");
        entry.nuclei.push(Nucleus::outside(1.0, 1.0));

        entry.apply_analysis(AnalysisOutput {
            nuclei: vec![Nucleus::inside(5.0, 5.0)],
            fibers: FiberSet::with_data(vec![FiberContour::new(vec![(0, 0)])], 0.3),
        });

        assert_eq!(entry.nuclei, vec![Nucleus::inside(5.0, 5.0)]);
        assert_eq!(entry.fibers.len(), 1);
        assert!((entry.fibers.area_ratio - 0.3).abs() < 1e-12);
    }
}
