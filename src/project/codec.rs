//! Project directory save/load.
//!
//! A project is one directory: a JSON data file with the serialized
//! collection, an `Original Images` folder holding the source images, an
//! optional `Altered Images` folder with annotated renders, and a CSV
//! statistics report named after the project.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AnalysisSettings;
use crate::store::AnnotationCollection;

use super::altered::render_annotated;
use super::data::ProjectData;
use super::error::ProjectError;
use super::report::write_report;

/// Name of the folder holding the source images.
pub const ORIGINALS_DIR: &str = "Original Images";

/// Name of the folder holding annotated renders.
pub const ALTERED_DIR: &str = "Altered Images";

/// Name of the serialized collection file.
pub const DATA_FILE: &str = "project.json";

/// Options for saving a project.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Also render annotated copies of every image into `Altered Images`.
    pub save_altered: bool,
}

/// One entry that could not be fully saved.
#[derive(Debug)]
pub struct EntryFailure {
    /// The entry's source path.
    pub path: PathBuf,
    /// What went wrong.
    pub error: ProjectError,
}

/// Result of a save: per-entry failures never abort the remaining entries,
/// they are collected here instead.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    /// Entries that failed to copy or render, in encounter order.
    pub failures: Vec<EntryFailure>,
}

impl SaveOutcome {
    /// Whether every entry was saved cleanly.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A project restored from disk.
#[derive(Debug)]
pub struct LoadedProject {
    /// The restored collection, replacing any previous one wholesale.
    pub collection: AnnotationCollection,
    /// The analysis settings stored with the project.
    pub settings: AnalysisSettings,
}

/// Save a collection into `directory`.
///
/// Writes the statistics report, copies not-yet-persisted originals into
/// the originals folder (entries already under it are skipped), optionally
/// renders annotated copies, and writes the data file with paths stored
/// relative to the originals folder. Selection state is not persisted.
///
/// Entries whose source image cannot be copied or rendered are reported in
/// the outcome and the save continues; only whole-project failures (the
/// report or the data file itself) abort with an error.
pub fn save_project(
    collection: &mut AnnotationCollection,
    directory: &Path,
    settings: &AnalysisSettings,
    options: SaveOptions,
) -> Result<SaveOutcome, ProjectError> {
    log::info!(
        "saving project with {} entries to {:?}",
        collection.len(),
        directory
    );
    fs::create_dir_all(directory)?;

    let mut outcome = SaveOutcome::default();

    write_report(collection.entries(), &report_path(directory))?;
    copy_originals(collection, directory, &mut outcome)?;
    if options.save_altered {
        render_altered(collection, directory, &mut outcome)?;
    }

    let data = ProjectData::from_collection(collection, settings);
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(directory.join(DATA_FILE), json)?;

    if !outcome.is_complete() {
        log::warn!(
            "project saved with {} per-entry failures",
            outcome.failures.len()
        );
    }
    Ok(outcome)
}

/// Load the project stored in `directory`.
///
/// Records whose source image no longer exists in the originals folder are
/// silently dropped; an empty collection is a valid result. Paths of the
/// surviving entries are rebased onto this project's originals folder, and
/// the first entry (if any) becomes the selection.
pub fn load_project(directory: &Path) -> Result<LoadedProject, ProjectError> {
    let data_path = directory.join(DATA_FILE);
    if !data_path.is_file() {
        return Err(ProjectError::MissingDataFile { path: data_path });
    }

    let json = fs::read_to_string(&data_path)?;
    let data: ProjectData = serde_json::from_str(&json)?;

    if !ProjectData::is_version_readable(&data.version) {
        return Err(ProjectError::VersionMismatch {
            expected: ProjectData::CURRENT_VERSION.to_string(),
            found: data.version,
        });
    }
    if !ProjectData::is_version_compatible(&data.version) {
        log::warn!(
            "project version {} may not be fully compatible with {}",
            data.version,
            ProjectData::CURRENT_VERSION
        );
    }

    let originals = directory.join(ORIGINALS_DIR);
    let record_count = data.images.len();
    let mut entries = Vec::with_capacity(record_count);
    for record in data.images {
        if !originals.join(&record.file).is_file() {
            log::debug!("dropping stale entry {:?}: source image missing", record.file);
            continue;
        }
        entries.push(record.into_entry(&originals));
    }

    let mut collection = AnnotationCollection::new();
    let first = entries.first().map(|entry| entry.path.clone());
    let appended = collection.append(entries);
    for conflict in &appended.conflicts {
        log::warn!("duplicate record in project file: {}", conflict);
    }
    if let Some(path) = first {
        let _ = collection.select(&path);
    }
    collection.take_events();

    log::info!(
        "loaded project from {:?}: {} of {} entries",
        directory,
        collection.len(),
        record_count
    );

    Ok(LoadedProject {
        collection,
        settings: data.settings,
    })
}

/// Path of the statistics report inside `directory`.
pub fn report_path(directory: &Path) -> PathBuf {
    let name = directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    directory.join(format!("{name}.csv"))
}

/// Copy every source image that is not yet under the originals folder.
fn copy_originals(
    collection: &mut AnnotationCollection,
    directory: &Path,
    outcome: &mut SaveOutcome,
) -> Result<(), ProjectError> {
    let originals = directory.join(ORIGINALS_DIR);
    fs::create_dir_all(&originals)?;

    let paths: Vec<PathBuf> = collection.iter().map(|entry| entry.path.clone()).collect();
    for path in paths {
        if path.starts_with(&originals) {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        let destination = originals.join(name);
        match fs::copy(&path, &destination) {
            Ok(_) => {
                // Future saves will find the image under the project.
                let _ = collection.rebase_path(&path, destination);
            }
            Err(error) => {
                log::error!("failed to copy original {:?}: {}", path, error);
                let error = if error.kind() == std::io::ErrorKind::NotFound {
                    ProjectError::MissingOriginal { path: path.clone() }
                } else {
                    ProjectError::Io(error)
                };
                outcome.failures.push(EntryFailure { path, error });
            }
        }
    }
    Ok(())
}

/// Render an annotated copy of every entry into the altered folder.
fn render_altered(
    collection: &AnnotationCollection,
    directory: &Path,
    outcome: &mut SaveOutcome,
) -> Result<(), ProjectError> {
    let altered = directory.join(ALTERED_DIR);
    if altered.is_dir() {
        fs::remove_dir_all(&altered)?;
    }
    fs::create_dir_all(&altered)?;

    for entry in collection.iter() {
        let out_path = altered.join(entry.file_name());
        if let Err(error) = render_annotated(&entry.path, entry, &out_path) {
            log::error!("failed to render {:?}: {}", entry.path, error);
            outcome.failures.push(EntryFailure {
                path: entry.path.clone(),
                error,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FiberContour, FiberSet, Nucleus};
    use crate::store::ImageEntry;

    /// Create `names` as dummy image files under a fresh directory.
    fn source_images(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        let sources = dir.join("sources");
        fs::create_dir_all(&sources).unwrap();
        names
            .iter()
            .map(|name| {
                let path = sources.join(name);
                fs::write(&path, b"not really an image").unwrap();
                path
            })
            .collect()
    }

    fn annotated_entry(path: &Path, seed: u32) -> ImageEntry {
        let mut entry = ImageEntry::new(path);
        entry.nuclei = vec![
            Nucleus::inside(seed as f64 + 0.25, seed as f64 + 0.75),
            Nucleus::outside(seed as f64 * 2.0, 3.5),
        ];
        entry.fibers = FiberSet::with_data(
            vec![FiberContour::new(vec![(0, 0), (seed, 0), (seed, seed)])],
            f64::from(seed) / 10.0,
        );
        entry
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("myproject");
        let paths = source_images(dir.path(), &["a.png", "b.png", "c.png"]);

        let mut collection = AnnotationCollection::new();
        collection.append(paths.iter().enumerate().map(|(i, p)| annotated_entry(p, i as u32 + 1)));
        let original_entries: Vec<ImageEntry> = collection.entries().to_vec();

        let settings = AnalysisSettings::default().with_fiber_threshold(30);
        let outcome =
            save_project(&mut collection, &project, &settings, SaveOptions::default()).unwrap();
        assert!(outcome.is_complete());

        // Layout: data file, report, originals.
        assert!(project.join(DATA_FILE).is_file());
        assert!(project.join("myproject.csv").is_file());
        for name in ["a.png", "b.png", "c.png"] {
            assert!(project.join(ORIGINALS_DIR).join(name).is_file());
        }

        // Entries now point into the project.
        for entry in collection.iter() {
            assert!(entry.path.starts_with(project.join(ORIGINALS_DIR)));
        }

        let loaded = load_project(&project).unwrap();
        assert_eq!(loaded.collection.len(), 3);
        assert_eq!(loaded.settings.fiber_threshold, 30);
        for (loaded_entry, original) in loaded.collection.iter().zip(&original_entries) {
            assert_eq!(loaded_entry.nuclei, original.nuclei);
            assert_eq!(loaded_entry.fibers, original.fibers);
            assert_eq!(
                loaded_entry.path,
                project.join(ORIGINALS_DIR).join(original.file_name())
            );
        }
    }

    #[test]
    fn test_load_drops_stale_entries_silently() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("proj");
        let paths = source_images(dir.path(), &["a.png", "b.png", "c.png"]);

        let mut collection = AnnotationCollection::new();
        collection.append(paths.iter().map(|p| ImageEntry::new(p)));
        save_project(
            &mut collection,
            &project,
            &AnalysisSettings::default(),
            SaveOptions::default(),
        )
        .unwrap();

        fs::remove_file(project.join(ORIGINALS_DIR).join("b.png")).unwrap();

        let loaded = load_project(&project).unwrap();
        assert_eq!(loaded.collection.len(), 2);
        let names: Vec<_> = loaded
            .collection
            .iter()
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, ["a.png", "c.png"]);
    }

    #[test]
    fn test_load_empty_after_filtering_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("proj");
        let paths = source_images(dir.path(), &["a.png"]);

        let mut collection = AnnotationCollection::new();
        collection.append(paths.iter().map(|p| ImageEntry::new(p)));
        save_project(
            &mut collection,
            &project,
            &AnalysisSettings::default(),
            SaveOptions::default(),
        )
        .unwrap();

        fs::remove_file(project.join(ORIGINALS_DIR).join("a.png")).unwrap();

        let loaded = load_project(&project).unwrap();
        assert!(loaded.collection.is_empty());
        assert_eq!(loaded.collection.current_index(), None);
    }

    #[test]
    fn test_missing_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_project(dir.path());
        assert!(matches!(result, Err(ProjectError::MissingDataFile { .. })));
    }

    #[test]
    fn test_missing_source_is_per_entry_failure() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("proj");
        let paths = source_images(dir.path(), &["a.png", "b.png"]);

        let mut collection = AnnotationCollection::new();
        collection.append(paths.iter().map(|p| ImageEntry::new(p)));
        fs::remove_file(&paths[0]).unwrap();

        let outcome = save_project(
            &mut collection,
            &project,
            &AnalysisSettings::default(),
            SaveOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, paths[0]);
        assert!(matches!(
            outcome.failures[0].error,
            ProjectError::MissingOriginal { .. }
        ));
        // The other entry still made it in.
        assert!(project.join(ORIGINALS_DIR).join("b.png").is_file());
        assert!(project.join(DATA_FILE).is_file());
    }

    #[test]
    fn test_save_with_altered_renders() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("proj");

        // A real decodable source this time.
        let sources = dir.path().join("sources");
        fs::create_dir_all(&sources).unwrap();
        let source = sources.join("real.png");
        image::RgbImage::from_pixel(32, 32, image::Rgb([0, 0, 0]))
            .save(&source)
            .unwrap();

        let mut collection = AnnotationCollection::new();
        collection.append(vec![annotated_entry(&source, 4)]);

        let outcome = save_project(
            &mut collection,
            &project,
            &AnalysisSettings::default(),
            SaveOptions { save_altered: true },
        )
        .unwrap();

        assert!(outcome.is_complete());
        assert!(project.join(ALTERED_DIR).join("real.png").is_file());
    }

    #[test]
    fn test_second_save_skips_already_persisted_originals() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("proj");
        let paths = source_images(dir.path(), &["a.png"]);

        let mut collection = AnnotationCollection::new();
        collection.append(paths.iter().map(|p| ImageEntry::new(p)));

        save_project(
            &mut collection,
            &project,
            &AnalysisSettings::default(),
            SaveOptions::default(),
        )
        .unwrap();

        // Delete the external source; the second save must not need it.
        fs::remove_file(&paths[0]).unwrap();
        let outcome = save_project(
            &mut collection,
            &project,
            &AnalysisSettings::default(),
            SaveOptions::default(),
        )
        .unwrap();
        assert!(outcome.is_complete());
    }
}
