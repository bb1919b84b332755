//! Project persistence: directory layout, data file, report, renders.
//!
//! A saved project is self-contained: the data file references images by
//! file name inside the project's `Original Images` folder, so the whole
//! directory can be moved or copied between machines. Loading filters out
//! records whose source image disappeared and rebases the survivors onto
//! the loading project's folder.

mod altered;
mod codec;
mod data;
mod error;
mod report;

pub use altered::render_annotated;
pub use codec::{
    ALTERED_DIR, DATA_FILE, EntryFailure, LoadedProject, ORIGINALS_DIR, SaveOptions, SaveOutcome,
    load_project, report_path, save_project,
};
pub use data::{ImageRecord, ProjectData};
pub use error::ProjectError;
pub use report::write_report;
