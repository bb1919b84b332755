//! `.npy` interchange for labeled nucleus rasters.
//!
//! The detection model runs out of process; its labelings travel as NumPy
//! arrays. Label 0 is background, `1..=N` are distinct nuclei.

use std::fs::File;
use std::path::Path;

use ndarray_npy::{ReadNpyError, ReadNpyExt, WriteNpyError, WriteNpyExt};
use thiserror::Error;

use crate::raster::LabelRaster;

/// Errors reading or writing labeled rasters.
#[derive(Error, Debug)]
pub enum NpyError {
    /// Opening or creating the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable `.npy` array of the expected type.
    #[error("failed to read npy array: {0}")]
    Read(#[from] ReadNpyError),

    /// Writing the array failed.
    #[error("failed to write npy array: {0}")]
    Write(#[from] WriteNpyError),
}

/// Read a labeled raster from a `.npy` file.
pub fn read_label_raster(path: &Path) -> Result<LabelRaster, NpyError> {
    let file = File::open(path)?;
    let labels = LabelRaster::read_npy(file)?;
    log::debug!("read label raster {:?}: {:?}", path, labels.dim());
    Ok(labels)
}

/// Write a labeled raster to a `.npy` file.
pub fn write_label_raster(path: &Path, labels: &LabelRaster) -> Result<(), NpyError> {
    let file = File::create(path)?;
    labels.write_npy(file)?;
    Ok(())
}
