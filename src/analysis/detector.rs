//! The nucleus detection oracle.
//!
//! Detection itself (a neural segmentation model) lives outside this crate.
//! The pipeline only depends on this trait, so tests and offline runs can
//! substitute synthetic labelings or precomputed rasters for the real
//! model.

use thiserror::Error;

use crate::raster::{GrayRaster, LabelRaster};

/// Errors surfaced by a detection backend.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The backend failed to produce a labeling.
    #[error("detection backend failure: {0}")]
    Backend(String),

    /// The backend produced a raster whose shape does not match the input.
    #[error("label raster shape {found:?} does not match input shape {expected:?}")]
    ShapeMismatch {
        /// Shape of the input channel.
        expected: (usize, usize),
        /// Shape of the returned label raster.
        found: (usize, usize),
    },
}

impl DetectError {
    /// Create a backend error with a message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// A black-box nucleus detector.
///
/// Input is the 8-bit nuclei stain channel; output is a raster of identical
/// shape where 0 is background and `1..=N` identify distinct nucleus blobs.
pub trait NucleusDetector {
    /// Label every nucleus blob in the channel.
    fn label_nuclei(&self, nuclei_channel: &GrayRaster) -> Result<LabelRaster, DetectError>;
}

/// Adapter turning a plain function into a detector.
///
/// Mostly useful in tests and for wiring up precomputed labelings.
pub struct FnDetector<F>(pub F)
where
    F: Fn(&GrayRaster) -> Result<LabelRaster, DetectError>;

impl<F> NucleusDetector for FnDetector<F>
where
    F: Fn(&GrayRaster) -> Result<LabelRaster, DetectError>,
{
    fn label_nuclei(&self, nuclei_channel: &GrayRaster) -> Result<LabelRaster, DetectError> {
        (self.0)(nuclei_channel)
    }
}

/// Check that a returned labeling matches the input raster's shape.
pub(crate) fn validate_labels(
    input: &GrayRaster,
    labels: &LabelRaster,
) -> Result<(), DetectError> {
    if input.dim() != labels.dim() {
        return Err(DetectError::ShapeMismatch {
            expected: input.dim(),
            found: labels.dim(),
        });
    }
    Ok(())
}
