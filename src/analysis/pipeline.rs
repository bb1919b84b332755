//! Whole-image analysis: detection, mask refinement, classification.

use thiserror::Error;

use super::classifier::classify_nuclei;
use super::detector::{DetectError, NucleusDetector, validate_labels};
use super::extractor::{extract_fiber_mask, fiber_contours};
use crate::config::AnalysisSettings;
use crate::constants::SCALE_BAR_CUTOFF;
use crate::data::RgbRaster;
use crate::model::{FiberSet, Nucleus};

/// Errors from the per-image analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The detection oracle failed or returned a mismatched raster.
    #[error("detection failed: {0}")]
    Detect(#[from] DetectError),
}

/// Everything one analysis run produces for an image: the classified
/// nuclei (outside first, then inside) and the fiber outlines with area
/// ratio. Applying this to an entry replaces its previous annotation data
/// wholesale.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// Classified nucleus markers.
    pub nuclei: Vec<Nucleus>,
    /// Fiber outlines and area ratio.
    pub fibers: FiberSet,
}

/// Run the full classification pipeline on one decoded image.
///
/// Each call is independent and touches no shared state, so callers may
/// fan out analysis over many images from an external scheduler.
pub fn analyze(
    raster: &RgbRaster,
    detector: &dyn NucleusDetector,
    settings: &AnalysisSettings,
) -> Result<AnalysisOutput, AnalysisError> {
    let mut working = raster.clone();
    working.suppress_scale_bar(SCALE_BAR_CUTOFF);

    let nuclei_channel = working.channel(settings.nuclei_color);
    let fiber_channel = working.channel(settings.fiber_color);

    let labels = detector.label_nuclei(&nuclei_channel)?;
    validate_labels(&nuclei_channel, &labels)?;

    let fiber = extract_fiber_mask(&fiber_channel, &nuclei_channel, settings);
    let classified = classify_nuclei(&labels, &fiber.mask, &nuclei_channel, settings);
    let contours = fiber_contours(&fiber.mask);

    log::info!(
        "analysis done: {} nuclei, {} fiber regions, area ratio {:.4}",
        classified.len(),
        contours.len(),
        fiber.area_ratio
    );

    Ok(AnalysisOutput {
        nuclei: classified.into_nuclei(),
        fibers: FiberSet::with_data(contours, fiber.area_ratio),
    })
}
