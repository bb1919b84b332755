//! Fiber region extraction from the fiber stain channel.

use crate::config::AnalysisSettings;
use crate::constants::MORPH_KERNEL_SIZE;
use crate::model::FiberContour;
use crate::raster::{
    self, GrayRaster, Mask, area_ratio, binarize, close, connected_regions, invert, mean_over, open,
};

/// A refined fiber mask together with its area ratio.
#[derive(Debug, Clone)]
pub struct FiberMask {
    /// Boolean raster, `true` = fiber.
    pub mask: Mask,
    /// Fraction of image pixels classified as fiber, in `[0, 1]`.
    pub area_ratio: f64,
}

/// Refine the raw fiber channel into a clean boolean fiber mask.
///
/// The channel is binarized at `settings.fiber_threshold`, cleaned with a
/// morphological opening and closing (4x4 square kernel), and then holes
/// whose mean nuclei-channel brightness exceeds
/// `settings.brightness_threshold` are re-filled into the fiber region:
/// a bright hole is nucleus-containing fiber interior, not background.
pub fn extract_fiber_mask(
    fiber_channel: &GrayRaster,
    nuclei_channel: &GrayRaster,
    settings: &AnalysisSettings,
) -> FiberMask {
    let mask = binarize(fiber_channel, settings.fiber_threshold);
    let mask = open(&mask, MORPH_KERNEL_SIZE);
    let mut mask = close(&mask, MORPH_KERNEL_SIZE);

    // Expose background regions as blobs and re-fill the bright ones.
    let holes = invert(&mask);
    let brightness_threshold = f64::from(settings.brightness_threshold);
    for region in connected_regions(&holes) {
        if mean_over(nuclei_channel, &region) > brightness_threshold {
            for pos in region {
                mask[pos] = true;
            }
        }
    }

    let ratio = area_ratio(&mask);
    log::debug!(
        "extracted fiber mask: {}x{} px, area ratio {:.4}",
        mask.nrows(),
        mask.ncols(),
        ratio
    );

    FiberMask {
        mask,
        area_ratio: ratio,
    }
}

/// Trace the outlines of every fiber region in `mask`.
///
/// Contour points are `(x, y)` image coordinates; ordering follows blob
/// discovery order in a raster scan.
pub fn fiber_contours(mask: &Mask) -> Vec<FiberContour> {
    raster::trace_contours(mask)
        .into_iter()
        .map(|points| {
            FiberContour::new(
                points
                    .into_iter()
                    .map(|(row, col)| (col as u32, row as u32))
                    .collect(),
            )
        })
        .collect()
}
