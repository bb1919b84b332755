//! Binary raster utilities: morphology, connected regions, contour tracing.
//!
//! Everything here operates on `ndarray` rasters indexed `(row, col)`.
//! These are the low-level building blocks of the fiber extractor; none of
//! them know anything about fibers or nuclei.

mod contours;
mod morphology;
mod regions;

use ndarray::Array2;

pub use contours::trace_contours;
pub use morphology::{binarize, close, dilate, erode, invert, open};
pub use regions::{connected_regions, mean_over};

/// Single-channel 8-bit raster.
pub type GrayRaster = Array2<u8>;

/// Boolean raster, `true` = foreground.
pub type Mask = Array2<bool>;

/// Integer-labeled raster: 0 = background, `1..=N` = distinct objects.
pub type LabelRaster = Array2<u32>;

/// Fraction of mask pixels that are foreground, in `[0, 1]`.
///
/// An empty mask yields 0.
pub fn area_ratio(mask: &Mask) -> f64 {
    let total = mask.len();
    if total == 0 {
        return 0.0;
    }
    let foreground = mask.iter().filter(|&&v| v).count();
    foreground as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_ratio_extremes() {
        let all_false = Mask::from_elem((8, 8), false);
        assert_eq!(area_ratio(&all_false), 0.0);

        let all_true = Mask::from_elem((8, 8), true);
        assert_eq!(area_ratio(&all_true), 1.0);
    }

    #[test]
    fn test_area_ratio_in_bounds() {
        let mut mask = Mask::from_elem((4, 4), false);
        mask[(1, 1)] = true;
        mask[(2, 2)] = true;
        let ratio = area_ratio(&mask);
        assert!(ratio > 0.0 && ratio < 1.0);
        assert!((ratio - 2.0 / 16.0).abs() < 1e-12);
    }
}
