//! Per-image statistics derived from classified nuclei and fiber data.

use crate::model::{FiberSet, Nucleus};

/// Summary metrics for one annotated image.
///
/// These values are pure projections of the entry data; recomputing them
/// after any edit yields the same numbers for the same inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStats {
    /// Number of nuclei, regardless of polarity.
    pub total_nuclei: usize,
    /// Number of in-fiber (positive) nuclei.
    pub positive_count: usize,
    /// Positive over total, or `None` when there are no nuclei.
    pub positive_ratio: Option<f64>,
    /// Fiber area as a percentage of the image area.
    pub fiber_area_percent: f64,
}

impl ImageStats {
    /// Compute the statistics for one image's nuclei and fibers.
    pub fn compute(nuclei: &[Nucleus], fibers: &FiberSet) -> Self {
        let total_nuclei = nuclei.len();
        let positive_count = nuclei.iter().filter(|n| n.polarity.is_positive()).count();
        let positive_ratio = if total_nuclei > 0 {
            Some(positive_count as f64 / total_nuclei as f64)
        } else {
            None
        };

        Self {
            total_nuclei,
            positive_count,
            positive_ratio,
            fiber_area_percent: fibers.area_percent(),
        }
    }
}
