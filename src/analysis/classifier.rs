//! In/out-of-fiber classification of detected nuclei.

use crate::config::AnalysisSettings;
use crate::model::Nucleus;
use crate::raster::{GrayRaster, LabelRaster, Mask};

/// Classifier output: centroids of the accepted nuclei, split by polarity.
///
/// Within each list the nuclei appear in ascending label order; the order
/// carries no meaning beyond display stability.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedNuclei {
    /// Nuclei outside every fiber region.
    pub outside: Vec<Nucleus>,
    /// Nuclei enclosed by fiber tissue.
    pub inside: Vec<Nucleus>,
}

impl ClassifiedNuclei {
    /// Total number of accepted nuclei.
    pub fn len(&self) -> usize {
        self.outside.len() + self.inside.len()
    }

    /// Whether no nucleus was accepted.
    pub fn is_empty(&self) -> bool {
        self.outside.is_empty() && self.inside.is_empty()
    }

    /// Flatten into a single list, outside nuclei first.
    pub fn into_nuclei(self) -> Vec<Nucleus> {
        let mut nuclei = self.outside;
        nuclei.extend(self.inside);
        nuclei
    }
}

/// Classify every labeled nucleus as inside or outside the fiber mask.
///
/// For each label id the centroid is the exact arithmetic mean of its pixel
/// coordinates. Nuclei whose mean brightness in the nuclei channel falls
/// below `settings.brightness_threshold` are dropped as low-confidence
/// detections. The remaining ones are in-fiber when the fraction of their
/// pixels covered by `mask` reaches `settings.fiber_overlap_fraction`
/// (inclusive).
pub fn classify_nuclei(
    labels: &LabelRaster,
    mask: &Mask,
    nuclei_channel: &GrayRaster,
    settings: &AnalysisSettings,
) -> ClassifiedNuclei {
    let label_count = labels.iter().copied().max().unwrap_or(0) as usize;
    if label_count == 0 {
        return ClassifiedNuclei::default();
    }

    // One pass over the raster, bucketing pixels by label id.
    let mut pixels: Vec<Vec<(usize, usize)>> = vec![Vec::new(); label_count + 1];
    for (pos, &id) in labels.indexed_iter() {
        if id > 0 {
            pixels[id as usize].push(pos);
        }
    }

    let brightness_threshold = f64::from(settings.brightness_threshold);
    let mut result = ClassifiedNuclei::default();
    let mut discarded = 0usize;

    for nucleus_pixels in pixels.iter().skip(1) {
        if nucleus_pixels.is_empty() {
            continue;
        }

        let count = nucleus_pixels.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut brightness: u64 = 0;
        let mut covered = 0usize;
        for &(row, col) in nucleus_pixels {
            sum_x += col as f64;
            sum_y += row as f64;
            brightness += u64::from(nuclei_channel[(row, col)]);
            if mask[(row, col)] {
                covered += 1;
            }
        }

        if (brightness as f64) / count < brightness_threshold {
            discarded += 1;
            continue;
        }

        let centroid_x = sum_x / count;
        let centroid_y = sum_y / count;
        let inside_fraction = covered as f64 / count;
        if inside_fraction >= settings.fiber_overlap_fraction {
            result.inside.push(Nucleus::inside(centroid_x, centroid_y));
        } else {
            result.outside.push(Nucleus::outside(centroid_x, centroid_y));
        }
    }

    log::debug!(
        "classified {} nuclei ({} in, {} out, {} discarded)",
        result.len(),
        result.inside.len(),
        result.outside.len(),
        discarded
    );

    result
}
