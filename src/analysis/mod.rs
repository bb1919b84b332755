//! The post-detection classification pipeline.
//!
//! Order of operations for one image: the external detection model labels
//! nuclei blobs, the extractor refines the fiber channel into a boolean
//! mask, the classifier assigns each labeled nucleus an in/out polarity,
//! and the statistics module derives the per-image counts and ratios shown
//! in the annotation table.

mod classifier;
mod detector;
mod extractor;
mod pipeline;
mod stats;

pub use classifier::{ClassifiedNuclei, classify_nuclei};
pub use detector::{DetectError, FnDetector, NucleusDetector};
pub use extractor::{FiberMask, extract_fiber_mask, fiber_contours};
pub use pipeline::{AnalysisError, AnalysisOutput, analyze};
pub use stats::ImageStats;
