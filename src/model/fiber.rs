//! Fiber region outlines and per-image fiber data.

use serde::{Deserialize, Serialize};

/// Closed polygon outline of one fiber region, in image pixel coordinates.
///
/// Points are `(x, y)` with the last point implicitly connected back to the
/// first. Contours are produced wholesale by the fiber extractor and never
/// edited incrementally; re-analysis replaces them entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiberContour(Vec<(u32, u32)>);

impl FiberContour {
    /// Wrap a traced boundary as a contour.
    pub fn new(points: Vec<(u32, u32)>) -> Self {
        Self(points)
    }

    /// The boundary points in trace order.
    pub fn points(&self) -> &[(u32, u32)] {
        &self.0
    }

    /// Number of boundary points.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the contour has no points.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All fiber data attached to one image: outlines plus the fiber area ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiberSet {
    /// Outlines of every detected fiber region.
    pub contours: Vec<FiberContour>,
    /// Fraction of image pixels classified as fiber, in `[0, 1]`.
    pub area_ratio: f64,
}

impl FiberSet {
    /// Create an empty fiber set (no regions, zero area).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fiber set from traced contours and an area ratio.
    pub fn with_data(contours: Vec<FiberContour>, area_ratio: f64) -> Self {
        Self {
            contours,
            area_ratio,
        }
    }

    /// Number of fiber regions.
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Whether there are no fiber regions.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Fiber area as a percentage of the image area.
    pub fn area_percent(&self) -> f64 {
        self.area_ratio * 100.0
    }
}
