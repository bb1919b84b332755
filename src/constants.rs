//! Global constants for the mfat crate.

/// Default gray level above which a fiber-channel pixel is fiber candidate.
pub const DEFAULT_FIBER_THRESHOLD: u8 = 25;

/// Default mean gray level below which a detected nucleus is discarded, and
/// above which an enclosed hole is re-filled into the fiber mask.
pub const DEFAULT_BRIGHTNESS_THRESHOLD: u8 = 50;

/// Default fraction of a nucleus's pixels that must fall inside the fiber
/// mask for the nucleus to be classified as in-fiber.
pub const DEFAULT_FIBER_OVERLAP_FRACTION: f64 = 0.4;

/// Side length of the square structuring element used for mask opening
/// and closing.
pub const MORPH_KERNEL_SIZE: usize = 4;

/// Pixels brighter than this in all three channels are treated as scale-bar
/// overlay and zeroed before analysis.
pub const SCALE_BAR_CUTOFF: u8 = 50;

/// Radius of the nucleus disc markers in altered-image renders.
pub const NUCLEUS_MARKER_RADIUS: f32 = 6.0;

/// Stroke width of fiber outlines in altered-image renders.
pub const FIBER_OUTLINE_WIDTH: f32 = 4.0;
