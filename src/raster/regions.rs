//! Connected-region extraction over boolean masks.

use super::{GrayRaster, Mask};
use ndarray::Array2;

/// 8-connected neighborhood offsets.
pub(crate) const NEIGHBORS_8: [(i64, i64); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Collect every 8-connected foreground region of `mask`.
///
/// Regions are returned in raster-scan discovery order (the order their
/// top-most, left-most pixel is reached), each as a list of `(row, col)`
/// pixels.
pub fn connected_regions(mask: &Mask) -> Vec<Vec<(usize, usize)>> {
    let (height, width) = mask.dim();
    let mut visited = Array2::from_elem((height, width), false);
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for row in 0..height {
        for col in 0..width {
            if !mask[(row, col)] || visited[(row, col)] {
                continue;
            }

            let mut pixels = Vec::new();
            visited[(row, col)] = true;
            stack.push((row, col));

            while let Some((r, c)) = stack.pop() {
                pixels.push((r, c));
                for (dr, dc) in NEIGHBORS_8 {
                    let nr = r as i64 + dr;
                    let nc = c as i64 + dc;
                    if nr < 0 || nc < 0 || nr >= height as i64 || nc >= width as i64 {
                        continue;
                    }
                    let pos = (nr as usize, nc as usize);
                    if mask[pos] && !visited[pos] {
                        visited[pos] = true;
                        stack.push(pos);
                    }
                }
            }

            regions.push(pixels);
        }
    }

    regions
}

/// Arithmetic mean of `channel` over the given pixels. Empty input yields 0.
pub fn mean_over(channel: &GrayRaster, pixels: &[(usize, usize)]) -> f64 {
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: u64 = pixels.iter().map(|&pos| u64::from(channel[pos])).sum();
    sum as f64 / pixels.len() as f64
}
