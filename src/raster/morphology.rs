//! Morphological cleanup primitives over boolean masks.
//!
//! All operations use a square structuring element. Even-sized kernels
//! anchor at `size / 2`; dilation mirrors the window so that opening and
//! closing stay position-stable.

use super::{GrayRaster, Mask};
use ndarray::Array2;

/// Threshold an 8-bit channel into a mask. Foreground = strictly above
/// `threshold`.
pub fn binarize(channel: &GrayRaster, threshold: u8) -> Mask {
    channel.map(|&v| v > threshold)
}

/// Flip foreground and background.
pub fn invert(mask: &Mask) -> Mask {
    mask.map(|&v| !v)
}

/// Erosion: a pixel survives only if every pixel under the kernel window is
/// foreground. Out-of-bounds pixels do not constrain the window.
pub fn erode(mask: &Mask, size: usize) -> Mask {
    let anchor = (size / 2) as i64;
    let lo = -anchor;
    let hi = size as i64 - 1 - anchor;
    window_op(mask, lo, hi, true)
}

/// Dilation: a pixel becomes foreground if any pixel under the (mirrored)
/// kernel window is foreground.
pub fn dilate(mask: &Mask, size: usize) -> Mask {
    let anchor = (size / 2) as i64;
    let lo = -(size as i64 - 1 - anchor);
    let hi = anchor;
    window_op(mask, lo, hi, false)
}

/// Opening: erosion then dilation. Removes small foreground noise.
pub fn open(mask: &Mask, size: usize) -> Mask {
    dilate(&erode(mask, size), size)
}

/// Closing: dilation then erosion. Fills small background gaps.
pub fn close(mask: &Mask, size: usize) -> Mask {
    erode(&dilate(mask, size), size)
}

/// Shared window scan: `all = true` computes erosion (every in-bounds window
/// pixel must be set), `all = false` computes dilation (any suffices).
fn window_op(mask: &Mask, lo: i64, hi: i64, all: bool) -> Mask {
    let (height, width) = mask.dim();
    let mut out = Array2::from_elem((height, width), all);

    for row in 0..height {
        for col in 0..width {
            let mut value = all;
            'window: for dr in lo..=hi {
                for dc in lo..=hi {
                    let r = row as i64 + dr;
                    let c = col as i64 + dc;
                    if r < 0 || c < 0 || r >= height as i64 || c >= width as i64 {
                        continue;
                    }
                    let set = mask[(r as usize, c as usize)];
                    if all && !set {
                        value = false;
                        break 'window;
                    }
                    if !all && set {
                        value = true;
                        break 'window;
                    }
                }
            }
            out[(row, col)] = value;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&[u8]]) -> Mask {
        let height = rows.len();
        let width = rows[0].len();
        Mask::from_shape_fn((height, width), |(r, c)| rows[r][c] != 0)
    }

    #[test]
    fn test_binarize_is_strictly_above() {
        let channel = GrayRaster::from_shape_fn((1, 3), |(_, c)| [24, 25, 26][c]);
        let mask = binarize(&channel, 25);
        assert!(!mask[(0, 0)]);
        assert!(!mask[(0, 1)]);
        assert!(mask[(0, 2)]);
    }

    #[test]
    fn test_invert() {
        let mask = mask_from(&[&[1, 0], &[0, 1]]);
        let inv = invert(&mask);
        assert!(!inv[(0, 0)]);
        assert!(inv[(0, 1)]);
    }

    #[test]
    fn test_opening_removes_speckle() {
        // A lone pixel disappears under a 2x2 opening.
        let mut rows = vec![vec![0u8; 8]; 8];
        rows[3][3] = 1;
        let refs: Vec<&[u8]> = rows.iter().map(|r| r.as_slice()).collect();
        let mask = mask_from(&refs);
        let opened = open(&mask, 2);
        assert!(opened.iter().all(|&v| !v));
    }

    #[test]
    fn test_opening_keeps_large_blob() {
        // A solid 6x6 block survives a 2x2 opening unchanged.
        let mask = Mask::from_shape_fn((10, 10), |(r, c)| (2..8).contains(&r) && (2..8).contains(&c));
        let opened = open(&mask, 2);
        assert_eq!(opened, mask);
    }

    #[test]
    fn test_closing_fills_gap() {
        // A 1-pixel hole in a solid block is filled by a 2x2 closing.
        let mut mask = Mask::from_elem((10, 10), true);
        mask[(5, 5)] = false;
        let closed = close(&mask, 2);
        assert!(closed[(5, 5)]);
    }

    #[test]
    fn test_open_close_position_stable() {
        // Opening with the 4x4 production kernel must not shift a big blob.
        let mask = Mask::from_shape_fn((20, 20), |(r, c)| (5..15).contains(&r) && (5..15).contains(&c));
        let opened = open(&mask, 4);
        assert_eq!(opened, mask);
        let closed = close(&mask, 4);
        assert_eq!(closed, mask);
    }
}
