//! Outer-boundary tracing of mask regions.
//!
//! Every 8-connected foreground blob contributes one closed contour, traced
//! with Moore-neighbor following and then thinned by collapsing runs of
//! collinear points (only direction changes are kept). Contours come out in
//! raster-scan discovery order.

use super::{Mask, regions::NEIGHBORS_8};
use ndarray::Array2;

/// Trace the outer boundary of every foreground blob as a closed polygon.
///
/// Points are `(row, col)`; a single-pixel blob yields a single-point
/// contour. An all-foreground mask yields one contour spanning the raster
/// border.
pub fn trace_contours(mask: &Mask) -> Vec<Vec<(usize, usize)>> {
    let (height, width) = mask.dim();
    let mut visited = Array2::from_elem((height, width), false);
    let mut contours = Vec::new();
    let mut stack = Vec::new();

    for row in 0..height {
        for col in 0..width {
            if !mask[(row, col)] || visited[(row, col)] {
                continue;
            }

            // (row, col) is the raster-scan first pixel of a fresh blob, so
            // its west neighbor is guaranteed background: a valid trace seed.
            contours.push(simplify(trace_boundary(mask, (row, col))));

            // Flood the whole blob so later scan rows skip it.
            visited[(row, col)] = true;
            stack.push((row, col));
            while let Some((r, c)) = stack.pop() {
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
        }
    }

    contours
}

/// Moore-neighbor boundary following from `start`, whose west neighbor must
/// be background. Returns the boundary walk including revisits of thin
/// sections, like a chain-code trace.
fn trace_boundary(mask: &Mask, start: (usize, usize)) -> Vec<(usize, usize)> {
    let start_backtrack = (start.0 as i64, start.1 as i64 - 1);

    let mut contour = vec![start];
    let Some(first) = next_boundary_pixel(mask, start, start_backtrack) else {
        // Isolated pixel.
        return contour;
    };

    let (mut current, mut backtrack) = first;
    // The walk is periodic; the state reached after the first step is the
    // loop anchor. Stop when it comes around again.
    let limit = 4 * mask.len() + 4;
    for _ in 0..limit {
        if current != start {
            contour.push(current);
        }
        let Some((next, next_backtrack)) = next_boundary_pixel(mask, current, backtrack) else {
            break;
        };
        if (next, next_backtrack) == first {
            break;
        }
        current = next;
        backtrack = next_backtrack;
    }

    contour
}

/// Scan the Moore neighborhood of `current` clockwise, starting just after
/// the backtrack pixel, and return the first foreground pixel together with
/// the new backtrack (the pixel examined immediately before it).
fn next_boundary_pixel(
    mask: &Mask,
    current: (usize, usize),
    backtrack: (i64, i64),
) -> Option<((usize, usize), (i64, i64))> {
    let (height, width) = mask.dim();
    let foreground = |r: i64, c: i64| {
        r >= 0 && c >= 0 && r < height as i64 && c < width as i64 && mask[(r as usize, c as usize)]
    };

    let backtrack_index = NEIGHBORS_8
        .iter()
        .position(|&(dr, dc)| (current.0 as i64 + dr, current.1 as i64 + dc) == backtrack)
        .expect("backtrack is always a Moore neighbor of the current pixel");

    for step in 1..=8 {
        let (dr, dc) = NEIGHBORS_8[(backtrack_index + step) % 8];
        let r = current.0 as i64 + dr;
        let c = current.1 as i64 + dc;
        if foreground(r, c) {
            let (pr, pc) = NEIGHBORS_8[(backtrack_index + step - 1) % 8];
            let new_backtrack = (current.0 as i64 + pr, current.1 as i64 + pc);
            return Some(((r as usize, c as usize), new_backtrack));
        }
    }

    None
}

/// Collapse straight runs: a point is kept only where the step direction
/// changes (or the contour is too short to thin).
fn simplify(points: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let current = points[i];
        let next = points[(i + 1) % n];
        let incoming = (
            current.0 as i64 - prev.0 as i64,
            current.1 as i64 - prev.1 as i64,
        );
        let outgoing = (
            next.0 as i64 - current.0 as i64,
            next.1 as i64 - current.1 as i64,
        );
        if incoming != outgoing {
            out.push(current);
        }
    }

    if out.is_empty() {
        // Degenerate ring of identical steps; keep one representative.
        out.push(points[0]);
    }
    out
}
