//! Annotated-copy rendering: fiber outlines and nucleus markers burned
//! into a copy of the original image.

use std::path::Path;

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::constants::{FIBER_OUTLINE_WIDTH, NUCLEUS_MARKER_RADIUS};
use crate::data::decode_path;
use crate::model::{FiberContour, Polarity};
use crate::store::ImageEntry;

use super::error::ProjectError;

// Marker colors, chosen to stand out on dark fluorescence imagery.
const FIBER_COLOR: (u8, u8, u8) = (255, 0, 0);
const NUCLEUS_IN_COLOR: (u8, u8, u8) = (255, 255, 0);
const NUCLEUS_OUT_COLOR: (u8, u8, u8) = (0, 0, 255);

/// Render `entry`'s annotations onto its source image and save the result.
///
/// The source is read from `source` (usually the project's originals
/// folder) and written to `out_path`; the original file is never touched.
pub fn render_annotated(
    source: &Path,
    entry: &ImageEntry,
    out_path: &Path,
) -> Result<(), ProjectError> {
    let raster = decode_path(source)?;
    let width = raster.width() as u32;
    let height = raster.height() as u32;

    let size = tiny_skia::IntSize::from_wh(width, height)
        .ok_or_else(|| ProjectError::render("source image has zero size"))?;
    let mut pixmap = Pixmap::from_vec(raster.to_rgba_bytes(), size)
        .ok_or_else(|| ProjectError::render("pixel buffer does not match image size"))?;

    draw_fibers(&mut pixmap, &entry.fibers.contours);
    draw_nuclei(&mut pixmap, entry);

    let rendered = image::RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| ProjectError::render("rendered buffer does not match image size"))?;
    // Convert down to RGB so formats without alpha (JPEG) still encode.
    image::DynamicImage::ImageRgba8(rendered)
        .to_rgb8()
        .save(out_path)
        .map_err(|e| ProjectError::render(format!("failed to save {:?}: {}", out_path, e)))?;

    log::debug!("rendered annotated copy {:?}", out_path);
    Ok(())
}

fn draw_fibers(pixmap: &mut Pixmap, contours: &[FiberContour]) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(FIBER_COLOR.0, FIBER_COLOR.1, FIBER_COLOR.2, 255);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: FIBER_OUTLINE_WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };

    for contour in contours {
        let points = contour.points();
        let Some(&(x0, y0)) = points.first() else {
            continue;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(x0 as f32 + 0.5, y0 as f32 + 0.5);
        for &(x, y) in &points[1..] {
            pb.line_to(x as f32 + 0.5, y as f32 + 0.5);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

fn draw_nuclei(pixmap: &mut Pixmap, entry: &ImageEntry) {
    for nucleus in &entry.nuclei {
        let (r, g, b) = match nucleus.polarity {
            Polarity::In => NUCLEUS_IN_COLOR,
            Polarity::Out => NUCLEUS_OUT_COLOR,
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;

        let mut pb = PathBuilder::new();
        pb.push_circle(
            nucleus.x as f32,
            nucleus.y as f32,
            NUCLEUS_MARKER_RADIUS,
        );
        if let Some(path) = pb.finish() {
            pixmap.fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FiberSet, Nucleus};

    #[test]
    fn test_render_writes_annotated_copy() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        let out = dir.path().join("annotated.png");

        image::RgbImage::from_pixel(64, 48, image::Rgb([0, 0, 0]))
            .save(&source)
            .unwrap();

        let mut entry = ImageEntry::new(&source);
        entry.nuclei.push(Nucleus::inside(32.0, 24.0));
        entry.nuclei.push(Nucleus::outside(10.0, 10.0));
        entry.fibers = FiberSet::with_data(
            vec![FiberContour::new(vec![(20, 15), (44, 15), (44, 35), (20, 35)])],
            0.2,
        );

        render_annotated(&source, &entry, &out).unwrap();

        let rendered = image::open(&out).unwrap().to_rgb8();
        assert_eq!(rendered.dimensions(), (64, 48));
        // The in-fiber nucleus marker center must be yellow-ish.
        let center = rendered.get_pixel(32, 24);
        assert!(center[0] > 200 && center[1] > 200 && center[2] < 60);
        // The out-of-fiber marker must be blue-ish.
        let out_marker = rendered.get_pixel(10, 10);
        assert!(out_marker[2] > 200 && out_marker[0] < 60);
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let entry = ImageEntry::new("/nonexistent/source.png");
        let result = render_annotated(
            Path::new("/nonexistent/source.png"),
            &entry,
            &dir.path().join("out.png"),
        );
        assert!(matches!(result, Err(ProjectError::Decode(_))));
    }
}
