//! Image decoding to the pipeline's canonical raster layout.
//!
//! Any readable image becomes a 3-channel 8-bit raster: alpha is stripped,
//! 16-bit depths are rescaled, and grayscale sources land in the blue
//! channel (the usual nuclei-stain position) with the other channels empty
//! so that single-stain images survive the scale-bar suppression pass.

use std::path::Path;

use image::DynamicImage;
use ndarray::Array3;
use thiserror::Error;

use crate::config::ChannelColor;
use crate::raster::GrayRaster;

/// Errors from the image decode step.
///
/// When decoding fails, the caller must skip analysis for that image; the
/// entry itself stays in the collection.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded 3-channel 8-bit image, indexed `(row, col, channel)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbRaster {
    data: Array3<u8>,
}

impl RgbRaster {
    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Extract one channel as an owned single-channel raster.
    pub fn channel(&self, color: ChannelColor) -> GrayRaster {
        let (height, width, _) = self.data.dim();
        let index = color.index();
        GrayRaster::from_shape_fn((height, width), |(r, c)| self.data[(r, c, index)])
    }

    /// Zero every pixel that is brighter than `cutoff` in all three
    /// channels. Scale bars and similar white overlays would otherwise
    /// read as fiber and nuclei signal at once.
    pub fn suppress_scale_bar(&mut self, cutoff: u8) {
        let (height, width, _) = self.data.dim();
        for r in 0..height {
            for c in 0..width {
                let bright = (0..3).all(|ch| self.data[(r, c, ch)] > cutoff);
                if bright {
                    for ch in 0..3 {
                        self.data[(r, c, ch)] = 0;
                    }
                }
            }
        }
    }

    /// Interleaved RGBA bytes (alpha fully opaque), row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let (height, width, _) = self.data.dim();
        let mut bytes = Vec::with_capacity(height * width * 4);
        for r in 0..height {
            for c in 0..width {
                bytes.push(self.data[(r, c, 0)]);
                bytes.push(self.data[(r, c, 1)]);
                bytes.push(self.data[(r, c, 2)]);
                bytes.push(255);
            }
        }
        bytes
    }

    #[cfg(test)]
    pub(crate) fn from_array(data: Array3<u8>) -> Self {
        assert_eq!(data.dim().2, 3);
        Self { data }
    }
}

/// Decode an image file into the canonical raster layout.
pub fn decode_path(path: &Path) -> Result<RgbRaster, DecodeError> {
    let bytes = std::fs::read(path)?;
    let raster = decode_bytes(&bytes)?;
    log::trace!(
        "decoded {:?}: {}x{} px",
        path,
        raster.width(),
        raster.height()
    );
    Ok(raster)
}

/// Decode an encoded image byte buffer into the canonical raster layout.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbRaster, DecodeError> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(normalize(decoded))
}

/// Flatten any decoded layout to `(height, width, 3)` of `u8`.
fn normalize(decoded: DynamicImage) -> RgbRaster {
    let grayscale = matches!(
        decoded,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
    );

    let data = if grayscale {
        // Single-stain image: keep the signal in the blue channel only.
        let gray = decoded.to_luma8();
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        Array3::from_shape_fn((height, width, 3), |(r, c, ch)| {
            if ch == ChannelColor::Blue.index() {
                gray.get_pixel(c as u32, r as u32)[0]
            } else {
                0
            }
        })
    } else {
        let rgb = decoded.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        Array3::from_shape_fn((height, width, 3), |(r, c, ch)| {
            rgb.get_pixel(c as u32, r as u32)[ch]
        })
    };

    RgbRaster { data }
}
