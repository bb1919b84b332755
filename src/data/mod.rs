//! Decoded-image and labeled-raster I/O.
//!
//! The analysis pipeline consumes already-decoded 3-channel 8-bit rasters;
//! this module provides the decode step for common image formats and the
//! `.npy` interchange used for labeled nucleus rasters.

mod decode;
mod npy;

pub use decode::{DecodeError, RgbRaster, decode_bytes, decode_path};
pub use npy::{NpyError, read_label_raster, write_label_raster};
