//! PNG snapshot export.
//!
//! A pure read of a backend's pixel buffer, encoded for download. One-way
//! and lossy; there is no corresponding import path.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError};
use std::fmt;

/// A backend that can hand out its rendered pixels.
pub trait PixelSource {
    /// `(width, height)` of the surface in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// The surface contents as tightly-packed RGBA8, row-major.
    fn rgba_pixels(&self) -> Vec<u8>;
}

#[derive(Debug)]
pub enum ExportError {
    /// The pixel buffer does not match the reported dimensions.
    BufferMismatch { expected: usize, actual: usize },
    Encode(ImageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::BufferMismatch { expected, actual } => write!(
                f,
                "pixel buffer size mismatch: expected {expected} bytes, got {actual}"
            ),
            ExportError::Encode(err) => write!(f, "png encoding failed: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Encode(err) => Some(err),
            ExportError::BufferMismatch { .. } => None,
        }
    }
}

/// Encode the surface's current pixels as PNG bytes.
pub fn export_snapshot(source: &dyn PixelSource) -> Result<Vec<u8>, ExportError> {
    let (width, height) = source.dimensions();
    let pixels = source.rgba_pixels();

    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(ExportError::BufferMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(ExportError::Encode)?;
    log::debug!("exported {width}x{height} snapshot, {} bytes", out.len());
    Ok(out)
}
