//! PNG output for a [`PixelSurface`].
//!
//! Feature-gated behind `png` (default on) so the WASM build can use the
//! rasterizer without pulling in the `image` crate.

use std::path::Path;

use backdrop_core::error::BackdropError;

use crate::pixel::PixelSurface;

/// Writes the surface as an 8-bit RGBA PNG.
///
/// Returns `BackdropError::InvalidDimensions` for an empty surface or one
/// whose sides overflow `u32`, and `BackdropError::Io` on write failure.
pub fn write_png(surface: &PixelSurface, path: &Path) -> Result<(), BackdropError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(BackdropError::InvalidDimensions);
    }
    let w = u32::try_from(surface.width()).map_err(|_| BackdropError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| BackdropError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8())
        .ok_or_else(|| BackdropError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| BackdropError::Io(format!("{}: {e}", path.display())))
}
