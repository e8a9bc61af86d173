//! PNG export of a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so WASM builds can depend on this
//! crate without pulling in the `image` crate.

use huahua_core::error::SketchError;
use std::path::Path;

use crate::raster::RasterSurface;

/// Renders the surface and writes it as a straight-alpha RGBA PNG.
///
/// Returns `SketchError::InvalidDimensions` if the surface dimensions overflow
/// `u32`, or `SketchError::Io` on write failure.
pub fn write_png(surface: &mut RasterSurface, path: &Path) -> Result<(), SketchError> {
    let w = u32::try_from(surface.width()).map_err(|_| SketchError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| SketchError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.pixels().to_vec())
        .ok_or_else(|| SketchError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SketchError::Io(e.to_string()))
}
