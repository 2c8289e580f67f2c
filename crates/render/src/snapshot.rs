//! PNG encoding of rendered pixmaps.
//!
//! Feature-gated behind `png` (default on) so library users that only need
//! SVG output do not pull in the `image` crate.

use std::path::Path;

use facet_core::EngineError;
use tiny_skia::Pixmap;

/// Converts a premultiplied pixmap to straight RGBA bytes.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Writes a pixmap as a PNG file.
///
/// Returns `EngineError::Io` on buffer mismatch or write failure.
pub fn write_png(pixmap: &Pixmap, path: &Path) -> Result<(), EngineError> {
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap_to_rgba(pixmap))
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} png to {}", pixmap.width(), pixmap.height(), path.display());
    Ok(())
}
