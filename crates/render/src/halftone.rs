//! Halftone dot overlay for raster output.
//!
//! The rendered image is sampled on a square grid. Each cell gets a black
//! dot, multiply-blended at low alpha, whose radius grows with the darkness
//! of the pixel at the cell center. Samples are taken from a copy made
//! before any dot is drawn, so dots never feed back into later cells.

use facet_core::color::luminance_rgb8;
use facet_core::resolve::lerp;
use tiny_skia::{BlendMode, Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Smallest grid cell, in pixels.
pub const MIN_CELL_PX: f64 = 3.0;
/// Cell size range as a fraction of the short image edge.
pub const CELL_RATIO_RANGE: (f64, f64) = (0.006, 0.03);
/// Dots smaller than this radius are not drawn.
pub const MIN_RADIUS_PX: f64 = 0.5;
const DOT_ALPHA: f32 = 0.22;
const RADIUS_GAIN: f64 = 1.4;

/// Grid cell edge for an image of the given size, `dot_size` in [0, 1].
pub fn cell_size(width: u32, height: u32, dot_size: f64) -> f64 {
    let short = width.min(height) as f64;
    let t = dot_size.clamp(0.0, 1.0);
    (short * lerp(CELL_RATIO_RANGE.0, CELL_RATIO_RANGE.1, t)).max(MIN_CELL_PX)
}

/// Dot radius for a cell of edge `cell` whose sample has luminance `lum`.
pub fn dot_radius(cell: f64, lum: f64, strength: f64) -> f64 {
    cell * 0.5 * (1.0 - lum) * strength * RADIUS_GAIN
}

/// Applies the overlay in place. `strength` and `dot_size` are in [0, 1];
/// a strength of 0 leaves the pixmap untouched.
///
/// Returns the number of dots drawn.
pub fn apply_halftone(pixmap: &mut Pixmap, strength: f64, dot_size: f64) -> usize {
    let strength = strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return 0;
    }

    let source = pixmap.clone();
    let (w, h) = (pixmap.width(), pixmap.height());
    let cell = cell_size(w, h, dot_size);

    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(0, 0, 0, (DOT_ALPHA * 255.0).round() as u8));
    paint.blend_mode = BlendMode::Multiply;
    paint.anti_alias = true;

    let mut drawn = 0;
    let mut y = 0.0;
    while y < h as f64 {
        let mut x = 0.0;
        while x < w as f64 {
            let cx = x + cell * 0.5;
            let cy = y + cell * 0.5;
            let sx = (cx as u32).min(w - 1);
            let sy = (cy as u32).min(h - 1);
            if let Some(px) = source.pixel(sx, sy) {
                let c = px.demultiply();
                let lum = luminance_rgb8([c.red(), c.green(), c.blue()]);
                let radius = dot_radius(cell, lum, strength);
                if radius >= MIN_RADIUS_PX {
                    if let Some(dot) = PathBuilder::from_circle(cx as f32, cy as f32, radius as f32) {
                        pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                        drawn += 1;
                    }
                }
            }
            x += cell;
        }
        y += cell;
    }
    log::debug!("halftone: {drawn} dots, cell {cell:.2}px, strength {strength}");
    drawn
}
