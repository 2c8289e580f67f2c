//! Anti-aliased raster rendering with tiny-skia.

use facet_core::{Composition, EngineError, Srgb};
use tiny_skia::{Color, FillRule, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::halftone::apply_halftone;
use crate::path::PathCache;
use crate::plan::{draw_plan, DrawOp, PaintKind, Viewport};

/// Default export resolution.
pub const EXPORT_WIDTH: u32 = 8000;
pub const EXPORT_HEIGHT: u32 = 4500;

/// Output surface settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Target size in pixels; `None` renders at the canvas size. A target
    /// with a different aspect ratio is letterboxed, and shapes are clipped
    /// to the canvas area.
    pub size: Option<(u32, u32)>,
    /// Apply the halftone overlay when the composition's strength is non-zero.
    pub halftone: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            size: None,
            halftone: true,
        }
    }
}

impl RasterOptions {
    /// Canvas-size render.
    pub fn native() -> Self {
        Self::default()
    }

    /// Render scaled into a `width` x `height` image.
    pub fn export(width: u32, height: u32) -> Self {
        Self {
            size: Some((width, height)),
            ..Self::default()
        }
    }
}

/// Renders `composition` to a new pixmap.
///
/// Returns `Ok(None)` if no surface of the requested size can be allocated.
///
/// # Errors
///
/// Returns `EngineError::InvalidPath` if a component outline fails to parse.
pub fn render(
    composition: &Composition,
    options: &RasterOptions,
) -> Result<Option<Pixmap>, EngineError> {
    let (cw, ch) = (composition.width(), composition.height());
    let (width, height) = options.size.unwrap_or((cw, ch));
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        log::warn!("cannot allocate a {width}x{height} surface; skipping render");
        return Ok(None);
    };

    let viewport = Viewport::letterbox(cw, ch, width, height);
    pixmap.fill(color(composition.scheme().background(), 1.0));

    let clip = canvas_clip(&viewport, cw, ch, width, height);

    let mut paths = PathCache::new();
    for op in draw_plan(composition, &viewport) {
        paint_op(&mut pixmap, &mut paths, &op, clip.as_ref())?;
    }

    if options.halftone {
        let resolved = composition.resolved();
        apply_halftone(&mut pixmap, resolved.halftone_strength, resolved.halftone_dot_size);
    }
    log::debug!(
        "rendered {} shapes at {width}x{height}",
        composition.shapes().len()
    );
    Ok(Some(pixmap))
}

/// Renders at the default export resolution, 8000 x 4500.
pub fn render_export(composition: &Composition) -> Result<Option<Pixmap>, EngineError> {
    render(composition, &RasterOptions::export(EXPORT_WIDTH, EXPORT_HEIGHT))
}

/// Mask limiting paint to the scaled canvas, or `None` when the canvas
/// fills the whole surface.
fn canvas_clip(viewport: &Viewport, cw: u32, ch: u32, width: u32, height: u32) -> Option<Mask> {
    if viewport.offset == glam::DVec2::ZERO {
        return None;
    }
    let rect = Rect::from_xywh(
        viewport.offset.x as f32,
        viewport.offset.y as f32,
        (cw as f64 * viewport.position_scale) as f32,
        (ch as f64 * viewport.position_scale) as f32,
    )?;
    let mut mask = Mask::new(width, height)?;
    mask.fill_path(
        &PathBuilder::from_rect(rect),
        FillRule::Winding,
        false,
        Transform::identity(),
    );
    Some(mask)
}

fn paint_op(
    pixmap: &mut Pixmap,
    paths: &mut PathCache,
    op: &DrawOp,
    clip: Option<&Mask>,
) -> Result<(), EngineError> {
    let path = paths.get(op.component)?;
    let transform = Transform::from_translate(op.translate.x as f32, op.translate.y as f32)
        .pre_scale(op.scale.x as f32, op.scale.y as f32)
        .pre_translate(-op.half_view_box as f32, -op.half_view_box as f32);

    let mut paint = Paint::default();
    paint.set_color(color(op.color, op.alpha));
    paint.anti_alias = true;

    match op.paint {
        PaintKind::Fill => {
            pixmap.fill_path(path, &paint, FillRule::Winding, transform, clip);
        }
        PaintKind::Stroke { local_width } => {
            let stroke = Stroke {
                width: local_width as f32,
                ..Stroke::default()
            };
            pixmap.stroke_path(path, &paint, &stroke, transform, clip);
        }
    }
    Ok(())
}

fn color(c: Srgb, alpha: f64) -> Color {
    let [r, g, b] = c.to_rgb8();
    Color::from_rgba8(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{generate, Params};

    fn rgb_at(p: &Pixmap, x: u32, y: u32) -> [u8; 3] {
        let c = p.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue()]
    }

    fn busy() -> Params {
        Params {
            amount: 80.0,
            outline: 30.0,
            blend: 50.0,
            ..Params::default()
        }
    }

    #[test]
    fn native_render_matches_canvas_size() {
        let c = generate(1, &Params::default(), 160, 90).unwrap();
        let p = render(&c, &RasterOptions::native()).unwrap().unwrap();
        assert_eq!((p.width(), p.height()), (160, 90));
    }

    #[test]
    fn same_composition_same_pixels() {
        let c = generate(17, &busy(), 160, 90).unwrap();
        let a = render(&c, &RasterOptions::native()).unwrap().unwrap();
        let b = render(&c, &RasterOptions::native()).unwrap().unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn regenerated_composition_same_pixels() {
        let a = generate(17, &busy(), 160, 90).unwrap();
        let b = generate(17, &busy(), 160, 90).unwrap();
        let pa = render(&a, &RasterOptions::native()).unwrap().unwrap();
        let pb = render(&b, &RasterOptions::native()).unwrap().unwrap();
        assert_eq!(pa.data(), pb.data());
    }

    #[test]
    fn shapes_paint_over_background() {
        let c = generate(17, &busy(), 160, 90).unwrap();
        let p = render(&c, &RasterOptions::native()).unwrap().unwrap();
        let bg = c.scheme().background().to_rgb8();
        let painted = (0..90)
            .flat_map(|y| (0..160).map(move |x| (x, y)))
            .filter(|&(x, y)| rgb_at(&p, x, y) != bg)
            .count();
        assert!(painted > 160 * 90 / 10, "only {painted} painted pixels");
    }

    #[test]
    fn letterboxed_export_keeps_bars_background() {
        let c = generate(17, &busy(), 160, 90).unwrap();
        let p = render(&c, &RasterOptions::export(160, 160)).unwrap().unwrap();
        assert_eq!((p.width(), p.height()), (160, 160));
        let bg = c.scheme().background().to_rgb8();
        // Canvas occupies rows 35..125; shapes are clipped out of the bars.
        for x in 0..160 {
            assert_eq!(rgb_at(&p, x, 0), bg);
            assert_eq!(rgb_at(&p, x, 159), bg);
        }
    }

    #[test]
    fn unallocatable_surface_is_none() {
        let c = generate(1, &Params::default(), 160, 90).unwrap();
        assert!(render(&c, &RasterOptions::export(0, 100)).unwrap().is_none());
    }

    #[test]
    fn halftone_changes_pixels_only_when_enabled() {
        let params = Params {
            halftone_strength: 80.0,
            ..busy()
        };
        let c = generate(17, &params, 160, 90).unwrap();
        let with = render(&c, &RasterOptions::native()).unwrap().unwrap();
        let without = render(
            &c,
            &RasterOptions {
                halftone: false,
                ..RasterOptions::native()
            },
        )
        .unwrap()
        .unwrap();
        assert_ne!(with.data(), without.data());

        let plain = generate(17, &busy(), 160, 90).unwrap();
        let plain = render(&plain, &RasterOptions::native()).unwrap().unwrap();
        assert_eq!(plain.data(), without.data());
    }

    #[test]
    fn output_is_opaque() {
        let c = generate(3, &busy(), 120, 80).unwrap();
        let p = render(&c, &RasterOptions::native()).unwrap().unwrap();
        assert!(p.pixels().iter().all(|px| px.alpha() == 255));
    }
}
