//! Draw plan shared by the raster and vector renderers.
//!
//! Both renderers walk the same list of [`DrawOp`]s, so alpha, transform and
//! stroke width are computed in exactly one place.

use facet_core::{Component, Composition, Shape, Srgb, Style};
use glam::DVec2;

/// Maps canvas coordinates onto an output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Added after scaling positions.
    pub offset: DVec2,
    pub position_scale: f64,
    pub size_scale: f64,
}

impl Viewport {
    /// Canvas coordinates unchanged.
    pub const IDENTITY: Viewport = Viewport {
        offset: DVec2::ZERO,
        position_scale: 1.0,
        size_scale: 1.0,
    };

    /// Uniform scale that fits a `width` x `height` canvas inside the target,
    /// centered, with the leftover space split evenly on both sides.
    pub fn letterbox(width: u32, height: u32, target_width: u32, target_height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let (tw, th) = (target_width as f64, target_height as f64);
        let scale = (tw / w).min(th / h);
        Self {
            offset: DVec2::new((tw - w * scale) * 0.5, (th - h * scale) * 0.5),
            position_scale: scale,
            size_scale: scale,
        }
    }
}

/// How a single op is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintKind {
    Fill,
    /// Stroke width in component-local units, already divided by the scale.
    Stroke { local_width: f64 },
}

/// One shape, ready to paint.
///
/// The full transform is `translate(translate) · scale(scale) ·
/// translate(-half_view_box, -half_view_box)`, applied to the component path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOp {
    pub component: Component,
    pub color: Srgb,
    pub alpha: f64,
    pub translate: DVec2,
    /// Signed per-axis scale; negative for flipped axes.
    pub scale: DVec2,
    pub half_view_box: f64,
    pub paint: PaintKind,
}

/// Builds the ops for every shape of `composition`, in paint order.
pub fn draw_plan(composition: &Composition, viewport: &Viewport) -> Vec<DrawOp> {
    let shapes = composition.shapes();
    let overlap_alpha = composition.resolved().overlap_alpha;
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let alpha = if overlaps_filled_below(shape, &shapes[..i]) {
                overlap_alpha
            } else {
                1.0
            };
            draw_op(shape, alpha, viewport)
        })
        .collect()
}

fn overlaps_filled_below(shape: &Shape, below: &[Shape]) -> bool {
    below
        .iter()
        .any(|lower| lower.style.is_fill() && lower.overlaps(shape))
}

fn draw_op(shape: &Shape, alpha: f64, viewport: &Viewport) -> DrawOp {
    let view_box = shape.component.view_box();
    let draw_size = shape.size * viewport.size_scale;
    let k = draw_size / view_box;
    let sign = |flip: bool| if flip { -1.0 } else { 1.0 };

    let paint = match shape.style {
        Style::Fill => PaintKind::Fill,
        Style::Stroke(weight) => {
            let width = (weight.min_px() * viewport.size_scale).max(draw_size * weight.ratio());
            PaintKind::Stroke {
                local_width: width / k,
            }
        }
    };

    DrawOp {
        component: shape.component,
        color: shape.color,
        alpha,
        translate: viewport.offset + shape.position * viewport.position_scale,
        scale: DVec2::new(k * sign(shape.flip_x), k * sign(shape.flip_y)),
        half_view_box: view_box * 0.5,
        paint,
    }
}
