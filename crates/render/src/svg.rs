//! Standalone SVG document output at the native canvas size.

use std::fmt::Write;

use facet_core::{Composition, EngineError};

use crate::plan::{draw_plan, PaintKind, Viewport};

/// Serializes `composition` as an SVG document.
///
/// Every shape becomes one `<path>` carrying the component's path data and
/// an explicit transform, so the file renders identically to the raster
/// output (halftone excepted).
pub fn to_svg(composition: &Composition) -> Result<String, EngineError> {
    let (w, h) = (composition.width(), composition.height());
    let mut out = String::new();
    write_document(&mut out, composition, w, h).map_err(|e| EngineError::Io(e.to_string()))?;
    Ok(out)
}

fn write_document(
    out: &mut String,
    composition: &Composition,
    w: u32,
    h: u32,
) -> std::fmt::Result {
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    write!(
        out,
        r#"<rect width="{w}" height="{h}" fill="{}" />"#,
        composition.scheme().background().to_hex()
    )?;

    for op in draw_plan(composition, &Viewport::IDENTITY) {
        let transform = format!(
            "translate({} {}) scale({} {}) translate({} {})",
            op.translate.x, op.translate.y, op.scale.x, op.scale.y, -op.half_view_box, -op.half_view_box
        );
        let rgba = op.color.to_css_rgba(op.alpha);
        let d = op.component.path_data();
        match op.paint {
            PaintKind::Fill => write!(
                out,
                r#"<path d="{d}" fill="{rgba}" transform="{transform}" />"#
            )?,
            PaintKind::Stroke { local_width } => write!(
                out,
                r#"<path d="{d}" fill="none" stroke="{rgba}" stroke-width="{local_width}" transform="{transform}" />"#
            )?,
        }
    }
    out.push_str("</svg>");
    Ok(())
}
