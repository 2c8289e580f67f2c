#![deny(unsafe_code)]
//! Rendering for facet compositions.
//!
//! Raster output goes through tiny-skia (with an optional halftone overlay),
//! vector output is a hand-assembled SVG document. Both consume the same
//! [`plan::DrawOp`] list so they agree on alpha, transforms and stroke widths.

pub mod halftone;
pub mod path;
pub mod plan;
pub mod raster;
pub mod svg;

#[cfg(feature = "png")]
pub mod snapshot;

pub use raster::{render, render_export, RasterOptions, EXPORT_HEIGHT, EXPORT_WIDTH};
pub use svg::to_svg;
pub use tiny_skia::Pixmap;
