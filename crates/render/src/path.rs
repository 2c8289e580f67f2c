//! Component outlines as rasterizable paths.
//!
//! SVG path data is parsed with `kurbo` and converted element by element into
//! a `tiny_skia::Path`. Parsing happens once per component per render.

use std::collections::HashMap;

use facet_core::{Component, EngineError};
use kurbo::{BezPath, PathEl};
use tiny_skia::{Path, PathBuilder};

/// Parses a component's path data into a `tiny_skia::Path`.
///
/// Returns `EngineError::InvalidPath` if the data does not parse or produces
/// an empty path.
pub fn component_path(component: Component) -> Result<Path, EngineError> {
    let invalid = |reason: String| EngineError::InvalidPath {
        component: component.code().to_string(),
        reason,
    };
    let bez = BezPath::from_svg(component.path_data()).map_err(|e| invalid(e.to_string()))?;
    bezpath_to_skia(&bez).ok_or_else(|| invalid("path has no drawable segments".into()))
}

fn bezpath_to_skia(path: &BezPath) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Lazily parsed component paths.
#[derive(Debug, Default)]
pub struct PathCache {
    paths: HashMap<Component, Path>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path for `component`, parsing it on first use.
    pub fn get(&mut self, component: Component) -> Result<&Path, EngineError> {
        if !self.paths.contains_key(&component) {
            let path = component_path(component)?;
            self.paths.insert(component, path);
        }
        self.paths
            .get(&component)
            .ok_or_else(|| EngineError::InvalidPath {
                component: component.code().to_string(),
                reason: "missing from cache".into(),
            })
    }
}
