//! A placed tile: where it sits, how big it is, and how it is painted.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::component::Component;

/// Line weight for stroked shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeWeight {
    #[default]
    Thin,
    Thick,
}

impl StrokeWeight {
    /// Stroke width as a fraction of the shape's drawn size.
    pub fn ratio(self) -> f64 {
        match self {
            StrokeWeight::Thin => 0.0037,
            StrokeWeight::Thick => 0.0148,
        }
    }

    /// Smallest stroke width in output pixels at unit scale.
    pub fn min_px(self) -> f64 {
        match self {
            StrokeWeight::Thin => 1.0,
            StrokeWeight::Thick => 2.0,
        }
    }
}

/// Paint mode for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Fill,
    Stroke(StrokeWeight),
}

impl Style {
    pub fn is_fill(self) -> bool {
        matches!(self, Style::Fill)
    }

    pub fn is_stroke(self) -> bool {
        matches!(self, Style::Stroke(_))
    }
}

/// One tile in a composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Center in canvas coordinates; may lie off-canvas.
    pub position: DVec2,
    /// Nominal diameter in canvas units.
    pub size: f64,
    pub color: Srgb,
    pub style: Style,
    pub flip_x: bool,
    pub flip_y: bool,
    pub component: Component,
}

impl Shape {
    /// Circular overlap test on the nominal sizes.
    ///
    /// Two shapes overlap when their centers are closer than the mean of
    /// their sizes. Touching circles do not overlap.
    pub fn overlaps(&self, other: &Shape) -> bool {
        self.position.distance(other.position) < (self.size + other.size) * 0.5
    }

    /// Weight used for centroid balancing.
    pub fn area_weight(&self) -> f64 {
        self.size * self.size
    }
}

#[cfg(test)]
pub(crate) fn test_shape(x: f64, y: f64, size: f64, color: Srgb, style: Style) -> Shape {
    Shape {
        position: DVec2::new(x, y),
        size,
        color,
        style,
        flip_x: false,
        flip_y: false,
        component: Component::Corner,
    }
}
