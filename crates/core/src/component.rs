//! Tile components: the fixed vector outlines every shape is drawn from.
//!
//! Each component is an SVG path in its own square view box. Renderers scale
//! the view box to the shape's nominal size, so only the view-box edge length
//! matters for placement; the path data is copied verbatim into SVG output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::prng::SketchRng;

/// One of the built-in tile outlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// Quarter-round corner band.
    #[default]
    Corner,
    /// Square with one rounded corner.
    LargeSlice,
    /// Large rounded square.
    LargeTile,
    /// Small square with one rounded corner.
    SmallSlice,
    /// Small rounded square.
    SmallTile,
}

impl Component {
    /// All components, in selection order.
    pub const ALL: [Component; 5] = [
        Component::Corner,
        Component::LargeSlice,
        Component::LargeTile,
        Component::SmallSlice,
        Component::SmallTile,
    ];

    /// Short code used in share tokens and export filenames.
    pub fn code(self) -> &'static str {
        match self {
            Component::Corner => "tc",
            Component::LargeSlice => "ls",
            Component::LargeTile => "lt",
            Component::SmallSlice => "ss",
            Component::SmallTile => "st",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Component::Corner => "The corner",
            Component::LargeSlice => "Large tile slice",
            Component::LargeTile => "Large tile",
            Component::SmallSlice => "Small tile slice",
            Component::SmallTile => "Small tile",
        }
    }

    /// SVG path data, in view-box units.
    pub fn path_data(self) -> &'static str {
        match self {
            Component::Corner => {
                "M360 360V224C360 100.5 259.5 0 136 0H0v160h136c35.3 0 64 28.7 64 64v136h160Z"
            }
            Component::LargeSlice => "M360,224C360,100.5,259.5,0,136,0H0v360h360v-136h0Z",
            Component::LargeTile => {
                "M496,720H224C100.5,720,0,619.5,0,496V224C0,100.5,100.5,0,224,0h272c123.5,0,224,100.5,224,224v272c0,123.5-100.5,224-224,224h0Z"
            }
            Component::SmallSlice => "M200,64C200,28.7,171.3,0,136,0H0v200h200V64h0Z",
            Component::SmallTile => {
                "m64 0c-35.3 0-64 28.7-64 64v272c0 35.3 28.7 64 64 64h272c35.3 0 64-28.7 64-64v-272c0-35.3-28.7-64-64-64z"
            }
        }
    }

    /// Edge length of the square view box the path is authored in.
    pub fn view_box(self) -> f64 {
        match self {
            Component::Corner | Component::LargeSlice => 360.0,
            Component::LargeTile => 720.0,
            Component::SmallSlice => 200.0,
            Component::SmallTile => 400.0,
        }
    }

    /// True when mirroring leaves the outline unchanged, so flips are skipped.
    pub fn is_mirror_symmetric(self) -> bool {
        matches!(self, Component::LargeTile | Component::SmallTile)
    }

    /// Looks up a component by its short code.
    pub fn from_code(code: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| EngineError::UnknownComponent(code.to_string()))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which component(s) a composition draws from.
///
/// `Mixed` resolves a component per shape during placement instead of once
/// per composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSelection {
    Single(Component),
    Mixed,
}

impl ComponentSelection {
    /// Share-token code for mixed mode.
    pub const MIXED_CODE: &'static str = "mx";

    /// Short code: the component code, or `mx`.
    pub fn code(self) -> &'static str {
        match self {
            ComponentSelection::Single(c) => c.code(),
            ComponentSelection::Mixed => Self::MIXED_CODE,
        }
    }

    /// Parses a component code or `mx`.
    pub fn from_code(code: &str) -> Result<Self, EngineError> {
        if code == Self::MIXED_CODE {
            return Ok(ComponentSelection::Mixed);
        }
        Component::from_code(code).map(ComponentSelection::Single)
    }

    /// Resolves the component for the next shape.
    ///
    /// Only `Mixed` consumes a random draw.
    pub fn resolve(self, rng: &mut SketchRng) -> Component {
        match self {
            ComponentSelection::Single(c) => c,
            ComponentSelection::Mixed => Component::ALL[rng.below(Component::ALL.len())],
        }
    }

    /// All selectable codes, default first.
    pub fn list_codes() -> Vec<&'static str> {
        Component::ALL
            .iter()
            .map(|c| c.code())
            .chain(std::iter::once(Self::MIXED_CODE))
            .collect()
    }
}

impl Default for ComponentSelection {
    fn default() -> Self {
        ComponentSelection::Single(Component::default())
    }
}
