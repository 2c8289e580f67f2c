//! The generation parameter vector and its JSON configuration surface.
//!
//! [`Params`] holds every control as the percentage a UI would show. Values
//! are never rejected: anything out of range is clamped by [`Params::clamped`]
//! and anything missing or mistyped in JSON falls back to its default.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::component::ComponentSelection;
use crate::palette::ColorScheme;
use crate::policy::BalancePolicy;
use crate::prng::SketchRng;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Clamps a percentage to [0, 100], replacing non-finite values with `default`.
pub fn clamp_percent(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        default
    }
}

pub const DEFAULT_AMOUNT: f64 = 0.0;
pub const DEFAULT_CENTRE: f64 = 50.0;
pub const DEFAULT_EDGE: f64 = 50.0;
pub const DEFAULT_FLIP_X: f64 = 0.0;
pub const DEFAULT_FLIP_Y: f64 = 0.0;
pub const DEFAULT_SIZE: f64 = 75.0;
pub const DEFAULT_SPREAD: f64 = 50.0;
pub const DEFAULT_BLEND: f64 = 0.0;
pub const DEFAULT_LIGHT: f64 = 50.0;
pub const DEFAULT_OPACITY: f64 = 75.0;
pub const DEFAULT_OUTLINE: f64 = 0.0;
pub const DEFAULT_WEIGHT: f64 = 50.0;
pub const DEFAULT_HALFTONE_STRENGTH: f64 = 0.0;
pub const DEFAULT_HALFTONE_DOT_SIZE: f64 = 50.0;

/// Every generation control, as percentages in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Density; maps to 1–50 shapes.
    pub amount: f64,
    /// Pull toward the canvas center.
    pub centre: f64,
    /// How far shapes may spill past the edges.
    pub edge: f64,
    pub flip_x: f64,
    pub flip_y: f64,
    pub size: f64,
    pub spread: f64,
    /// Chance that a same-color overlap is tolerated.
    pub blend: f64,
    /// Palette bias from first (0) to last (100) color.
    pub light: f64,
    /// Alpha applied to shapes over an earlier filled shape.
    pub opacity: f64,
    /// Chance that a shape is stroked instead of filled.
    pub outline: f64,
    /// Share of stroked shapes drawn with the thick weight.
    pub weight: f64,
    /// Halftone overlay strength; 0 disables the filter.
    pub halftone_strength: f64,
    pub halftone_dot_size: f64,
    pub component: ComponentSelection,
    /// Name of a built-in color scheme.
    pub palette: String,
    pub policy: BalancePolicy,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            centre: DEFAULT_CENTRE,
            edge: DEFAULT_EDGE,
            flip_x: DEFAULT_FLIP_X,
            flip_y: DEFAULT_FLIP_Y,
            size: DEFAULT_SIZE,
            spread: DEFAULT_SPREAD,
            blend: DEFAULT_BLEND,
            light: DEFAULT_LIGHT,
            opacity: DEFAULT_OPACITY,
            outline: DEFAULT_OUTLINE,
            weight: DEFAULT_WEIGHT,
            halftone_strength: DEFAULT_HALFTONE_STRENGTH,
            halftone_dot_size: DEFAULT_HALFTONE_DOT_SIZE,
            component: ComponentSelection::default(),
            palette: ColorScheme::default().name().to_string(),
            policy: BalancePolicy::default(),
        }
    }
}

impl Params {
    /// Returns a copy with every percentage clamped to [0, 100] and an
    /// unknown palette name replaced by the default scheme.
    pub fn clamped(&self) -> Self {
        let palette = if ColorScheme::list_names().contains(&self.palette.as_str()) {
            self.palette.clone()
        } else {
            ColorScheme::default().name().to_string()
        };
        Self {
            amount: clamp_percent(self.amount, DEFAULT_AMOUNT),
            centre: clamp_percent(self.centre, DEFAULT_CENTRE),
            edge: clamp_percent(self.edge, DEFAULT_EDGE),
            flip_x: clamp_percent(self.flip_x, DEFAULT_FLIP_X),
            flip_y: clamp_percent(self.flip_y, DEFAULT_FLIP_Y),
            size: clamp_percent(self.size, DEFAULT_SIZE),
            spread: clamp_percent(self.spread, DEFAULT_SPREAD),
            blend: clamp_percent(self.blend, DEFAULT_BLEND),
            light: clamp_percent(self.light, DEFAULT_LIGHT),
            opacity: clamp_percent(self.opacity, DEFAULT_OPACITY),
            outline: clamp_percent(self.outline, DEFAULT_OUTLINE),
            weight: clamp_percent(self.weight, DEFAULT_WEIGHT),
            halftone_strength: clamp_percent(self.halftone_strength, DEFAULT_HALFTONE_STRENGTH),
            halftone_dot_size: clamp_percent(self.halftone_dot_size, DEFAULT_HALFTONE_DOT_SIZE),
            component: self.component,
            palette,
            policy: self.policy,
        }
    }

    /// The color scheme named by `palette`, or the default for unknown names.
    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme::from_name(&self.palette).unwrap_or_default()
    }

    /// Builds parameters from a JSON object, falling back to defaults for
    /// missing or mistyped keys, then clamps.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        let component = ComponentSelection::from_code(&param_string(
            params,
            "component",
            d.component.code(),
        ))
        .unwrap_or(d.component);
        let policy = BalancePolicy::from_name(&param_string(params, "policy", d.policy.name()))
            .unwrap_or(d.policy);
        Self {
            amount: param_f64(params, "amount", d.amount),
            centre: param_f64(params, "centre", d.centre),
            edge: param_f64(params, "edge", d.edge),
            flip_x: param_f64(params, "flip_x", d.flip_x),
            flip_y: param_f64(params, "flip_y", d.flip_y),
            size: param_f64(params, "size", d.size),
            spread: param_f64(params, "spread", d.spread),
            blend: param_f64(params, "blend", d.blend),
            light: param_f64(params, "light", d.light),
            opacity: param_f64(params, "opacity", d.opacity),
            outline: param_f64(params, "outline", d.outline),
            weight: param_f64(params, "weight", d.weight),
            halftone_strength: param_f64(params, "halftone_strength", d.halftone_strength),
            halftone_dot_size: param_f64(params, "halftone_dot_size", d.halftone_dot_size),
            component,
            palette: param_string(params, "palette", &d.palette),
            policy,
        }
        .clamped()
    }

    /// Current values as a flat JSON object, the inverse of [`Params::from_json`].
    pub fn to_json(&self) -> Value {
        json!({
            "amount": self.amount,
            "centre": self.centre,
            "edge": self.edge,
            "flip_x": self.flip_x,
            "flip_y": self.flip_y,
            "size": self.size,
            "spread": self.spread,
            "blend": self.blend,
            "light": self.light,
            "opacity": self.opacity,
            "outline": self.outline,
            "weight": self.weight,
            "halftone_strength": self.halftone_strength,
            "halftone_dot_size": self.halftone_dot_size,
            "component": self.component.code(),
            "palette": self.palette,
            "policy": self.policy.name(),
        })
    }

    /// Random parameter set: random component, whole percentages for the
    /// layout controls and unrounded ones for the probabilities.
    ///
    /// Palette, policy and halftone settings are kept from `self`.
    pub fn randomized(&self, rng: &mut SketchRng) -> Self {
        let component = ComponentSelection::Single(
            crate::component::Component::ALL[rng.below(crate::component::Component::ALL.len())],
        );
        let mut whole = || (rng.uniform01() * 100.0).round();
        let centre = whole();
        let blend = whole();
        let amount = whole();
        let edge = whole();
        let light = whole();
        let mut raw = || rng.uniform01() * 100.0;
        let flip_x = raw();
        let flip_y = raw();
        let opacity = raw();
        let outline = raw();
        let weight = raw();
        let size = (rng.uniform01() * 100.0).round();
        let spread = (rng.uniform01() * 100.0).round();
        Self {
            amount,
            centre,
            edge,
            flip_x,
            flip_y,
            size,
            spread,
            blend,
            light,
            opacity,
            outline,
            weight,
            component,
            ..self.clone()
        }
    }

    /// Schema describing each control: type, range, default and meaning.
    pub fn schema() -> Value {
        let pct = |default: f64, description: &str| {
            json!({
                "type": "number",
                "default": default,
                "min": 0.0,
                "max": 100.0,
                "description": description,
            })
        };
        json!({
            "amount": pct(DEFAULT_AMOUNT, "Density: 0 places 1 shape, 100 targets 50"),
            "centre": pct(DEFAULT_CENTRE, "Blend from uniform toward centered placement"),
            "edge": pct(DEFAULT_EDGE, "How far shapes may extend past the canvas edges"),
            "flip_x": pct(DEFAULT_FLIP_X, "Chance of mirroring a shape horizontally"),
            "flip_y": pct(DEFAULT_FLIP_Y, "Chance of mirroring a shape vertically"),
            "size": pct(DEFAULT_SIZE, "Nominal shape size; 75 is one short canvas edge"),
            "spread": pct(DEFAULT_SPREAD, "Variation of shape sizes around the nominal size"),
            "blend": pct(DEFAULT_BLEND, "Chance a same-color overlap is allowed"),
            "light": pct(DEFAULT_LIGHT, "Palette bias from first (0) to last (100) color"),
            "opacity": pct(DEFAULT_OPACITY, "Alpha of shapes drawn over earlier filled shapes"),
            "outline": pct(DEFAULT_OUTLINE, "Chance a shape is stroked instead of filled"),
            "weight": pct(DEFAULT_WEIGHT, "Share of stroked shapes that use the thick weight"),
            "halftone_strength": pct(DEFAULT_HALFTONE_STRENGTH, "Halftone dot overlay strength; 0 disables it"),
            "halftone_dot_size": pct(DEFAULT_HALFTONE_DOT_SIZE, "Halftone grid cell size"),
            "component": {
                "type": "string",
                "default": ComponentSelection::default().code(),
                "values": ComponentSelection::list_codes(),
                "description": "Tile outline, or mx for a per-shape mix"
            },
            "palette": {
                "type": "string",
                "default": ColorScheme::default().name(),
                "values": ColorScheme::list_names(),
                "description": "Built-in color scheme"
            },
            "policy": {
                "type": "string",
                "default": BalancePolicy::default().name(),
                "values": BalancePolicy::list_names(),
                "description": "Candidate acceptance policy"
            }
        })
    }
}
