//! Reproducible description of a composition, shareable as a query string.
//!
//! A [`Seed`] pairs the integer seed with the full parameter set. Rendered
//! as a URL query (`s=…&cm=…&a=…`) it is the share token: decoding a token
//! and generating from it reproduces the composition exactly, provided the
//! canvas size matches.

use serde::{Deserialize, Serialize};

use crate::component::ComponentSelection;
use crate::params::{clamp_percent, Params};
use crate::palette::ColorScheme;
use crate::policy::BalancePolicy;

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 991_712_126;

/// Query keys, in the order they are written.
mod key {
    pub const SEED: &str = "s";
    pub const COMPONENT: &str = "cm";
    pub const AMOUNT: &str = "a";
    pub const CENTRE: &str = "cn";
    pub const EDGE: &str = "e";
    pub const FLIP_X: &str = "fx";
    pub const FLIP_Y: &str = "fy";
    pub const SIZE: &str = "sz";
    pub const SPREAD: &str = "sp";
    pub const BLEND: &str = "b";
    pub const LIGHT: &str = "l";
    pub const OPACITY: &str = "op";
    pub const OUTLINE: &str = "ot";
    pub const WEIGHT: &str = "w";
    pub const PALETTE: &str = "pl";
    pub const POLICY: &str = "bp";
    pub const HALFTONE_STRENGTH: &str = "ht";
    pub const HALFTONE_DOT_SIZE: &str = "hd";
}

/// Parses a user-supplied seed.
///
/// Accepts any finite non-negative number and floors it. Returns `None` for
/// empty, unparsable, negative or out-of-range input.
pub fn parse_seed(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(seed) = raw.parse::<u64>() {
        return Some(seed);
    }
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || value < 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value.floor() as u64)
}

/// Seed plus every generation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub seed: u64,
    pub params: Params,
}

impl Seed {
    pub fn new(seed: u64, params: Params) -> Self {
        Self { seed, params }
    }

    /// Encodes the seed and parameters as a URL query string.
    ///
    /// Numbers use the shortest representation that parses back to the same
    /// `f64`, so decoding is lossless.
    pub fn to_query(&self) -> String {
        let p = &self.params;
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair(key::SEED, &self.seed.to_string())
            .append_pair(key::COMPONENT, p.component.code());
        for (name, value) in [
            (key::AMOUNT, p.amount),
            (key::CENTRE, p.centre),
            (key::EDGE, p.edge),
            (key::FLIP_X, p.flip_x),
            (key::FLIP_Y, p.flip_y),
            (key::SIZE, p.size),
            (key::SPREAD, p.spread),
            (key::BLEND, p.blend),
            (key::LIGHT, p.light),
            (key::OPACITY, p.opacity),
            (key::OUTLINE, p.outline),
            (key::WEIGHT, p.weight),
        ] {
            query.append_pair(name, &value.to_string());
        }
        query
            .append_pair(key::PALETTE, &p.palette)
            .append_pair(key::POLICY, p.policy.code())
            .append_pair(key::HALFTONE_STRENGTH, &p.halftone_strength.to_string())
            .append_pair(key::HALFTONE_DOT_SIZE, &p.halftone_dot_size.to_string());
        query.finish()
    }

    /// Decodes a query string produced by [`Seed::to_query`].
    ///
    /// Never fails. A leading `?` is ignored, unknown keys are skipped, and
    /// every value that is missing or unusable falls back to its default;
    /// out-of-range numbers are clamped. A missing or invalid seed becomes
    /// [`DEFAULT_SEED`].
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut seed = DEFAULT_SEED;
        let mut p = Params::default();

        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let number = |current: f64| match value.trim().parse::<f64>() {
                Ok(v) => clamp_percent(v, current),
                Err(_) => current,
            };
            match name.as_ref() {
                key::SEED => seed = parse_seed(&value).unwrap_or(DEFAULT_SEED),
                key::COMPONENT => {
                    if let Ok(c) = ComponentSelection::from_code(&value) {
                        p.component = c;
                    }
                }
                key::AMOUNT => p.amount = number(p.amount),
                key::CENTRE => p.centre = number(p.centre),
                key::EDGE => p.edge = number(p.edge),
                key::FLIP_X => p.flip_x = number(p.flip_x),
                key::FLIP_Y => p.flip_y = number(p.flip_y),
                key::SIZE => p.size = number(p.size),
                key::SPREAD => p.spread = number(p.spread),
                key::BLEND => p.blend = number(p.blend),
                key::LIGHT => p.light = number(p.light),
                key::OPACITY => p.opacity = number(p.opacity),
                key::OUTLINE => p.outline = number(p.outline),
                key::WEIGHT => p.weight = number(p.weight),
                key::HALFTONE_STRENGTH => p.halftone_strength = number(p.halftone_strength),
                key::HALFTONE_DOT_SIZE => p.halftone_dot_size = number(p.halftone_dot_size),
                key::PALETTE => {
                    if ColorScheme::from_name(&value).is_ok() {
                        p.palette = value.to_string();
                    }
                }
                key::POLICY => {
                    if let Ok(policy) = BalancePolicy::from_name(&value) {
                        p.policy = policy;
                    }
                }
                _ => {}
            }
        }
        Self::new(seed, p)
    }

    /// File stem for exported artwork, with percentages rounded.
    ///
    /// Example: `facet-991712126tc-a0cn50e50fx0fy0sz75sp50b0l50op75ot0w50`.
    pub fn export_filename(&self) -> String {
        let p = &self.params;
        let pct = |v: f64| v.round() as i64;
        format!(
            "facet-{}{}-a{}cn{}e{}fx{}fy{}sz{}sp{}b{}l{}op{}ot{}w{}",
            self.seed,
            p.component.code(),
            pct(p.amount),
            pct(p.centre),
            pct(p.edge),
            pct(p.flip_x),
            pct(p.flip_y),
            pct(p.size),
            pct(p.spread),
            pct(p.blend),
            pct(p.light),
            pct(p.opacity),
            pct(p.outline),
            pct(p.weight),
        )
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, Params::default())
    }
}
