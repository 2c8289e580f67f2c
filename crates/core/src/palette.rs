//! Color schemes: an ordered list of tile colors plus a background.
//!
//! Order matters. The light parameter biases selection toward the front or
//! the back of the list (see [`crate::resolve::palette_weights`]), so schemes
//! are authored dark-to-light.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::EngineError;
use crate::prng::SketchRng;

/// Names of the built-in schemes, default first.
const SCHEME_NAMES: &[&str] = &["facet", "ember", "moss", "graphite"];

/// An ordered palette paired with a background color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    name: String,
    background: Srgb,
    colors: Vec<Srgb>,
}

impl ColorScheme {
    /// Creates a scheme. Requires at least one tile color.
    pub fn new(
        name: impl Into<String>,
        background: Srgb,
        colors: Vec<Srgb>,
    ) -> Result<Self, EngineError> {
        if colors.is_empty() {
            return Err(EngineError::InvalidPalette(
                "color scheme requires at least 1 color".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            background,
            colors,
        })
    }

    /// Creates a scheme from hex strings.
    pub fn from_hex(name: &str, background: &str, colors: &[&str]) -> Result<Self, EngineError> {
        let colors = colors
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, Srgb::from_hex(background)?, colors)
    }

    /// Scheme name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background color painted under every composition.
    pub fn background(&self) -> Srgb {
        self.background
    }

    /// Tile colors in weighting order.
    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Number of tile colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed scheme.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Whether `color` is one of this scheme's tile colors.
    pub fn contains(&self, color: Srgb) -> bool {
        self.colors.contains(&color)
    }

    /// Picks a color by cumulative-weight threshold sampling.
    ///
    /// Draws one threshold `u` in [0, 1) and returns the first color whose
    /// running weight sum reaches it. Falls back to the last color if the
    /// weights sum to slightly under `u` through rounding.
    pub fn pick(&self, weights: &[f64], rng: &mut SketchRng) -> Srgb {
        let threshold = rng.uniform01();
        let mut sum = 0.0;
        for (color, weight) in self.colors.iter().zip(weights) {
            sum += weight;
            if threshold <= sum {
                return *color;
            }
        }
        self.colors[self.colors.len() - 1]
    }

    // -- Built-in schemes --

    /// Navy ground with four blues. The default scheme.
    pub fn facet() -> Self {
        Self::from_hex(
            "facet",
            "#031f60",
            &["#072d75", "#083c8a", "#0158ad", "#3598f8"],
        )
        .expect("facet scheme hex values are valid")
    }

    /// Charred ground with reds through amber.
    pub fn ember() -> Self {
        Self::from_hex(
            "ember",
            "#2b0a06",
            &["#5e1309", "#8f230d", "#c8461b", "#f29b38"],
        )
        .expect("ember scheme hex values are valid")
    }

    /// Forest ground with greens.
    pub fn moss() -> Self {
        Self::from_hex(
            "moss",
            "#0d2416",
            &["#163a22", "#24572f", "#3f7d3c", "#8fbf5a"],
        )
        .expect("moss scheme hex values are valid")
    }

    /// Near-black ground with neutral grays.
    pub fn graphite() -> Self {
        Self::from_hex(
            "graphite",
            "#111214",
            &["#26282c", "#3d4046", "#62666e", "#a9adb5"],
        )
        .expect("graphite scheme hex values are valid")
    }

    /// Looks up a built-in scheme by name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "facet" => Ok(Self::facet()),
            "ember" => Ok(Self::ember()),
            "moss" => Ok(Self::moss()),
            "graphite" => Ok(Self::graphite()),
            other => Err(EngineError::UnknownPalette(other.to_string())),
        }
    }

    /// Names of all built-in schemes, default first.
    pub fn list_names() -> &'static [&'static str] {
        SCHEME_NAMES
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::facet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_with_no_colors_returns_error() {
        let bg = Srgb::from_rgb8(0, 0, 0);
        assert!(ColorScheme::new("empty", bg, vec![]).is_err());
    }

    #[test]
    fn from_hex_with_invalid_color_returns_error() {
        assert!(ColorScheme::from_hex("bad", "#000000", &["#ff0000", "#zzzzzz"]).is_err());
        assert!(ColorScheme::from_hex("bad", "nope", &["#ff0000"]).is_err());
    }

    #[test]
    fn default_is_facet_scheme() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.name(), "facet");
        assert_eq!(scheme.background().to_hex(), "#031f60");
        let hexes: Vec<String> = scheme.colors().iter().map(|c| c.to_hex()).collect();
        assert_eq!(hexes, ["#072d75", "#083c8a", "#0158ad", "#3598f8"]);
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in ColorScheme::list_names() {
            let scheme = ColorScheme::from_name(name).unwrap();
            assert_eq!(scheme.name(), *name);
            assert!(scheme.len() >= 2, "{name} has only {} colors", scheme.len());
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        assert!(matches!(
            ColorScheme::from_name("sunset"),
            Err(EngineError::UnknownPalette(_))
        ));
    }

    #[test]
    fn builtin_schemes_are_ordered_dark_to_light() {
        for name in ColorScheme::list_names() {
            let scheme = ColorScheme::from_name(name).unwrap();
            let lum: Vec<f64> = scheme.colors().iter().map(|c| c.luminance()).collect();
            assert!(
                lum.windows(2).all(|w| w[0] < w[1]),
                "{name} not ordered by luminance: {lum:?}"
            );
        }
    }

    #[test]
    fn pick_with_all_weight_on_one_color_returns_it() {
        let scheme = ColorScheme::facet();
        let mut rng = SketchRng::new(1);
        for _ in 0..100 {
            assert_eq!(scheme.pick(&[0.0, 0.0, 1.0, 0.0], &mut rng), scheme.colors()[2]);
        }
    }

    #[test]
    fn pick_falls_back_to_last_color_when_weights_fall_short() {
        let scheme = ColorScheme::facet();
        let mut rng = SketchRng::new(1);
        for _ in 0..100 {
            assert_eq!(scheme.pick(&[0.0; 4], &mut rng), scheme.colors()[3]);
        }
    }

    #[test]
    fn pick_always_returns_scheme_color() {
        let scheme = ColorScheme::moss();
        let mut rng = SketchRng::new(42);
        let weights = [0.25; 4];
        for _ in 0..1000 {
            assert!(scheme.contains(scheme.pick(&weights, &mut rng)));
        }
    }

    #[test]
    fn serde_round_trip() {
        let scheme = ColorScheme::ember();
        let json = serde_json::to_string(&scheme).unwrap();
        let back: ColorScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(scheme, back);
    }
}
