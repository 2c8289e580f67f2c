//! Parameter curves: UI percentages to algorithmic quantities.
//!
//! Every function clamps its input to the documented range first, so callers
//! can pass raw control values. All functions are pure.

use serde::{Deserialize, Serialize};

use crate::params::Params;

/// Smallest size ratio a shape may have, relative to the short canvas edge.
pub const MIN_SIZE_RATIO: f64 = 0.1;
/// Largest size ratio a shape may have, relative to the short canvas edge.
pub const MAX_SIZE_RATIO: f64 = 2.0;
/// Upper end of the density curve.
pub const MAX_SHAPE_COUNT: usize = 50;
/// Percentage where the size curve switches from the sub-unit segment.
const SIZE_KNEE_PERCENT: f64 = 75.0;

/// Linear interpolation, `a + (b - a) * t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamps a percentage to [0, 100]. NaN maps to 0.
fn bounded_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Clamps a percentage and normalizes it to [0, 1].
fn unit(percent: f64) -> f64 {
    bounded_percent(percent) / 100.0
}

/// Percentage to probability in [0, 1].
pub fn probability(percent: f64) -> f64 {
    unit(percent)
}

/// Piecewise-linear size control with a knee at 75%.
///
/// 0–75% covers [0.1, 1.0]; 75–100% covers [1.0, 2.0].
pub fn size_control(percent: f64) -> f64 {
    let p = bounded_percent(percent);
    if p <= SIZE_KNEE_PERCENT {
        lerp(MIN_SIZE_RATIO, 1.0, p / SIZE_KNEE_PERCENT)
    } else {
        lerp(1.0, MAX_SIZE_RATIO, (p - SIZE_KNEE_PERCENT) / (100.0 - SIZE_KNEE_PERCENT))
    }
}

/// Size spread in [0, 1].
pub fn spread(percent: f64) -> f64 {
    lerp(0.0, 1.0, unit(percent))
}

/// Window of size ratios `[min, max]` around the size control.
///
/// Both ends are clamped to [0.1, 2.0].
pub fn size_ratio_range(size_percent: f64, spread_percent: f64) -> (f64, f64) {
    let control = size_control(size_percent);
    let spread = spread(spread_percent);
    (
        (control - spread).clamp(MIN_SIZE_RATIO, MAX_SIZE_RATIO),
        (control + spread).clamp(MIN_SIZE_RATIO, MAX_SIZE_RATIO),
    )
}

/// Target number of shapes, rounded, in [1, 50].
pub fn shape_count(amount_percent: f64) -> usize {
    (1.0 + unit(amount_percent) * (MAX_SHAPE_COUNT - 1) as f64).round() as usize
}

/// Blend factor between uniform and centered placement, in [0.1, 0.56].
pub fn center_bias(centre_percent: f64) -> f64 {
    lerp(0.1, 0.56, unit(centre_percent))
}

/// How far candidates may extend past the canvas, relative to shape size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeOverflow {
    /// Overflow past the left/top edges, in [0.1, 1.1].
    pub negative: f64,
    /// Overflow past the right/bottom edges, in [0, 0.4].
    pub positive: f64,
}

/// Edge overflow factors for an edge percentage.
pub fn edge_overflow(edge_percent: f64) -> EdgeOverflow {
    let t = unit(edge_percent);
    EdgeOverflow {
        negative: lerp(0.1, 1.1, t),
        positive: lerp(0.0, 0.4, t),
    }
}

/// Per-color selection weights for a palette of `count` colors.
///
/// Below 50% the weights move from front-loaded (`1/(i+1)`, normalized)
/// toward uniform; above 50% from uniform toward back-loaded (`i+1`,
/// normalized). Exactly uniform at 50%.
pub fn palette_weights(light_percent: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let t = unit(light_percent);
    let uniform = 1.0 / count as f64;

    if t <= 0.5 {
        let phase = t / 0.5;
        let total: f64 = (0..count).map(|i| 1.0 / (i + 1) as f64).sum();
        (0..count)
            .map(|i| lerp(1.0 / (i + 1) as f64 / total, uniform, phase))
            .collect()
    } else {
        let phase = (t - 0.5) / 0.5;
        let total: f64 = (0..count).map(|i| (i + 1) as f64).sum();
        (0..count)
            .map(|i| lerp(uniform, (i + 1) as f64 / total, phase))
            .collect()
    }
}

/// All curves evaluated for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParams {
    pub target_count: usize,
    pub min_size_ratio: f64,
    pub max_size_ratio: f64,
    pub center_bias: f64,
    pub edge_overflow: EdgeOverflow,
    pub palette_weights: Vec<f64>,
    pub stroke_probability: f64,
    pub thick_probability: f64,
    pub flip_x_probability: f64,
    pub flip_y_probability: f64,
    pub overlap_alpha: f64,
    /// Probability of overriding a same-color overlap rejection.
    pub blend: f64,
    pub halftone_strength: f64,
    pub halftone_dot_size: f64,
}

impl ResolvedParams {
    /// Evaluates every curve for `params` against a palette of `palette_len` colors.
    pub fn resolve(params: &Params, palette_len: usize) -> Self {
        let (min_size_ratio, max_size_ratio) = size_ratio_range(params.size, params.spread);
        Self {
            target_count: shape_count(params.amount),
            min_size_ratio,
            max_size_ratio,
            center_bias: center_bias(params.centre),
            edge_overflow: edge_overflow(params.edge),
            palette_weights: palette_weights(params.light, palette_len),
            stroke_probability: probability(params.outline),
            thick_probability: probability(params.weight),
            flip_x_probability: probability(params.flip_x),
            flip_y_probability: probability(params.flip_y),
            overlap_alpha: probability(params.opacity),
            blend: probability(params.blend),
            halftone_strength: probability(params.halftone_strength),
            halftone_dot_size: probability(params.halftone_dot_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn size_control_hits_knee_and_endpoints() {
        assert_eq!(size_control(0.0), 0.1);
        assert_eq!(size_control(75.0), 1.0);
        assert_eq!(size_control(100.0), 2.0);
    }

    #[test]
    fn size_control_is_exact_on_interior_percentages() {
        assert_eq!(size_control(29.0), lerp(0.1, 1.0, 29.0 / 75.0));
        assert_eq!(size_control(83.0), lerp(1.0, 2.0, 8.0 / 25.0));
        assert_eq!(size_control(f64::NAN), 0.1);
    }

    #[test]
    fn size_control_is_linear_within_segments() {
        assert!(approx(size_control(37.5), 0.55));
        assert!(approx(size_control(87.5), 1.5));
    }

    #[test]
    fn size_control_clamps_input() {
        assert_eq!(size_control(-20.0), 0.1);
        assert_eq!(size_control(250.0), 2.0);
        assert_eq!(size_control(f64::NAN), 0.1);
    }

    #[test]
    fn size_ratio_range_defaults() {
        let (min, max) = size_ratio_range(75.0, 50.0);
        assert!(approx(min, 0.5));
        assert!(approx(max, 1.5));
    }

    #[test]
    fn size_ratio_range_clamps_both_ends() {
        let (min, max) = size_ratio_range(0.0, 100.0);
        assert_eq!(min, 0.1);
        assert!(approx(max, 1.1));
        assert_eq!(size_ratio_range(100.0, 100.0), (1.0, 2.0));
        assert_eq!(size_ratio_range(100.0, 0.0), (2.0, 2.0));
    }

    #[test]
    fn shape_count_endpoints_and_rounding() {
        assert_eq!(shape_count(0.0), 1);
        assert_eq!(shape_count(100.0), 50);
        assert_eq!(shape_count(50.0), 26);
        assert_eq!(shape_count(-5.0), 1);
        assert_eq!(shape_count(500.0), 50);
    }

    #[test]
    fn center_bias_endpoints() {
        assert!(approx(center_bias(0.0), 0.1));
        assert!(approx(center_bias(100.0), 0.56));
        assert!(approx(center_bias(50.0), 0.33));
    }

    #[test]
    fn edge_overflow_endpoints() {
        let low = edge_overflow(0.0);
        let high = edge_overflow(100.0);
        assert!(approx(low.negative, 0.1) && approx(low.positive, 0.0));
        assert!(approx(high.negative, 1.1) && approx(high.positive, 0.4));
    }

    #[test]
    fn palette_weights_uniform_at_midpoint() {
        for w in palette_weights(50.0, 4) {
            assert!(approx(w, 0.25));
        }
    }

    #[test]
    fn palette_weights_front_loaded_at_zero() {
        let w = palette_weights(0.0, 4);
        let total = 1.0 + 0.5 + 1.0 / 3.0 + 0.25;
        assert!(approx(w[0], 1.0 / total));
        assert!(w.windows(2).all(|p| p[0] > p[1]));
    }

    #[test]
    fn palette_weights_back_loaded_at_hundred() {
        let w = palette_weights(100.0, 4);
        assert!(approx(w[0], 0.1));
        assert!(approx(w[3], 0.4));
        assert!(w.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn palette_weights_empty_palette() {
        assert!(palette_weights(30.0, 0).is_empty());
    }

    #[test]
    fn resolve_defaults() {
        let r = ResolvedParams::resolve(&Params::default(), 4);
        assert_eq!(r.target_count, 1);
        assert!(approx(r.min_size_ratio, 0.5));
        assert!(approx(r.max_size_ratio, 1.5));
        assert!(approx(r.overlap_alpha, 0.75));
        assert!(approx(r.thick_probability, 0.5));
        assert_eq!(r.stroke_probability, 0.0);
        assert_eq!(r.blend, 0.0);
        assert_eq!(r.palette_weights.len(), 4);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn palette_weights_sum_to_one(light in -50.0_f64..150.0, count in 1_usize..12) {
                let sum: f64 = palette_weights(light, count).iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-9, "sum {sum}");
            }

            #[test]
            fn size_range_is_ordered_and_bounded(size in -10.0_f64..110.0, spread_pct in -10.0_f64..110.0) {
                let (min, max) = size_ratio_range(size, spread_pct);
                prop_assert!(min <= max);
                prop_assert!((MIN_SIZE_RATIO..=MAX_SIZE_RATIO).contains(&min));
                prop_assert!((MIN_SIZE_RATIO..=MAX_SIZE_RATIO).contains(&max));
            }

            #[test]
            fn size_control_is_monotonic(a in 0.0_f64..100.0, b in 0.0_f64..100.0) {
                prop_assume!(a < b);
                prop_assert!(size_control(a) <= size_control(b));
            }

            #[test]
            fn shape_count_in_range(amount in -1000.0_f64..1000.0) {
                let n = shape_count(amount);
                prop_assert!((1..=MAX_SHAPE_COUNT).contains(&n));
            }
        }
    }
}
