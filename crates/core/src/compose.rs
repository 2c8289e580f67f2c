//! The placement loop: turns a seed and a parameter set into a composition.
//!
//! Generation is rejection sampling. Each attempt proposes one candidate by
//! drawing from a fresh [`SketchRng`] in a fixed order, then hands it to the
//! configured [`AcceptancePolicy`]. The loop stops when the target count is
//! reached or the attempt budget runs out, whichever comes first. Running out
//! is an ordinary outcome, reported in [`PlacementReport::exhausted`].
//!
//! Draw order per attempt: color, style, size, uniform x, uniform y,
//! gaussian x, gaussian y, component (mixed mode only), flip x, flip y,
//! then whatever the policy draws. Changing it changes every composition.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::layering::{apply_layering, assign_stroke_weights};
use crate::palette::ColorScheme;
use crate::params::Params;
use crate::policy::AcceptancePolicy;
use crate::prng::SketchRng;
use crate::resolve::{lerp, ResolvedParams};
use crate::shape::{Shape, Style, StrokeWeight};

/// Upper bound on proposals per generation call.
pub const MAX_ATTEMPTS: usize = 9000;
/// Exponent on the size draw; below 1 it favors the larger end of the range.
const SIZE_EXPONENT: f64 = 0.35;
/// Standard deviation of the centered position draw, per canvas extent.
const CENTER_SPREAD: f64 = 0.2;

/// How the placement loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Proposals made, accepted or not.
    pub attempts: usize,
    pub target: usize,
    pub accepted: usize,
    /// True when the budget ran out before the target was reached.
    pub exhausted: bool,
}

/// A finished, immutable arrangement of shapes on a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    seed: u64,
    params: Params,
    resolved: ResolvedParams,
    width: u32,
    height: u32,
    scheme: ColorScheme,
    shapes: Vec<Shape>,
    report: PlacementReport,
}

impl Composition {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The clamped parameters the composition was generated from.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn resolved(&self) -> &ResolvedParams {
        &self.resolved
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    /// Shapes in paint order: all fills, then all strokes.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn report(&self) -> &PlacementReport {
        &self.report
    }
}

/// Rejects zero-sized canvases and pixel counts that overflow `usize`.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(EngineError::InvalidDimensions)?;
    Ok(())
}

/// Generates a composition for `seed` on a `width` x `height` canvas.
///
/// `params` is clamped first, so any value is accepted. The result is a
/// pure function of the inputs.
///
/// # Errors
///
/// Returns `EngineError::InvalidDimensions` if either dimension is zero.
pub fn generate(
    seed: u64,
    params: &Params,
    width: u32,
    height: u32,
) -> Result<Composition, EngineError> {
    validate_dimensions(width, height)?;

    let params = params.clamped();
    let scheme = params.color_scheme();
    let resolved = ResolvedParams::resolve(&params, scheme.len());
    let mut rng = SketchRng::new(seed);
    let mut policy = params.policy.build(resolved.blend, width, height);

    let placer = Placer::new(&params, &resolved, &scheme, width, height);
    let mut shapes = Vec::with_capacity(resolved.target_count);
    let mut attempts = 0;
    while attempts < MAX_ATTEMPTS && shapes.len() < resolved.target_count {
        attempts += 1;
        let candidate = placer.propose(&mut rng);
        if policy.accepts(&candidate, &shapes, &mut rng) {
            policy.on_accept(&candidate);
            shapes.push(candidate);
        }
    }

    let report = PlacementReport {
        attempts,
        target: resolved.target_count,
        accepted: shapes.len(),
        exhausted: shapes.len() < resolved.target_count,
    };
    if report.exhausted {
        log::debug!(
            "placement budget exhausted: {} of {} shapes after {} attempts (seed {seed}, policy {})",
            report.accepted,
            report.target,
            report.attempts,
            policy.name()
        );
    }

    assign_stroke_weights(&mut shapes, resolved.thick_probability, &mut rng);
    apply_layering(&mut shapes);

    log::debug!(
        "generated {} shapes on {width}x{height} (seed {seed}, {} attempts)",
        shapes.len(),
        attempts
    );

    Ok(Composition {
        seed,
        params,
        resolved,
        width,
        height,
        scheme,
        shapes,
        report,
    })
}

/// Candidate proposal state derived once per generation call.
struct Placer<'a> {
    params: &'a Params,
    resolved: &'a ResolvedParams,
    scheme: &'a ColorScheme,
    extent: DVec2,
    min_size: f64,
    max_size: f64,
}

impl<'a> Placer<'a> {
    fn new(
        params: &'a Params,
        resolved: &'a ResolvedParams,
        scheme: &'a ColorScheme,
        width: u32,
        height: u32,
    ) -> Self {
        let extent = DVec2::new(width as f64, height as f64);
        let short = extent.min_element();
        Self {
            params,
            resolved,
            scheme,
            extent,
            min_size: short * resolved.min_size_ratio,
            max_size: short * resolved.max_size_ratio,
        }
    }

    fn propose(&self, rng: &mut SketchRng) -> Shape {
        let r = self.resolved;
        let color = self.scheme.pick(&r.palette_weights, rng);
        let style = if rng.uniform01() < r.stroke_probability {
            Style::Stroke(StrokeWeight::Thin)
        } else {
            Style::Fill
        };
        let size = lerp(self.min_size, self.max_size, rng.uniform01().powf(SIZE_EXPONENT));

        let overflow = r.edge_overflow;
        let low = -size * overflow.negative;
        let uniform_x = rng.uniform(low, self.extent.x + size * overflow.positive);
        let uniform_y = rng.uniform(low, self.extent.y + size * overflow.positive);
        let gauss_x = rng.gaussian(self.extent.x * 0.5, self.extent.x * CENTER_SPREAD);
        let gauss_y = rng.gaussian(self.extent.y * 0.5, self.extent.y * CENTER_SPREAD);
        let position = DVec2::new(
            lerp(uniform_x, gauss_x, r.center_bias),
            lerp(uniform_y, gauss_y, r.center_bias),
        );

        let component = self.params.component.resolve(rng);
        let (flip_x_p, flip_y_p) = if component.is_mirror_symmetric() {
            (0.0, 0.0)
        } else {
            (r.flip_x_probability, r.flip_y_probability)
        };
        let flip_x = rng.uniform01() < flip_x_p;
        let flip_y = rng.uniform01() < flip_y_p;

        Shape {
            position,
            size,
            color,
            style,
            flip_x,
            flip_y,
            component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentSelection};
    use crate::policy::BalancePolicy;
    use crate::seed::DEFAULT_SEED;

    fn dense(blend: f64) -> Params {
        Params {
            amount: 100.0,
            blend,
            ..Params::default()
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            generate(1, &Params::default(), 0, 450),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(matches!(
            generate(1, &Params::default(), 800, 0),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn default_seed_with_zero_amount_places_one_palette_shape() {
        let c = generate(DEFAULT_SEED, &Params::default(), 800, 450).unwrap();
        assert_eq!(c.shapes().len(), 1);
        assert!(c.scheme().contains(c.shapes()[0].color));
        assert_eq!(c.report().attempts, 1);
        assert!(!c.report().exhausted);
    }

    #[test]
    fn dense_strict_composition_exhausts_budget() {
        let c = generate(DEFAULT_SEED, &dense(0.0), 800, 450).unwrap();
        let n = c.shapes().len();
        assert!((1..50).contains(&n), "placed {n} shapes");
        assert_eq!(c.report().attempts, MAX_ATTEMPTS);
        assert!(c.report().exhausted);
    }

    #[test]
    fn full_blend_reaches_target() {
        let c = generate(DEFAULT_SEED, &dense(100.0), 800, 450).unwrap();
        assert_eq!(c.shapes().len(), 50);
        assert_eq!(c.report().attempts, 50);
    }

    #[test]
    fn same_inputs_give_identical_compositions() {
        let params = Params {
            amount: 60.0,
            outline: 40.0,
            blend: 30.0,
            flip_x: 50.0,
            component: ComponentSelection::Mixed,
            ..Params::default()
        };
        let a = generate(77, &params, 640, 360).unwrap();
        let b = generate(77, &params, 640, 360).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.shapes().iter().zip(b.shapes()) {
            assert_eq!(x.position.x.to_bits(), y.position.x.to_bits());
            assert_eq!(x.size.to_bits(), y.size.to_bits());
        }
    }

    #[test]
    fn different_seeds_give_different_compositions() {
        let a = generate(1, &dense(100.0), 800, 450).unwrap();
        let b = generate(2, &dense(100.0), 800, 450).unwrap();
        assert_ne!(a.shapes(), b.shapes());
    }

    #[test]
    fn zero_blend_leaves_no_same_color_overlap_over_fills() {
        let params = Params {
            amount: 80.0,
            size: 30.0,
            outline: 30.0,
            ..Params::default()
        };
        for seed in 0..10 {
            let c = generate(seed, &params, 800, 450).unwrap();
            // Layering reorders, so compare across the whole list.
            let shapes = c.shapes();
            for (i, a) in shapes.iter().enumerate() {
                for b in &shapes[i + 1..] {
                    let both_filled = a.style.is_fill() && b.style.is_fill();
                    assert!(
                        !(both_filled && a.color == b.color && a.overlaps(b)),
                        "seed {seed}: same-color filled overlap"
                    );
                }
            }
        }
    }

    #[test]
    fn shapes_are_layered_fills_first() {
        let params = Params {
            amount: 100.0,
            outline: 50.0,
            blend: 100.0,
            ..Params::default()
        };
        let c = generate(5, &params, 800, 450).unwrap();
        let shapes = c.shapes();
        let first_stroke = shapes.iter().position(|s| s.style.is_stroke()).unwrap_or(shapes.len());
        assert!(shapes[first_stroke..].iter().all(|s| s.style.is_stroke()));
        assert!(first_stroke > 0 && first_stroke < shapes.len());
    }

    #[test]
    fn stroke_weights_match_weight_parameter() {
        let params = Params {
            amount: 100.0,
            outline: 100.0,
            blend: 100.0,
            weight: 30.0,
            ..Params::default()
        };
        let c = generate(11, &params, 800, 450).unwrap();
        let thick = c
            .shapes()
            .iter()
            .filter(|s| s.style == Style::Stroke(StrokeWeight::Thick))
            .count();
        assert_eq!(thick, 15);
    }

    #[test]
    fn sizes_stay_inside_resolved_range() {
        let params = Params {
            amount: 100.0,
            blend: 100.0,
            size: 20.0,
            spread: 10.0,
            ..Params::default()
        };
        let c = generate(3, &params, 1000, 400).unwrap();
        let r = c.resolved();
        for s in c.shapes() {
            assert!(s.size >= 400.0 * r.min_size_ratio - 1e-9);
            assert!(s.size <= 400.0 * r.max_size_ratio + 1e-9);
        }
    }

    #[test]
    fn symmetric_components_never_flip() {
        let params = Params {
            amount: 100.0,
            blend: 100.0,
            flip_x: 100.0,
            flip_y: 100.0,
            component: ComponentSelection::Single(Component::SmallTile),
            ..Params::default()
        };
        let c = generate(9, &params, 800, 450).unwrap();
        assert!(c.shapes().iter().all(|s| !s.flip_x && !s.flip_y));
    }

    #[test]
    fn asymmetric_components_flip_at_full_probability() {
        let params = Params {
            amount: 100.0,
            blend: 100.0,
            flip_x: 100.0,
            flip_y: 0.0,
            ..Params::default()
        };
        let c = generate(9, &params, 800, 450).unwrap();
        assert!(c.shapes().iter().all(|s| s.flip_x && !s.flip_y));
    }

    #[test]
    fn mixed_mode_uses_several_components() {
        let params = Params {
            amount: 100.0,
            blend: 100.0,
            component: ComponentSelection::Mixed,
            ..Params::default()
        };
        let c = generate(21, &params, 800, 450).unwrap();
        let mut seen: Vec<Component> = c.shapes().iter().map(|s| s.component).collect();
        seen.sort_by_key(|c| c.code());
        seen.dedup();
        assert!(seen.len() >= 3, "only {seen:?}");
    }

    #[test]
    fn single_mode_uses_one_component() {
        let params = Params {
            amount: 50.0,
            blend: 100.0,
            component: ComponentSelection::Single(Component::LargeSlice),
            ..Params::default()
        };
        let c = generate(21, &params, 800, 450).unwrap();
        assert!(c.shapes().iter().all(|s| s.component == Component::LargeSlice));
    }

    #[test]
    fn centroid_policy_is_deterministic_and_bounded() {
        let params = Params {
            amount: 100.0,
            blend: 50.0,
            policy: BalancePolicy::CentroidFeedback,
            ..Params::default()
        };
        let a = generate(4, &params, 800, 450).unwrap();
        let b = generate(4, &params, 800, 450).unwrap();
        assert_eq!(a, b);
        assert!(!a.shapes().is_empty());
        assert!(a.shapes().len() <= 50);
    }

    #[test]
    fn composition_params_are_clamped() {
        let params = Params {
            amount: 400.0,
            blend: 100.0,
            ..Params::default()
        };
        let c = generate(1, &params, 800, 450).unwrap();
        assert_eq!(c.params().amount, 100.0);
        assert_eq!(c.report().target, 50);
    }

    #[test]
    fn composition_serializes_to_json() {
        let c = generate(DEFAULT_SEED, &Params::default(), 800, 450).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["seed"], DEFAULT_SEED);
        assert_eq!(json["shapes"].as_array().unwrap().len(), 1);
        assert_eq!(json["report"]["attempts"], 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(24))]

            #[test]
            fn count_never_exceeds_target(
                seed: u64,
                amount in 0.0_f64..=100.0,
                blend in 0.0_f64..=100.0,
                outline in 0.0_f64..=100.0,
            ) {
                let params = Params { amount, blend, outline, ..Params::default() };
                let c = generate(seed, &params, 320, 180).unwrap();
                prop_assert!(c.shapes().len() <= c.report().target);
                prop_assert!(c.report().attempts <= MAX_ATTEMPTS);
                prop_assert!(!c.shapes().is_empty());
            }
        }
    }
}
