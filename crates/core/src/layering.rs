//! Post-placement passes: stroke weight assignment and fill/stroke layering.

use crate::prng::SketchRng;
use crate::shape::{Shape, Style, StrokeWeight};

/// Moves every filled shape before every stroked shape, keeping relative
/// order within each group.
pub fn apply_layering(shapes: &mut Vec<Shape>) {
    let (mut fills, strokes): (Vec<Shape>, Vec<Shape>) =
        shapes.drain(..).partition(|s| s.style.is_fill());
    fills.extend(strokes);
    *shapes = fills;
}

/// Marks exactly `round(n * thick_probability)` of the `n` stroked shapes as
/// thick, chosen by a seeded shuffle; the rest become thin.
///
/// Filled shapes are untouched and no shape changes position.
pub fn assign_stroke_weights(shapes: &mut [Shape], thick_probability: f64, rng: &mut SketchRng) {
    let mut strokes: Vec<usize> = shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| s.style.is_stroke())
        .map(|(i, _)| i)
        .collect();
    if strokes.is_empty() {
        return;
    }

    let p = thick_probability.clamp(0.0, 1.0);
    let thick = (strokes.len() as f64 * p).round() as usize;

    for i in (1..strokes.len()).rev() {
        let j = rng.below(i + 1);
        strokes.swap(i, j);
    }

    for (rank, &index) in strokes.iter().enumerate() {
        let weight = if rank < thick {
            StrokeWeight::Thick
        } else {
            StrokeWeight::Thin
        };
        shapes[index].style = Style::Stroke(weight);
    }
}
