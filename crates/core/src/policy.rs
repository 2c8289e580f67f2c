//! Candidate acceptance policies for the placement loop.
//!
//! The compositor proposes a candidate and asks an [`AcceptancePolicy`]
//! whether to keep it. Policies may keep a running aggregate over accepted
//! shapes, updated through [`AcceptancePolicy::on_accept`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::prng::SketchRng;
use crate::shape::Shape;

/// Slack on the centroid distance, as a fraction of the short canvas edge.
pub const CENTROID_SLACK_RATIO: f64 = 0.02;

/// Decides whether a proposed shape joins the composition.
///
/// Implementations must be deterministic given the same candidates and RNG
/// state, and must consume RNG draws only in [`accepts`](Self::accepts).
pub trait AcceptancePolicy {
    /// Short identifier used in logs and share tokens.
    fn name(&self) -> &'static str;

    /// Returns true if `candidate` may be added after `accepted`.
    fn accepts(&mut self, candidate: &Shape, accepted: &[Shape], rng: &mut SketchRng) -> bool;

    /// Called once for every accepted shape, in acceptance order.
    fn on_accept(&mut self, _shape: &Shape) {}
}

/// Rejects a candidate that overlaps an earlier filled shape of the same
/// color, unless the blend override fires.
#[derive(Debug, Clone)]
pub struct SameColorOverlap {
    /// Probability in [0, 1] of tolerating a same-color overlap.
    blend: f64,
}

impl SameColorOverlap {
    pub fn new(blend: f64) -> Self {
        Self {
            blend: blend.clamp(0.0, 1.0),
        }
    }

    /// Overlap check followed by the blend override.
    ///
    /// The override only draws from `rng` when an overlap was found and the
    /// outcome is not already decided by a 0% or 100% blend.
    fn check(&self, candidate: &Shape, accepted: &[Shape], rng: &mut SketchRng) -> bool {
        let collides = accepted.iter().any(|s| {
            s.style.is_fill() && s.color == candidate.color && s.overlaps(candidate)
        });
        if !collides {
            return true;
        }
        let strictness = 1.0 - self.blend;
        if strictness >= 1.0 {
            return false;
        }
        if strictness <= 0.0 {
            return true;
        }
        rng.uniform01() >= strictness
    }
}

impl AcceptancePolicy for SameColorOverlap {
    fn name(&self) -> &'static str {
        "color_overlap"
    }

    fn accepts(&mut self, candidate: &Shape, accepted: &[Shape], rng: &mut SketchRng) -> bool {
        self.check(candidate, accepted, rng)
    }
}

/// Same-color rule plus visual balance: a candidate may not pull the
/// size²-weighted centroid of the composition noticeably further from the
/// canvas center.
#[derive(Debug, Clone)]
pub struct CentroidFeedback {
    color: SameColorOverlap,
    center: DVec2,
    slack: f64,
    weighted_sum: DVec2,
    total_weight: f64,
}

impl CentroidFeedback {
    pub fn new(blend: f64, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            color: SameColorOverlap::new(blend),
            center: DVec2::new(w * 0.5, h * 0.5),
            slack: w.min(h) * CENTROID_SLACK_RATIO,
            weighted_sum: DVec2::ZERO,
            total_weight: 0.0,
        }
    }

    /// Current weighted centroid, or `None` before the first acceptance.
    pub fn centroid(&self) -> Option<DVec2> {
        (self.total_weight > 0.0).then(|| self.weighted_sum / self.total_weight)
    }

    fn keeps_balance(&self, candidate: &Shape) -> bool {
        let Some(current) = self.centroid() else {
            return true;
        };
        let weight = candidate.area_weight();
        let next =
            (self.weighted_sum + candidate.position * weight) / (self.total_weight + weight);
        next.distance(self.center) <= current.distance(self.center) + self.slack
    }
}

impl AcceptancePolicy for CentroidFeedback {
    fn name(&self) -> &'static str {
        "centroid_feedback"
    }

    fn accepts(&mut self, candidate: &Shape, accepted: &[Shape], rng: &mut SketchRng) -> bool {
        self.color.check(candidate, accepted, rng) && self.keeps_balance(candidate)
    }

    fn on_accept(&mut self, shape: &Shape) {
        let weight = shape.area_weight();
        self.weighted_sum += shape.position * weight;
        self.total_weight += weight;
    }
}

/// Which acceptance policy a composition uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePolicy {
    #[default]
    ColorOverlap,
    CentroidFeedback,
}

impl BalancePolicy {
    pub const ALL: [BalancePolicy; 2] = [BalancePolicy::ColorOverlap, BalancePolicy::CentroidFeedback];

    pub fn name(self) -> &'static str {
        match self {
            BalancePolicy::ColorOverlap => "color_overlap",
            BalancePolicy::CentroidFeedback => "centroid_feedback",
        }
    }

    /// Two-letter code used in share tokens.
    pub fn code(self) -> &'static str {
        match self {
            BalancePolicy::ColorOverlap => "co",
            BalancePolicy::CentroidFeedback => "cf",
        }
    }

    /// Parses a policy by name or share-token code.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name || p.code() == name)
            .ok_or_else(|| EngineError::UnknownPolicy(name.to_string()))
    }

    pub fn list_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.name()).collect()
    }

    /// Builds a fresh policy instance for one generation call.
    pub fn build(self, blend: f64, width: u32, height: u32) -> Box<dyn AcceptancePolicy> {
        match self {
            BalancePolicy::ColorOverlap => Box::new(SameColorOverlap::new(blend)),
            BalancePolicy::CentroidFeedback => {
                Box::new(CentroidFeedback::new(blend, width, height))
            }
        }
    }
}
