//! Interactive regeneration driven by explicit events.
//!
//! A [`Session`] owns the current seed, parameters and canvas size, and the
//! composition they produce. Every change goes through [`Session::apply`],
//! which regenerates from scratch; there is no incremental update.

use crate::compose::{generate, validate_dimensions, Composition};
use crate::error::EngineError;
use crate::params::Params;
use crate::prng::SketchRng;
use crate::seed::Seed;

/// A change to the session state.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamEvent {
    /// Replace the parameter set.
    SetParams(Params),
    /// Switch to another seed, keeping parameters.
    SetSeed(u64),
    /// Change the canvas size.
    Resize { width: u32, height: u32 },
    /// Restore default parameters. Palette and policy are kept.
    Reset,
    /// Draw a random parameter set from the session's own random stream.
    Randomize,
}

/// Current state plus the composition it generates.
#[derive(Debug, Clone)]
pub struct Session {
    seed: u64,
    params: Params,
    width: u32,
    height: u32,
    randomizer: SketchRng,
    composition: Composition,
}

impl Session {
    /// Starts a session and generates the first composition.
    ///
    /// The randomizer for [`ParamEvent::Randomize`] is seeded from the
    /// starting seed, so a replayed event sequence gives the same results.
    pub fn new(start: Seed, width: u32, height: u32) -> Result<Self, EngineError> {
        let composition = generate(start.seed, &start.params, width, height)?;
        Ok(Self {
            seed: start.seed,
            params: composition.params().clone(),
            width,
            height,
            randomizer: SketchRng::new(start.seed.rotate_left(17)),
            composition,
        })
    }

    /// Applies `event` and regenerates.
    ///
    /// On error the session is left unchanged.
    pub fn apply(&mut self, event: ParamEvent) -> Result<&Composition, EngineError> {
        let (mut seed, mut params, mut width, mut height) =
            (self.seed, self.params.clone(), self.width, self.height);
        match event {
            ParamEvent::SetParams(next) => params = next.clamped(),
            ParamEvent::SetSeed(next) => seed = next,
            ParamEvent::Resize {
                width: w,
                height: h,
            } => {
                validate_dimensions(w, h)?;
                width = w;
                height = h;
            }
            ParamEvent::Reset => {
                params = Params {
                    palette: params.palette,
                    policy: params.policy,
                    ..Params::default()
                };
            }
            ParamEvent::Randomize => params = params.randomized(&mut self.randomizer),
        }

        self.composition = generate(seed, &params, width, height)?;
        log::debug!(
            "session regenerated: seed {seed}, {} shapes",
            self.composition.shapes().len()
        );
        self.seed = seed;
        self.params = params;
        self.width = width;
        self.height = height;
        Ok(&self.composition)
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Share token for the current state.
    pub fn token(&self) -> Seed {
        Seed::new(self.seed, self.params.clone())
    }
}
