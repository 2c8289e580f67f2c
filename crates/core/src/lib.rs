#![deny(unsafe_code)]
//! Core types for facet, a seeded tile-composition generator.
//!
//! Provides the `SketchRng` random source, parameter curves (`resolve`),
//! `ColorScheme` palettes, tile `Component`s, acceptance policies, the
//! placement loop (`compose::generate`), share tokens (`Seed`) and the
//! event-driven `Session`.

pub mod color;
pub mod component;
pub mod compose;
pub mod error;
pub mod layering;
pub mod palette;
pub mod params;
pub mod policy;
pub mod prng;
pub mod resolve;
pub mod seed;
pub mod session;
pub mod shape;

pub use color::Srgb;
pub use component::{Component, ComponentSelection};
pub use compose::{generate, Composition, PlacementReport};
pub use error::EngineError;
pub use palette::ColorScheme;
pub use params::Params;
pub use policy::{AcceptancePolicy, BalancePolicy};
pub use prng::{SketchRng, Xorshift64};
pub use resolve::ResolvedParams;
pub use seed::{parse_seed, Seed, DEFAULT_SEED};
pub use session::{ParamEvent, Session};
pub use shape::{Shape, StrokeWeight, Style};
