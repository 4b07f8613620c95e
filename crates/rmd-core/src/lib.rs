//! rmd-core: Core game logic for the RMDVC engine
//!
//! This crate contains all game logic with no terminal dependencies.
//! It is designed to be pure and testable: the UI layer feeds commands in
//! and renders whatever state comes back.

pub mod action;
pub mod ai;
pub mod body;
pub mod map;

mod actor;
mod consts;
mod engine;
mod rng;

pub use actor::{Actor, ActorId, ActorMap, GlyphColor};
pub use consts::*;
pub use engine::{Engine, EngineMode, TickResult};
pub use rng::GameRng;
