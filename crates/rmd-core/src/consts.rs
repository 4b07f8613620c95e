//! Engine-wide constants.

/// Demo map dimensions
pub const MAP_WIDTH: i32 = 80;
pub const MAP_HEIGHT: i32 = 43;

/// Baseline actor speed. An actor at NORMAL_SPEED executes an action of
/// cost c after exactly c time units.
pub const NORMAL_SPEED: u32 = 100;

/// Baseline action cost in time units
pub const NORMAL_COST: u32 = 100;

/// How far a brawler can spot its target
pub const SIGHT_RANGE: i32 = 10;

/// Blood loss is divided by this before draining hit points each turn
pub const BLEED_DIVISOR: f32 = 10.0;

/// Upper bound on retained message history
pub const MESSAGE_CAP: usize = 200;
