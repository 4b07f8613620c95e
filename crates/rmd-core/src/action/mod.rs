//! Commands, actions, and action scheduling.
//!
//! A [`Command`] is raw player intent from the UI. The engine turns intent
//! into [`Action`]s, which carry a time cost and go through the
//! [`scheduler`] so that fast actors act more often than slow ones.

pub mod scheduler;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::actor::ActorId;
use crate::consts::NORMAL_COST;

/// Player command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Wait,
    /// Debug command: tear a random part off the player's body.
    RemoveRandomPart,
    OpenBodyViewer,
    Save,
    Quit,
}

/// Movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Get the delta (dx, dy) for this direction
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Get the direction for the given deltas, or None if they do not
    /// name a cardinal step.
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Get the direction name as a string
    pub const fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

/// A scheduled unit of work for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: ActorId,
    pub kind: ActionKind,
}

impl Action {
    pub const fn new(actor: ActorId, kind: ActionKind) -> Self {
        Self { actor, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Move { dir: Direction },
    Melee { target: ActorId, dir: Direction },
    Idle,
}

impl ActionKind {
    /// Base time cost in time units, before speed scaling.
    pub const fn cost(&self) -> u32 {
        match self {
            ActionKind::Move { .. } => NORMAL_COST,
            ActionKind::Melee { .. } => NORMAL_COST,
            ActionKind::Idle => NORMAL_COST,
        }
    }
}

/// What executing an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub outcome: Outcome,
    /// Action to schedule in place of a blocked one, e.g. a move into an
    /// occupied tile turns into a melee attack on the blocker.
    pub alternative: Option<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Blocked,
}

impl ActionResult {
    pub const fn done() -> Self {
        Self {
            outcome: Outcome::Done,
            alternative: None,
        }
    }

    pub const fn blocked() -> Self {
        Self {
            outcome: Outcome::Blocked,
            alternative: None,
        }
    }

    pub const fn blocked_with(alternative: Action) -> Self {
        Self {
            outcome: Outcome::Blocked,
            alternative: Some(alternative),
        }
    }
}
