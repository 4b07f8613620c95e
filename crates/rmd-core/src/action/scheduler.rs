//! Time-ordered action queue.
//!
//! Every actor's next action is queued with a delay scaled by the actor's
//! speed. The queue stays sorted by time-to-execution; popping an entry
//! rebases the remaining delays so they are always relative to "now".

use serde::{Deserialize, Serialize};

use super::Action;
use crate::actor::ActorId;
use crate::consts::NORMAL_SPEED;

/// A queued action with its remaining delay in time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionQueueEntry {
    pub action: Action,
    /// Time units from now until the action fires.
    pub time_to_exec: u32,
    /// Entry belongs to the player. The engine drains the queue until no
    /// player entry is left.
    pub player: bool,
}

/// Delay for an action of the given cost performed at the given speed.
/// Never zero, so scheduling always advances time.
pub fn time_to_exec(cost: u32, speed: u32) -> u32 {
    debug_assert!(speed > 0);
    (cost * NORMAL_SPEED / speed.max(1)).max(1)
}

/// Sorted action queue. Equal delays keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionScheduler {
    queue: Vec<ActionQueueEntry>,
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queue an action for an actor of the given speed.
    pub fn schedule(&mut self, action: Action, speed: u32, player: bool) {
        let tte = time_to_exec(action.kind.cost(), speed);
        let at = self.queue.partition_point(|e| e.time_to_exec <= tte);
        self.queue.insert(
            at,
            ActionQueueEntry {
                action,
                time_to_exec: tte,
                player,
            },
        );
    }

    /// Pop the earliest entry and rebase the remaining delays to the new
    /// "now".
    pub fn next(&mut self) -> Option<ActionQueueEntry> {
        if self.queue.is_empty() {
            return None;
        }
        let entry = self.queue.remove(0);
        for later in &mut self.queue {
            later.time_to_exec -= entry.time_to_exec;
        }
        Some(entry)
    }

    pub fn player_action_scheduled(&self) -> bool {
        self.queue.iter().any(|e| e.player)
    }

    /// Whether the actor already has a queued entry.
    pub fn has_actor(&self, actor: ActorId) -> bool {
        self.queue.iter().any(|e| e.action.actor == actor)
    }

    /// Drop all entries belonging to an actor, e.g. on death.
    pub fn purge_actor(&mut self, actor: ActorId) {
        self.queue.retain(|e| e.action.actor != actor);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
