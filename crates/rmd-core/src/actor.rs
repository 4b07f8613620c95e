//! Actors and the actor map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::ai::Ai;
use crate::body::Destructible;
use crate::consts::NORMAL_SPEED;
use crate::map::Pos;

/// Stable handle to an actor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(pub u32);

/// Palette slot for an actor glyph. The UI theme picks the concrete
/// color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum GlyphColor {
    White,
    Yellow,
    Red,
    Green,
    Azure,
    Grey,
}

/// A creature on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub pos: Pos,
    pub glyph: char,
    pub color: GlyphColor,
    /// Time units gained per 100 elapsed; always positive.
    pub speed: u32,
    pub destructible: Option<Destructible>,
    pub ai: Option<Ai>,
}

impl Actor {
    /// New actor at normal speed. The id is assigned by [`ActorMap::add`].
    pub fn new(name: impl Into<String>, pos: Pos, glyph: char, color: GlyphColor) -> Self {
        Self {
            id: ActorId(0),
            name: name.into(),
            pos,
            glyph,
            color,
            speed: NORMAL_SPEED,
            destructible: None,
            ai: None,
        }
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed.max(1);
        self
    }

    pub fn with_destructible(mut self, destructible: Destructible) -> Self {
        self.destructible = Some(destructible);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.destructible.as_ref().is_none_or(|d| !d.is_dead())
    }
}

/// All actors in play, indexed by id, with a tile occupancy index.
///
/// Slots are never reused, so ids stay stable for the whole game. The
/// occupancy index always agrees with actor positions; one actor per
/// tile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ActorMapData", into = "ActorMapData")]
pub struct ActorMap {
    slots: Vec<Option<Actor>>,
    occupancy: HashMap<Pos, ActorId>,
}

/// Serialized form: the occupancy index is derived, not stored.
#[derive(Serialize, Deserialize)]
struct ActorMapData {
    slots: Vec<Option<Actor>>,
}

impl From<ActorMapData> for ActorMap {
    fn from(data: ActorMapData) -> Self {
        let occupancy = data
            .slots
            .iter()
            .flatten()
            .map(|a| (a.pos, a.id))
            .collect();
        Self {
            slots: data.slots,
            occupancy,
        }
    }
}

impl From<ActorMap> for ActorMapData {
    fn from(map: ActorMap) -> Self {
        Self { slots: map.slots }
    }
}

impl ActorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an actor, assigning its id. Refuses an occupied tile.
    pub fn add(&mut self, mut actor: Actor) -> Option<ActorId> {
        if self.occupancy.contains_key(&actor.pos) {
            return None;
        }
        let id = ActorId(self.slots.len() as u32);
        actor.id = id;
        self.occupancy.insert(actor.pos, id);
        self.slots.push(Some(actor));
        Some(id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.slots.get(id.0 as usize).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.slots.get_mut(id.0 as usize).and_then(|s| s.as_mut())
    }

    /// Remove an actor, freeing its tile.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.slots.get_mut(id.0 as usize).and_then(Option::take)?;
        self.occupancy.remove(&actor.pos);
        Some(actor)
    }

    pub fn occupant(&self, pos: Pos) -> Option<ActorId> {
        self.occupancy.get(&pos).copied()
    }

    /// Move an actor to a free tile. Terrain legality is the caller's
    /// business; the map only guards occupancy.
    pub fn move_actor(&mut self, id: ActorId, to: Pos) -> bool {
        if self.occupancy.get(&to).is_some_and(|o| *o != id) {
            return false;
        }
        let Some(actor) = self.slots.get_mut(id.0 as usize).and_then(|s| s.as_mut()) else {
            return false;
        };
        self.occupancy.remove(&actor.pos);
        actor.pos = to;
        self.occupancy.insert(to, id);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.slots.iter().flatten()
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.iter().map(|a| a.id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
