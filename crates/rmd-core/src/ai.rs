//! Actor intelligence.
//!
//! AI variants are plain data so actors serialize cleanly; behavior lives
//! in the plan methods, which turn game state into the next [`Action`].

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind, Command, Direction};
use crate::actor::{Actor, ActorMap};
use crate::consts::SIGHT_RANGE;
use crate::map::Map;

/// Decision-making for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ai {
    Player(PlayerAi),
    Melee(MeleeAi),
}

impl Ai {
    pub const fn is_player(&self) -> bool {
        matches!(self, Ai::Player(_))
    }
}

/// The player's "AI" only translates commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerAi;

impl PlayerAi {
    /// Turn a command into an action, or None for commands that take no
    /// game time.
    pub fn plan(actor: &Actor, command: Command) -> Option<Action> {
        let kind = match command {
            Command::Move(dir) => ActionKind::Move { dir },
            Command::Wait => ActionKind::Idle,
            _ => return None,
        };
        Some(Action::new(actor.id, kind))
    }
}

/// Chases a visible target and attacks by bumping into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeleeAi {
    /// How far the actor can see, in tiles.
    pub sight_range: i32,
}

impl Default for MeleeAi {
    fn default() -> Self {
        Self {
            sight_range: SIGHT_RANGE,
        }
    }
}

impl MeleeAi {
    /// Plan the next action: step along the shortest open path toward a
    /// visible target, otherwise idle. Stepping into the target's tile is
    /// converted to a melee attack at execution time.
    pub fn plan(&self, actor: &Actor, target: &Actor, map: &Map, actors: &ActorMap) -> Action {
        let here = actor.pos;
        let there = target.pos;
        if here.distance(there) > self.sight_range || !map.line_of_sight(here, there) {
            return Action::new(actor.id, ActionKind::Idle);
        }
        let step = map.next_step_toward(here, there, |pos| {
            actors.occupant(pos).is_some_and(|id| id != target.id)
        });
        match step.and_then(|to| Direction::from_delta(to.x - here.x, to.y - here.y)) {
            Some(dir) => Action::new(actor.id, ActionKind::Move { dir }),
            None => Action::new(actor.id, ActionKind::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::GlyphColor;
    use crate::map::Pos;

    fn setup(player_at: Pos, brawler_at: Pos) -> (Map, ActorMap, Actor, Actor) {
        let map = Map::new(20, 20);
        let mut actors = ActorMap::new();
        let player = Actor::new("player", player_at, '@', GlyphColor::White)
            .with_ai(Ai::Player(PlayerAi));
        let brawler = Actor::new("brawler", brawler_at, '@', GlyphColor::Yellow)
            .with_ai(Ai::Melee(MeleeAi::default()));
        let pid = actors.add(player).unwrap();
        let bid = actors.add(brawler).unwrap();
        let player = actors.get(pid).unwrap().clone();
        let brawler = actors.get(bid).unwrap().clone();
        (map, actors, player, brawler)
    }

    #[test]
    fn test_player_plan_maps_movement() {
        let (_, _, player, _) = setup(Pos::new(5, 5), Pos::new(9, 5));
        let action = PlayerAi::plan(&player, Command::Move(Direction::East)).unwrap();
        assert_eq!(action.actor, player.id);
        assert_eq!(
            action.kind,
            ActionKind::Move {
                dir: Direction::East
            }
        );
        let wait = PlayerAi::plan(&player, Command::Wait).unwrap();
        assert_eq!(wait.kind, ActionKind::Idle);
    }

    #[test]
    fn test_player_plan_ignores_ui_commands() {
        let (_, _, player, _) = setup(Pos::new(5, 5), Pos::new(9, 5));
        assert!(PlayerAi::plan(&player, Command::Quit).is_none());
        assert!(PlayerAi::plan(&player, Command::Save).is_none());
        assert!(PlayerAi::plan(&player, Command::OpenBodyViewer).is_none());
        assert!(PlayerAi::plan(&player, Command::RemoveRandomPart).is_none());
    }

    #[test]
    fn test_melee_idles_when_target_out_of_range() {
        let (map, actors, player, brawler) = setup(Pos::new(1, 1), Pos::new(18, 18));
        let ai = MeleeAi::default();
        let action = ai.plan(&brawler, &player, &map, &actors);
        assert_eq!(action.kind, ActionKind::Idle);
    }

    #[test]
    fn test_melee_idles_without_line_of_sight() {
        let (mut map, actors, player, brawler) = setup(Pos::new(2, 5), Pos::new(8, 5));
        for y in 0..20 {
            map.set_wall(Pos::new(5, y));
        }
        let ai = MeleeAi::default();
        let action = ai.plan(&brawler, &player, &map, &actors);
        assert_eq!(action.kind, ActionKind::Idle);
    }

    #[test]
    fn test_melee_steps_toward_visible_target() {
        let (map, actors, player, brawler) = setup(Pos::new(2, 5), Pos::new(8, 5));
        let ai = MeleeAi::default();
        let action = ai.plan(&brawler, &player, &map, &actors);
        assert_eq!(
            action.kind,
            ActionKind::Move {
                dir: Direction::West
            }
        );
    }

    #[test]
    fn test_melee_bumps_into_adjacent_target() {
        let (map, actors, player, brawler) = setup(Pos::new(5, 5), Pos::new(6, 5));
        let ai = MeleeAi::default();
        let action = ai.plan(&brawler, &player, &map, &actors);
        // The planned step enters the target's tile; execution turns that
        // into an attack.
        assert_eq!(
            action.kind,
            ActionKind::Move {
                dir: Direction::West
            }
        );
    }

    #[test]
    fn test_melee_routes_around_other_actors() {
        let (map, mut actors, player, brawler) = setup(Pos::new(3, 5), Pos::new(7, 5));
        let blocker = Actor::new("blocker", Pos::new(6, 5), '@', GlyphColor::Grey);
        actors.add(blocker).unwrap();
        let ai = MeleeAi::default();
        let action = ai.plan(&brawler, &player, &map, &actors);
        match action.kind {
            ActionKind::Move { dir } => assert!(
                dir == Direction::North || dir == Direction::South,
                "expected a sidestep, got {dir:?}"
            ),
            other => panic!("expected a move, got {other:?}"),
        }
    }
}
