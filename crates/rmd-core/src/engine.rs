//! The game engine: world state and the turn loop.

use serde::{Deserialize, Serialize};

use crate::action::scheduler::ActionScheduler;
use crate::action::{Action, ActionKind, ActionResult, Command, Direction};
use crate::actor::{Actor, ActorId, ActorMap, GlyphColor};
use crate::ai::{Ai, MeleeAi, PlayerAi};
use crate::body::{Body, Destructible};
use crate::consts::MESSAGE_CAP;
use crate::map::{Map, Pos};
use crate::rng::GameRng;

/// Starting hp for both the player and the brawler.
const START_HP: i32 = 100;

/// Result of an engine tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    /// Keep playing
    Continue,
    /// Player died, with cause
    PlayerDied(String),
    /// Player quit
    Quit,
    /// Save the game and keep playing
    SaveRequested,
}

/// Which layer owns input: the map or a full-screen overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineMode {
    Game,
    Gui,
}

/// Whole game state plus the turn loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub map: Map,
    pub actors: ActorMap,
    /// The player's actor id
    pub player: ActorId,
    pub scheduler: ActionScheduler,
    pub rng: GameRng,
    /// Completed player turns
    pub turns: u64,
    pub mode: EngineMode,
    /// Messages for the current turn
    #[serde(skip)]
    pub messages: Vec<String>,
    /// Bounded message history
    #[serde(skip)]
    pub message_history: Vec<String>,
}

impl Engine {
    /// Start a fresh game on the demo map: the player and one melee
    /// brawler, both with the given body.
    pub fn new_game(seed: u64, player_name: &str, body: Body) -> Self {
        let mut actors = ActorMap::new();
        let player = actors
            .add(
                Actor::new(player_name, Pos::new(40, 25), '@', GlyphColor::White)
                    .with_destructible(Destructible::new(START_HP).with_body(body.clone()))
                    .with_ai(Ai::Player(PlayerAi)),
            )
            .unwrap_or(ActorId(0));
        actors.add(
            Actor::new("brawler", Pos::new(60, 13), '@', GlyphColor::Yellow)
                .with_destructible(Destructible::new(START_HP).with_body(body))
                .with_ai(Ai::Melee(MeleeAi::default())),
        );

        let mut engine = Self {
            map: Map::demo(),
            actors,
            player,
            scheduler: ActionScheduler::new(),
            rng: GameRng::new(seed),
            turns: 0,
            mode: EngineMode::Game,
            messages: Vec::new(),
            message_history: Vec::new(),
        };
        engine.message(format!("Welcome, {player_name}."));
        engine
    }

    /// Add a message to display
    pub fn message(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.messages.push(msg.clone());
        self.message_history.push(msg);
        let overflow = self.message_history.len().saturating_sub(MESSAGE_CAP);
        if overflow > 0 {
            self.message_history.drain(..overflow);
        }
    }

    /// Clear messages
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.get(self.player)
    }

    pub fn player_name(&self) -> String {
        self.player().map(|a| a.name.clone()).unwrap_or_default()
    }

    pub fn enter_gui(&mut self) {
        self.mode = EngineMode::Gui;
    }

    pub fn exit_gui(&mut self) {
        self.mode = EngineMode::Game;
    }

    /// Advance the game by one player command.
    pub fn tick(&mut self, command: Command) -> TickResult {
        if self.mode == EngineMode::Gui {
            // Overlay input is the UI's business; the world stands still.
            return match command {
                Command::Quit => TickResult::Quit,
                _ => TickResult::Continue,
            };
        }

        match command {
            Command::Quit => return TickResult::Quit,
            Command::Save => return TickResult::SaveRequested,
            Command::OpenBodyViewer => {
                self.enter_gui();
                return TickResult::Continue;
            }
            Command::RemoveRandomPart => {
                self.debug_remove_random_part();
                return TickResult::Continue;
            }
            Command::Move(_) | Command::Wait => {}
        }

        let Some(player) = self.player() else {
            return TickResult::PlayerDied("Already gone.".to_string());
        };
        let Some(action) = PlayerAi::plan(player, command) else {
            return TickResult::Continue;
        };
        let speed = player.speed;
        self.scheduler.schedule(action, speed, true);
        self.plan_idle_actors();

        if let Some(result) = self.drain_until_player_acted() {
            return result;
        }
        if let Some(result) = self.end_of_turn() {
            return result;
        }
        TickResult::Continue
    }

    /// Queue an action for every living AI actor that has none pending.
    fn plan_idle_actors(&mut self) {
        for id in self.actors.ids() {
            if id == self.player || self.scheduler.has_actor(id) {
                continue;
            }
            self.replan(id);
        }
    }

    fn replan(&mut self, actor_id: ActorId) {
        let Some(actor) = self.actors.get(actor_id) else {
            return;
        };
        if !actor.is_alive() {
            return;
        }
        let Some(Ai::Melee(ai)) = actor.ai else {
            return;
        };
        let Some(target) = self.player() else {
            return;
        };
        let action = ai.plan(actor, target, &self.map, &self.actors);
        let speed = actor.speed;
        self.scheduler.schedule(action, speed, false);
    }

    /// Run queued actions until the player's entry has executed. Fast
    /// actors get several actions per player turn, slow ones keep their
    /// entries queued across turns.
    fn drain_until_player_acted(&mut self) -> Option<TickResult> {
        while self.scheduler.player_action_scheduled() {
            let Some(entry) = self.scheduler.next() else {
                break;
            };
            let actor_id = entry.action.actor;
            if self.actors.get(actor_id).is_none_or(|a| !a.is_alive()) {
                continue;
            }
            let result = self.execute(entry.action);
            if let Some(alternative) = result.alternative {
                if let Some(actor) = self.actors.get(alternative.actor) {
                    let speed = actor.speed;
                    self.scheduler.schedule(alternative, speed, entry.player);
                }
            } else if !entry.player {
                self.replan(actor_id);
            }
            if let Some(died) = self.reap("Struck down in combat.") {
                return Some(died);
            }
        }
        None
    }

    fn execute(&mut self, action: Action) -> ActionResult {
        match action.kind {
            ActionKind::Idle => ActionResult::done(),
            ActionKind::Move { dir } => self.execute_move(action.actor, dir),
            ActionKind::Melee { target, .. } => self.execute_melee(action.actor, target),
        }
    }

    fn execute_move(&mut self, actor_id: ActorId, dir: Direction) -> ActionResult {
        let Some(actor) = self.actors.get(actor_id) else {
            return ActionResult::blocked();
        };
        let (dx, dy) = dir.delta();
        let dest = actor.pos.offset(dx, dy);
        if !self.map.is_walkable(dest) {
            if actor_id == self.player {
                self.message("You bump into a wall.");
            }
            return ActionResult::blocked();
        }
        if let Some(occupant) = self.actors.occupant(dest) {
            if occupant != actor_id {
                // Bumping into someone is an attack.
                return ActionResult::blocked_with(Action::new(
                    actor_id,
                    ActionKind::Melee {
                        target: occupant,
                        dir,
                    },
                ));
            }
        }
        self.actors.move_actor(actor_id, dest);
        ActionResult::done()
    }

    fn execute_melee(&mut self, attacker_id: ActorId, target_id: ActorId) -> ActionResult {
        let Some(attacker) = self.actors.get(attacker_id) else {
            return ActionResult::blocked();
        };
        let Some(target) = self.actors.get(target_id) else {
            return ActionResult::blocked();
        };
        // The target may have stepped away since the attack was queued.
        if !attacker.pos.is_adjacent(target.pos) {
            return ActionResult::blocked();
        }
        let attacker_name = attacker.name.clone();
        let target_name = target.name.clone();
        let energy = self.rng.dice(3, 6) as f32;

        let rng = &mut self.rng;
        let report = self
            .actors
            .get_mut(target_id)
            .and_then(|t| t.destructible.as_mut())
            .and_then(|d| d.apply_hit(energy, rng));

        match report {
            Some(report) => {
                self.message(format!(
                    "{} hits {}'s {} ({}).",
                    attacker_name,
                    target_name,
                    report.organ.to_lowercase(),
                    report.layer
                ));
                for name in &report.severed {
                    self.message(format!(
                        "{}'s {} is destroyed!",
                        target_name,
                        name.to_lowercase()
                    ));
                }
                if report.fatal {
                    self.message("The blow destroys a vital organ!");
                }
            }
            None => {
                self.message(format!("{attacker_name} hits {target_name}."));
            }
        }
        ActionResult::done()
    }

    /// Remove dead actors from play. Returns the tick result when the
    /// player is among them.
    fn reap(&mut self, cause: &str) -> Option<TickResult> {
        let dead: Vec<ActorId> = self
            .actors
            .iter()
            .filter(|a| !a.is_alive())
            .map(|a| a.id)
            .collect();
        let mut player_died = None;
        for id in dead {
            self.scheduler.purge_actor(id);
            if let Some(actor) = self.actors.remove(id) {
                self.message(format!("{} dies.", actor.name));
                if id == self.player {
                    player_died = Some(TickResult::PlayerDied(cause.to_string()));
                }
            }
        }
        player_died
    }

    /// Per-turn upkeep after the player has acted.
    fn end_of_turn(&mut self) -> Option<TickResult> {
        for id in self.actors.ids() {
            if let Some(d) = self
                .actors
                .get_mut(id)
                .and_then(|a| a.destructible.as_mut())
            {
                d.bleed_tick();
            }
        }
        self.turns += 1;
        self.reap("Bled out from wounds.")
    }

    fn debug_remove_random_part(&mut self) {
        let rng = &mut self.rng;
        let removed = match self
            .actors
            .get_mut(self.player)
            .and_then(|a| a.destructible.as_mut())
        {
            Some(d) => d.remove_random_part(rng),
            None => Vec::new(),
        };
        if removed.is_empty() {
            self.message("Nothing happens.");
        } else {
            for name in removed {
                self.message(format!("Your {} is gone!", name.to_lowercase()));
            }
        }
    }
}
