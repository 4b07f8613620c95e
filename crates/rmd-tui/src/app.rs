//! Application state and main UI controller

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use rmd_core::action::Command;
use rmd_core::{Engine, EngineMode, TickResult, MAP_HEIGHT};

use crate::input::key_to_command;
use crate::theme::Theme;
use crate::widgets::{BodyViewer, BodyViewerWidget, MapWidget, MessagesWidget, StatusWidget};

/// UI mode - what the app is currently displaying/waiting for
#[derive(Debug, Clone)]
pub enum UiMode {
    /// Normal gameplay
    Game,
    /// Body viewer overlay
    BodyViewer,
    /// Showing help
    Help,
    /// Death screen with the cause
    Dead { cause: String },
}

/// Application state
pub struct App {
    /// Game state and turn loop
    engine: Engine,

    /// Current UI mode
    mode: UiMode,

    /// Body viewer overlay state
    viewer: BodyViewer,

    /// Color theme (adapts to light/dark terminal background)
    theme: Theme,

    /// Player name, kept for the death screen after the actor is gone
    player_name: String,

    /// Should quit
    should_quit: bool,
}

impl App {
    /// Create the application around an engine, fresh or loaded.
    pub fn new(engine: Engine, theme: Theme) -> Self {
        let player_name = engine.player_name();
        let mut app = Self {
            engine,
            mode: UiMode::Game,
            viewer: BodyViewer::new(),
            theme,
            player_name,
            should_quit: false,
        };
        // A game saved with the viewer open restores with it open.
        if app.engine.mode == EngineMode::Gui {
            app.open_viewer();
        }
        app
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle input event - returns a command if one should be executed
    pub fn handle_event(&mut self, event: Event) -> Option<Command> {
        if let Event::Key(key) = event {
            // Shift+Q bails out from anywhere.
            if key.code == KeyCode::Char('Q') && key.modifiers.contains(KeyModifiers::SHIFT) {
                self.should_quit = true;
                return None;
            }

            match &self.mode {
                UiMode::Game => self.handle_game_input(key),
                UiMode::BodyViewer => {
                    self.handle_viewer_input(key);
                    None
                }
                UiMode::Help => {
                    self.handle_help_input(key);
                    None
                }
                UiMode::Dead { .. } => {
                    self.handle_death_input(key);
                    None
                }
            }
        } else {
            None
        }
    }

    fn handle_game_input(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('?') => {
                self.mode = UiMode::Help;
                None
            }
            KeyCode::Esc => Some(Command::Quit),
            _ => key_to_command(key),
        }
    }

    fn handle_viewer_input(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.engine.exit_gui();
            self.mode = UiMode::Game;
            return;
        }
        let dest = self
            .engine
            .player()
            .and_then(|actor| actor.destructible.as_ref());
        if let Some(dest) = dest {
            self.viewer.handle_key(key, dest, &self.theme);
        }
    }

    fn handle_help_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('?') => {
                self.mode = UiMode::Game;
            }
            _ => {}
        }
    }

    fn handle_death_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Execute a command and update state
    pub fn execute(&mut self, command: Command) -> TickResult {
        self.engine.clear_messages();

        let result = self.engine.tick(command);

        // The engine flips into its overlay state when the viewer opens.
        if self.engine.mode == EngineMode::Gui && !matches!(self.mode, UiMode::BodyViewer) {
            self.open_viewer();
        }

        match &result {
            TickResult::PlayerDied(cause) => {
                self.mode = UiMode::Dead {
                    cause: cause.clone(),
                };
            }
            TickResult::Quit => {
                self.should_quit = true;
            }
            // The binary owns the save paths; play continues either way.
            TickResult::SaveRequested => {}
            TickResult::Continue => {}
        }

        result
    }

    fn open_viewer(&mut self) {
        let theme = self.theme;
        let dest = self
            .engine
            .player()
            .and_then(|actor| actor.destructible.as_ref());
        if let Some(dest) = dest {
            self.viewer.activate(dest, &theme);
        }
        self.mode = UiMode::BodyViewer;
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        // Layout: map at top, status in the middle, messages at the bottom
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(MAP_HEIGHT as u16 + 2), // Map + border
                Constraint::Length(2),                  // Status lines
                Constraint::Length(3),                  // Messages
            ])
            .split(frame.area());

        let map_widget = MapWidget::new(&self.engine.map, &self.engine.actors, &self.theme);
        frame.render_widget(map_widget, chunks[0]);

        let status_widget = StatusWidget::new(&self.engine, &self.theme);
        frame.render_widget(status_widget, chunks[1]);

        let messages_widget = MessagesWidget::new(&self.engine.message_history);
        frame.render_widget(messages_widget, chunks[2]);

        // Modal overlays based on mode (clone strings to avoid borrow conflicts)
        match self.mode.clone() {
            UiMode::Game => {}
            UiMode::BodyViewer => self.render_body_viewer(frame),
            UiMode::Help => self.render_help(frame),
            UiMode::Dead { cause } => self.render_death_screen(frame, &cause),
        }
    }

    /// Render the body viewer overlay
    fn render_body_viewer(&self, frame: &mut Frame) {
        let area = centered_rect(80, 85, frame.area());
        frame.render_widget(Clear, area);

        let widget = BodyViewerWidget::new(&self.viewer, &self.theme);
        frame.render_widget(widget, area);
    }

    /// Render the help overlay
    fn render_help(&self, frame: &mut Frame) {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let help_text = r#"Movement: arrow keys

Actions:
  .  or SPACE   wait a turn
  k             tear off a random body part
  l  or b       open the body viewer
  s             save the game
  q  or ESC     quit

Body viewer:
  Up/Down       move the selection
  Tab           switch between part and tissue browsers
  ESC           close the viewer

Press ESC or SPACE to close"#;

        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_accent));

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .style(Style::default().fg(self.theme.text));

        frame.render_widget(paragraph, area);
    }

    /// Render the death screen overlay
    fn render_death_screen(&self, frame: &mut Frame, cause: &str) {
        let area = centered_rect(50, 50, frame.area());
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            "  R.I.P.  ",
            Style::default().fg(self.theme.bad).bold(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.player_name.clone(),
            Style::default().fg(self.theme.text).bold(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("Cause: "),
            Span::styled(cause.to_string(), Style::default().fg(self.theme.bad)),
        ]));
        lines.push(Line::from(format!("Turns survived: {}", self.engine.turns)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press ESC to exit",
            Style::default().fg(self.theme.text_dim),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_danger));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use rmd_core::body::Body;

    use super::*;

    fn app() -> App {
        let body = Body::default_humanoid().unwrap();
        let engine = Engine::new_game(7, "Tester", body);
        App::new(engine, Theme::dark())
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Command> {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_arrow_key_maps_to_move() {
        let mut app = app();
        let command = press(&mut app, KeyCode::Up);
        assert!(matches!(
            command,
            Some(Command::Move(rmd_core::action::Direction::North))
        ));
    }

    #[test]
    fn test_viewer_opens_and_escape_closes() {
        let mut app = app();
        let result = app.execute(Command::OpenBodyViewer);
        assert_eq!(result, TickResult::Continue);
        assert!(matches!(app.mode, UiMode::BodyViewer));
        assert_eq!(app.engine().mode, EngineMode::Gui);
        assert!(!app.viewer.part_browser().is_empty());

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, UiMode::Game));
        assert_eq!(app.engine().mode, EngineMode::Game);
    }

    #[test]
    fn test_quit_command_sets_flag() {
        let mut app = app();
        let result = app.execute(Command::Quit);
        assert_eq!(result, TickResult::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_save_request_keeps_playing() {
        let mut app = app();
        let result = app.execute(Command::Save);
        assert_eq!(result, TickResult::SaveRequested);
        assert!(!app.should_quit());
        assert!(matches!(app.mode, UiMode::Game));
    }

    #[test]
    fn test_death_screen_waits_for_escape() {
        let mut app = app();
        app.mode = UiMode::Dead {
            cause: "Bled out from wounds.".to_string(),
        };
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }
}
