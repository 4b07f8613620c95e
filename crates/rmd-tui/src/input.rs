//! Input handling - convert key events to commands
//!
//! Arrow keys move, everything else is a single letter.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rmd_core::action::{Command, Direction};

/// Convert a key event to a game command.
///
/// These are the bindings that map directly to a Command without extra
/// input. Overlay navigation (body viewer panes, help, the death screen)
/// is handled in app.rs.
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        // Arrow keys
        KeyCode::Up => Some(Command::Move(Direction::North)),
        KeyCode::Down => Some(Command::Move(Direction::South)),
        KeyCode::Left => Some(Command::Move(Direction::West)),
        KeyCode::Right => Some(Command::Move(Direction::East)),

        // Turn passing
        KeyCode::Char('.') => Some(Command::Wait),              // . : wait a turn
        KeyCode::Char(' ') => Some(Command::Wait),              // space : wait a turn

        // Body
        KeyCode::Char('l') => Some(Command::OpenBodyViewer),    // l : body viewer
        KeyCode::Char('b') => Some(Command::OpenBodyViewer),    // b : body viewer
        KeyCode::Char('k') => Some(Command::RemoveRandomPart),  // k : tear off a random part

        // Meta
        KeyCode::Char('s') => Some(Command::Save),              // s : save game
        KeyCode::Char('q') => Some(Command::Quit),              // q : quit

        _ => None,
    }
}
