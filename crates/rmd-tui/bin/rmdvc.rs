//! RMDVC
//!
//! Main entry point: terminal setup, the event loop and save handling.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use rmd_core::body::Body;
use rmd_core::{Engine, GameRng, TickResult};
use rmd_save::{default_save_path, delete_save, load_game, save_game, save_game_compressed};
use rmd_tui::{App, Theme};

/// RMDVC - a small roguelike where every wound has an address
#[derive(Parser, Debug)]
#[command(name = "rmdvc")]
#[command(author, version, about = "RMDVC - hit something and look inside", long_about = None)]
struct Args {
    /// Player name
    #[arg(short = 'u', long = "name", default_value = "Adventurer")]
    name: String,

    /// World seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Body definition file; the bundled humanoid when omitted
    #[arg(short, long)]
    body: Option<PathBuf>,

    /// Resume from the save file instead of starting fresh
    #[arg(short, long)]
    load: bool,

    /// Save file path; the platform default for the player name when omitted
    #[arg(long = "save-file")]
    save_file: Option<PathBuf>,

    /// Gzip the save file
    #[arg(long)]
    compress: bool,

    /// Force the light terminal palette
    #[arg(long)]
    light: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !atty::is(atty::Stream::Stdout) {
        eprintln!("rmdvc needs an interactive terminal.");
        std::process::exit(1);
    }

    let save_path = match &args.save_file {
        Some(path) => path.clone(),
        None => default_save_path(&args.name),
    };

    let engine = if args.load {
        load_game(&save_path)?
    } else {
        let body = match &args.body {
            Some(path) => Body::load(path)?,
            None => Body::default_humanoid()?,
        };
        let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
        Engine::new_game(seed, &args.name, body)
    };

    let theme = if args.light {
        Theme::light()
    } else {
        Theme::detect()
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(engine, theme);

    // Main loop
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;

            if let Some(command) = app.handle_event(event) {
                match app.execute(command) {
                    TickResult::PlayerDied(_cause) => {
                        // Permadeath: the save dies with the player. The
                        // death screen stays up until dismissed.
                        let _ = delete_save(&save_path);
                    }
                    TickResult::Quit => break,
                    TickResult::SaveRequested => {
                        let saved = if args.compress {
                            save_game_compressed(app.engine(), &save_path)
                        } else {
                            save_game(app.engine(), &save_path)
                        };
                        match saved {
                            Ok(()) => {
                                let note = format!("Saved to {}.", save_path.display());
                                app.engine_mut().message(note);
                            }
                            Err(err) => {
                                app.engine_mut().message(format!("Save failed: {err}"));
                            }
                        }
                    }
                    TickResult::Continue => {}
                }
            }

            if app.should_quit() {
                break;
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
