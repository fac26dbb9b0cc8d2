mod app;
mod glyphs;
mod render;
mod theme;

use app::App;
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dungeon_core::Rules;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Dungeon layout puzzles in the terminal
#[derive(Parser, Debug)]
#[command(name = "dungeon", version, about)]
pub struct Args {
    /// Puzzle file (JSON) to open
    pub puzzle: Option<PathBuf>,
    /// Open the puzzle for authoring
    #[arg(long)]
    pub edit: bool,
    /// Only draw ASCII glyphs
    #[arg(long)]
    pub ascii: bool,
    /// Which checks count towards a solution
    #[arg(long, value_enum, default_value = "partial")]
    pub rules: RuleSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleSet {
    /// Wall counts and monsters
    Partial,
    /// Also treasure rooms and open areas
    Full,
}

impl From<RuleSet> for Rules {
    fn from(rules: RuleSet) -> Self {
        match rules {
            RuleSet::Partial => Rules::Partial,
            RuleSet::Full => Rules::Full,
        }
    }
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging() {
    let Some(dir) = dirs::data_local_dir() else {
        return;
    };
    let Ok(file) = File::create(dir.join("dungeon.log")) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

/// Put the terminal back before the panic message prints.
fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

/// Best effort: leave the alternate screen and raw mode, ignoring errors.
fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    let _ = stdout.flush();
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging();

    let mut app = App::new(&args).map_err(io::Error::other)?;

    // Setup terminal
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        tracing::error!(%e, "terminal error");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Only redraw after the puzzle or the view changed
        if app.take_redraw() {
            render::render(stdout, app)?;
            stdout.flush()?;
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Resize(_, _) => app.mark_dirty(),
                _ => {}
            }
        }

        // Tick the message timer
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
