use crate::glyphs::GlyphPolicy;
use crate::theme::Theme;
use crate::Args;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dungeon_core::{
    EditablePuzzle, Position, PuzzleData, PuzzleError, SolvablePuzzle, TargetMode, Tile,
    TileKind, Validator, Verdict, WallCounts,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};

/// Puzzle shown when nothing else could be loaded
const BUILTIN_PUZZLE: &str = r#"{
    "name": "Vault",
    "rowTargets": [6, 3, 3, 1, 6],
    "colTargets": [5, 2, 2, 2, 4, 4],
    "tiles": [
        "......",
        ".💎....",
        "......",
        ".....👾",
        "......"
    ]
}"#;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Solving,
    Authoring,
}

/// The puzzle being played or edited
pub enum Session {
    Solving(SolvablePuzzle),
    Authoring(EditablePuzzle),
}

impl Session {
    fn from_data(data: &PuzzleData, mode: Mode) -> Result<Self, PuzzleError> {
        Ok(match mode {
            Mode::Solving => Session::Solving(SolvablePuzzle::from_data(data)?),
            Mode::Authoring => Session::Authoring(EditablePuzzle::from_data(data)?),
        })
    }

    pub fn mode(&self) -> Mode {
        match self {
            Session::Solving(_) => Mode::Solving,
            Session::Authoring(_) => Mode::Authoring,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Session::Solving(p) => p.name(),
            Session::Authoring(p) => p.name(),
        }
    }

    pub fn n_rows(&self) -> usize {
        match self {
            Session::Solving(p) => p.n_rows(),
            Session::Authoring(p) => p.n_rows(),
        }
    }

    pub fn n_cols(&self) -> usize {
        match self {
            Session::Solving(p) => p.n_cols(),
            Session::Authoring(p) => p.n_cols(),
        }
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        match self {
            Session::Solving(p) => p.tile(pos),
            Session::Authoring(p) => p.tile(pos),
        }
    }

    pub fn row_targets(&self) -> &[usize] {
        match self {
            Session::Solving(p) => p.row_targets(),
            Session::Authoring(p) => p.row_targets(),
        }
    }

    pub fn col_targets(&self) -> &[usize] {
        match self {
            Session::Solving(p) => p.col_targets(),
            Session::Authoring(p) => p.col_targets(),
        }
    }

    pub fn count_walls(&self) -> WallCounts {
        match self {
            Session::Solving(p) => p.count_walls(),
            Session::Authoring(p) => p.count_walls(),
        }
    }

    fn check(&self, validator: &Validator) -> Verdict {
        match self {
            Session::Solving(p) => validator.is_solved(p),
            Session::Authoring(p) => validator.is_solved(p),
        }
    }

    fn to_data(&self) -> PuzzleData {
        match self {
            Session::Solving(p) => p.to_data(),
            Session::Authoring(p) => p.to_data(),
        }
    }

    fn set_tile(&mut self, pos: Position, tile: Tile) -> bool {
        let (row, col) = (pos.row as isize, pos.col as isize);
        match self {
            Session::Solving(p) => p.set_tile(row, col, tile),
            Session::Authoring(p) => p.set_tile(row, col, tile),
        }
    }

    fn subscribe(&mut self, dirty: &Rc<Cell<bool>>) {
        let dirty = Rc::clone(dirty);
        let callback = move || dirty.set(true);
        match self {
            Session::Solving(p) => p.subscribe(callback),
            Session::Authoring(p) => p.subscribe(callback),
        };
    }

    /// The same puzzle in the other mode
    fn toggled(&self) -> Self {
        match self {
            Session::Solving(p) => Session::Authoring(p.clone().into_editable()),
            Session::Authoring(p) => Session::Solving(p.clone().into_solvable()),
        }
    }
}

/// What gets written to the save file
#[derive(Debug, Serialize, Deserialize)]
struct SaveState {
    mode: Mode,
    puzzle: PuzzleData,
}

/// The main application state
pub struct App {
    pub session: Session,
    /// Currently selected cell position
    pub cursor: Position,
    pub validator: Validator,
    /// Color theme
    pub theme: Theme,
    pub glyphs: GlyphPolicy,
    /// Outcome of the last check
    pub verdict: Option<Verdict>,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Set by puzzle change notifications and by anything else on screen
    dirty: Rc<Cell<bool>>,
    save_path: PathBuf,
}

impl App {
    /// Open the puzzle named on the command line, else the saved game, else
    /// the built-in puzzle.
    pub fn new(args: &Args) -> Result<Self, PuzzleError> {
        let save_path = Self::save_path();
        let mut notice = None;

        let loaded = match &args.puzzle {
            Some(path) => match Self::read_puzzle(path) {
                Ok(data) => Some((data, Mode::Solving)),
                Err(err) => {
                    warn!(path = %path.display(), %err, "could not open puzzle");
                    notice = Some(format!("Could not open {}: {}", path.display(), err));
                    None
                }
            },
            None => Self::read_save(&save_path),
        };
        let (data, saved_mode) = match loaded {
            Some(found) => found,
            None => (PuzzleData::from_json(BUILTIN_PUZZLE)?, Mode::Solving),
        };
        let mode = if args.edit { Mode::Authoring } else { saved_mode };

        let session = match Session::from_data(&data, mode) {
            Ok(session) => session,
            Err(err) => {
                warn!(%err, "puzzle rejected, using the built-in one");
                notice = Some(format!("Invalid puzzle: {}", err));
                Session::from_data(&PuzzleData::from_json(BUILTIN_PUZZLE)?, mode)?
            }
        };

        let mut app = Self {
            session,
            cursor: Position::new(0, 0),
            validator: Validator::with_rules(args.rules.into()),
            theme: Theme::dark(),
            glyphs: GlyphPolicy::detect(args.ascii),
            verdict: None,
            message: None,
            message_timer: 0,
            dirty: Rc::new(Cell::new(true)),
            save_path,
        };
        app.session.subscribe(&app.dirty);
        info!(name = app.session.name(), mode = ?mode, "session started");
        if let Some(notice) = notice {
            app.show_message(&notice);
        }
        Ok(app)
    }

    fn read_puzzle(path: &Path) -> Result<PuzzleData, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        PuzzleData::from_json(&json).map_err(|e| e.to_string())
    }

    fn read_save(path: &Path) -> Option<(PuzzleData, Mode)> {
        let json = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<SaveState>(&json) {
            Ok(state) => Some((state.puzzle, state.mode)),
            Err(err) => {
                warn!(%err, "ignoring invalid save file");
                None
            }
        }
    }

    /// Whether the screen is out of date; clears the flag.
    pub fn take_redraw(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Advance the message timer
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
                self.mark_dirty();
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
        self.mark_dirty();
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Tab {
            self.toggle_mode();
            return AppAction::Continue;
        }
        match self.session.mode() {
            Mode::Solving => self.handle_solving_key(key),
            Mode::Authoring => self.handle_authoring_key(key),
        }
    }

    fn handle_solving_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            KeyCode::Char(' ') => {
                let tile = match self.current_kind() {
                    Some(TileKind::Wall) => Tile::floor(),
                    _ => Tile::wall(),
                };
                self.place(tile);
            }
            KeyCode::Char('x') => {
                let tile = match self.current_kind() {
                    Some(TileKind::MarkedFloor) => Tile::floor(),
                    _ => Tile::marked_floor(),
                };
                self.place(tile);
            }
            KeyCode::Char('u') => {
                if let Session::Solving(p) = &mut self.session {
                    p.unsolve();
                }
                self.verdict = None;
                self.show_message("Puzzle reset");
            }
            KeyCode::Char('U') => {
                if let Session::Solving(p) = &mut self.session {
                    p.unmark_floors();
                }
                self.show_message("Cleared marks");
            }
            KeyCode::Char('c') => self.check(),
            KeyCode::Char('s') => self.save_game(),
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                let name = self.theme.name;
                self.show_message(&format!("Theme: {}", name));
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_authoring_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => return AppAction::Quit,
                KeyCode::Char('s') => self.save_game(),
                KeyCode::Char('k') => self.check(),
                KeyCode::Char('r') => {
                    if let Session::Authoring(p) = &mut self.session {
                        p.recount_targets();
                    }
                    self.show_message("Targets recounted");
                }
                KeyCode::Up => self.resize(-1, 0),
                KeyCode::Down => self.resize(1, 0),
                KeyCode::Left => self.resize(0, -1),
                KeyCode::Right => self.resize(0, 1),
                _ => {}
            }
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Backspace | KeyCode::Delete => self.author(" "),
            KeyCode::Char(c) => self.author(&c.to_string()),
            _ => {}
        }
        AppAction::Continue
    }

    fn current_kind(&self) -> Option<TileKind> {
        self.session.tile(self.cursor).map(Tile::kind)
    }

    /// Write a tile at the cursor, reporting a refused edit
    fn place(&mut self, tile: Tile) {
        if !self.session.set_tile(self.cursor, tile) {
            self.show_message("That tile can't be changed");
        }
    }

    /// Put the typed glyph at the cursor and keep monsters on dead ends
    fn author(&mut self, symbol: &str) {
        let Session::Authoring(p) = &mut self.session else {
            return;
        };
        let (row, col) = (self.cursor.row as isize, self.cursor.col as isize);
        p.set_tile(row, col, Tile::from_glyph(symbol));
        p.update_monsters(row, col, 1, 1, Some(symbol));
    }

    fn resize(&mut self, d_rows: isize, d_cols: isize) {
        let Session::Authoring(p) = &mut self.session else {
            return;
        };
        match p.resize_by(d_rows, d_cols, TargetMode::Recount) {
            Ok(()) => {
                let size = format!("{}x{}", p.n_rows(), p.n_cols());
                self.move_cursor(0, 0);
                self.show_message(&format!("Size {}", size));
            }
            Err(err) => self.show_message(&err.to_string()),
        }
    }

    fn check(&mut self) {
        let verdict = self.session.check(&self.validator);
        info!(solved = verdict.solved, reason = %verdict.reason, "checked");
        let msg = if verdict.solved && verdict.is_partial() {
            let skipped: Vec<String> = verdict.unchecked.iter().map(|c| c.to_string()).collect();
            format!("{} ({} not checked)", verdict.reason, skipped.join(", "))
        } else {
            verdict.reason.clone()
        };
        if let Some(pos) = verdict.failure.as_ref().and_then(|f| f.position()) {
            self.cursor = pos;
        }
        self.verdict = Some(verdict);
        self.show_message(&msg);
    }

    fn toggle_mode(&mut self) {
        let session = self.session.toggled();
        self.session = session;
        self.session.subscribe(&self.dirty);
        self.verdict = None;
        let msg = match self.session.mode() {
            Mode::Solving => "Solving mode",
            Mode::Authoring => "Authoring mode",
        };
        self.show_message(msg);
    }

    fn move_cursor(&mut self, row_delta: isize, col_delta: isize) {
        let max_row = self.session.n_rows().saturating_sub(1) as isize;
        let max_col = self.session.n_cols().saturating_sub(1) as isize;
        let new_row = (self.cursor.row as isize + row_delta).clamp(0, max_row) as usize;
        let new_col = (self.cursor.col as isize + col_delta).clamp(0, max_col) as usize;
        self.cursor = Position::new(new_row, new_col);
        self.mark_dirty();
    }

    /// Get the save file path
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dungeon_save.json")
    }

    /// Save the current puzzle
    fn save_game(&mut self) {
        let state = SaveState {
            mode: self.session.mode(),
            puzzle: self.session.to_data(),
        };
        let written = serde_json::to_string_pretty(&state)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.save_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                info!(path = %self.save_path.display(), "game saved");
                self.show_message("Game saved");
            }
            Err(err) => {
                warn!(%err, "save failed");
                self.show_message("Failed to save");
            }
        }
    }
}
