//! Grid model: tiles, wall targets, bounds-checked edits and change
//! notification.

use crate::error::PuzzleError;
use crate::glyph;
use crate::policy::{Authoring, EditPolicy, Solving};
use crate::region::{Adjacent, Position, Region};
use crate::tile::{Tile, TileKind};
use crate::validate::{Validator, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Puzzle in solving mode: fixed tiles can't be edited.
pub type SolvablePuzzle = Puzzle<Solving>;

/// Puzzle in authoring mode: every cell can be edited and the grid resized.
pub type EditablePuzzle = Puzzle<Authoring>;

/// Number of walls in every row and every column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallCounts {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

/// What happens to the wall targets when the grid is resized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// Keep existing targets, padding new rows/columns with 0
    #[default]
    Keep,
    /// Replace all targets with the current wall counts
    Recount,
}

/// Handle returned by [`Puzzle::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback = Box<dyn FnMut()>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    callbacks: Vec<(Subscription, Callback)>,
}

impl Observers {
    fn subscribe(&mut self, callback: Callback) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    fn unsubscribe(&mut self, id: Subscription) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.callbacks {
            callback();
        }
    }
}

/// A rectangular dungeon grid plus its row and column wall targets.
///
/// `P` selects the edit-permission policy. Every externally called mutating
/// method fires the change notification exactly once; bulk operations write
/// through an internal setter and notify at the end.
pub struct Puzzle<P: EditPolicy = Solving> {
    name: String,
    row_targets: Vec<usize>,
    col_targets: Vec<usize>,
    tiles: Vec<Vec<Tile>>,
    observers: Observers,
    revision: u64,
    policy: PhantomData<P>,
}

/// Pad or truncate a tile grid to exactly `rows` x `cols`, new cells Floor.
fn fit(tiles: &mut Vec<Vec<Tile>>, rows: usize, cols: usize) {
    tiles.truncate(rows);
    for row in tiles.iter_mut() {
        row.resize_with(cols, Tile::floor);
    }
    tiles.resize_with(rows, || vec![Tile::floor(); cols]);
}

impl<P: EditPolicy> Puzzle<P> {
    /// Create an all-floor puzzle sized by the target lists
    pub fn new(
        name: impl Into<String>,
        row_targets: Vec<usize>,
        col_targets: Vec<usize>,
    ) -> Result<Self, PuzzleError> {
        Self::with_tiles(name, row_targets, col_targets, Vec::new())
    }

    /// Create a puzzle from an initial grid.
    ///
    /// The grid is sized by the target lists: missing cells become Floor and
    /// extra cells are dropped.
    pub fn with_tiles(
        name: impl Into<String>,
        row_targets: Vec<usize>,
        col_targets: Vec<usize>,
        mut tiles: Vec<Vec<Tile>>,
    ) -> Result<Self, PuzzleError> {
        let (rows, cols) = (row_targets.len(), col_targets.len());
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::InvalidDimension {
                rows: rows as isize,
                cols: cols as isize,
            });
        }
        fit(&mut tiles, rows, cols);

        let puzzle = Self {
            name: name.into(),
            row_targets,
            col_targets,
            tiles,
            observers: Observers::default(),
            revision: 0,
            policy: PhantomData,
        };
        puzzle.assert_invariants();
        debug!(name = %puzzle.name, rows, cols, mode = P::NAME, "puzzle created");
        Ok(puzzle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the edit policy ("solving" or "authoring")
    pub fn mode(&self) -> &'static str {
        P::NAME
    }

    pub fn n_rows(&self) -> usize {
        self.tiles.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_targets.len()
    }

    pub fn row_targets(&self) -> &[usize] {
        &self.row_targets
    }

    pub fn col_targets(&self) -> &[usize] {
        &self.col_targets
    }

    pub fn tiles(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    /// Incremented by every change notification
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn index(&self, row: isize, col: isize) -> Option<Position> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.n_rows() && col < self.n_cols()).then_some(Position::new(row, col))
    }

    /// The tile at (row, col), or `None` outside the grid
    pub fn get_tile(&self, row: isize, col: isize) -> Option<&Tile> {
        let pos = self.index(row, col)?;
        Some(&self.tiles[pos.row][pos.col])
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(pos.row)?.get(pos.col)
    }

    /// Whether the edit policy allows writing (row, col)
    pub fn can_edit(&self, row: isize, col: isize) -> bool {
        self.get_tile(row, col).is_some_and(P::may_edit)
    }

    /// Write a tile. Returns false, changing nothing, when the cell is out
    /// of bounds or the edit policy refuses it.
    pub fn set_tile(&mut self, row: isize, col: isize, tile: Tile) -> bool {
        let Some(pos) = self.index(row, col) else {
            return false;
        };
        if !P::may_edit(&self.tiles[pos.row][pos.col]) {
            debug!(%pos, occupant = %self.tiles[pos.row][pos.col].kind(), "edit refused");
            return false;
        }
        trace!(%pos, kind = %tile.kind(), "set tile");
        self.write(pos, tile);
        self.notify();
        true
    }

    /// Cells of the sub-rectangle at (row, col), clipped to the grid
    pub fn region(&self, row: isize, col: isize, height: usize, width: usize) -> Region<'_> {
        Region::new(&self.tiles, self.n_cols(), row, col, height, width)
    }

    /// Every cell, row-major
    pub fn cells(&self) -> Region<'_> {
        self.region(0, 0, self.n_rows(), self.n_cols())
    }

    /// Cells bordering the footprint at (row, col) on its four sides
    pub fn adjacent(&self, row: isize, col: isize, height: usize, width: usize) -> Adjacent<'_> {
        Adjacent::new(&self.tiles, self.n_cols(), row, col, height, width)
    }

    /// Orthogonal neighbours of a single cell
    pub fn neighbors(&self, row: isize, col: isize) -> Adjacent<'_> {
        self.adjacent(row, col, 1, 1)
    }

    /// Tally walls per row and per column in a single pass
    pub fn count_walls(&self) -> WallCounts {
        let mut counts = WallCounts {
            rows: vec![0; self.n_rows()],
            cols: vec![0; self.n_cols()],
        };
        for (pos, tile) in self.cells() {
            if tile.kind() == TileKind::Wall {
                counts.rows[pos.row] += 1;
                counts.cols[pos.col] += 1;
            }
        }
        counts
    }

    /// A dead end is a non-wall cell with exactly one walkable neighbour.
    pub fn is_dead_end(&self, row: isize, col: isize) -> bool {
        match self.get_tile(row, col) {
            Some(tile) if tile.is_walkable() => {}
            _ => return false,
        }
        self.neighbors(row, col)
            .filter(|(_, tile)| tile.is_walkable())
            .count()
            == 1
    }

    pub fn dead_ends(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells()
            .map(|(pos, _)| pos)
            .filter(move |pos| self.is_dead_end(pos.row as isize, pos.col as isize))
    }

    /// Check the grid with the default rules
    pub fn is_solved(&self) -> Verdict {
        Validator::new().is_solved(self)
    }

    /// Replace every non-fixed tile with plain floor, keeping monsters and
    /// treasure where they are.
    pub fn unsolve(&mut self) {
        for pos in self.positions() {
            if !self.tiles[pos.row][pos.col].is_fixed() {
                self.write(pos, Tile::floor());
            }
        }
        debug!(name = %self.name, "puzzle reset");
        self.notify();
    }

    /// Clear the player's scratch marks
    pub fn unmark_floors(&mut self) {
        for pos in self.positions() {
            if self.tiles[pos.row][pos.col].kind() == TileKind::MarkedFloor {
                self.write(pos, Tile::floor());
            }
        }
        self.notify();
    }

    /// Register a callback fired after every mutating call
    pub fn subscribe<F: FnMut() + 'static>(&mut self, callback: F) -> Subscription {
        self.observers.subscribe(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    /// Panic if the grid and target lists disagree on the dimensions.
    ///
    /// Such a mismatch can only come from a bug in this module.
    pub fn assert_invariants(&self) {
        assert_eq!(self.tiles.len(), self.row_targets.len(), "row count mismatch");
        for (row, tiles) in self.tiles.iter().enumerate() {
            assert_eq!(tiles.len(), self.col_targets.len(), "row {row} has wrong width");
        }
    }

    fn positions(&self) -> Vec<Position> {
        self.cells().map(|(pos, _)| pos).collect()
    }

    fn write(&mut self, pos: Position, tile: Tile) {
        self.tiles[pos.row][pos.col] = tile;
    }

    fn notify(&mut self) {
        self.revision += 1;
        self.observers.notify();
    }

    fn convert<Q: EditPolicy>(self) -> Puzzle<Q> {
        debug!(name = %self.name, from = P::NAME, to = Q::NAME, "switching edit mode");
        Puzzle {
            name: self.name,
            row_targets: self.row_targets,
            col_targets: self.col_targets,
            tiles: self.tiles,
            observers: self.observers,
            revision: self.revision,
            policy: PhantomData,
        }
    }
}

impl Puzzle<Solving> {
    /// Switch to authoring mode, keeping the grid, targets and observers
    pub fn into_editable(self) -> EditablePuzzle {
        self.convert()
    }
}

impl Puzzle<Authoring> {
    /// Switch to solving mode, keeping the grid, targets and observers
    pub fn into_solvable(self) -> SolvablePuzzle {
        self.convert()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.notify();
    }

    pub fn set_row_target(&mut self, row: usize, target: usize) -> bool {
        match self.row_targets.get_mut(row) {
            Some(slot) => {
                *slot = target;
                self.notify();
                true
            }
            None => false,
        }
    }

    pub fn set_col_target(&mut self, col: usize, target: usize) -> bool {
        match self.col_targets.get_mut(col) {
            Some(slot) => {
                *slot = target;
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Replace the targets with the current wall counts
    pub fn recount_targets(&mut self) {
        let WallCounts { rows, cols } = self.count_walls();
        self.row_targets = rows;
        self.col_targets = cols;
        self.notify();
    }

    /// Resize the grid, keeping overlapping cells and filling new ones with
    /// floor. Targets are padded/truncated or recounted per `targets`.
    pub fn set_size(
        &mut self,
        rows: usize,
        cols: usize,
        targets: TargetMode,
    ) -> Result<(), PuzzleError> {
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::InvalidDimension {
                rows: rows as isize,
                cols: cols as isize,
            });
        }
        fit(&mut self.tiles, rows, cols);
        // counting walls relies on the targets matching the grid
        self.row_targets.resize(rows, 0);
        self.col_targets.resize(cols, 0);
        if targets == TargetMode::Recount {
            let WallCounts { rows, cols } = self.count_walls();
            self.row_targets = rows;
            self.col_targets = cols;
        }
        self.assert_invariants();
        debug!(rows, cols, ?targets, "puzzle resized");
        self.notify();
        Ok(())
    }

    /// Grow or shrink by a signed number of rows and columns
    pub fn resize_by(
        &mut self,
        d_rows: isize,
        d_cols: isize,
        targets: TargetMode,
    ) -> Result<(), PuzzleError> {
        let rows = (self.n_rows() as isize).saturating_add(d_rows);
        let cols = (self.n_cols() as isize).saturating_add(d_cols);
        if rows < 1 || cols < 1 {
            return Err(PuzzleError::InvalidDimension { rows, cols });
        }
        self.set_size(rows as usize, cols as usize, targets)
    }

    /// Keep monsters in dead ends after an edit at the given footprint.
    ///
    /// Rescans the footprint and the cells around it: a dead end without a
    /// monster gets one (built from `glyph` when that names a monster), and
    /// a monster that is no longer in a dead end turns back into floor.
    /// Treasure is left alone. Returns the number of cells changed; fires one
    /// notification if that is non-zero.
    pub fn update_monsters(
        &mut self,
        row: isize,
        col: isize,
        height: usize,
        width: usize,
        glyph: Option<&str>,
    ) -> usize {
        let mut cells: Vec<Position> = self
            .region(row, col, height, width)
            .map(|(pos, _)| pos)
            .collect();
        cells.extend(self.adjacent(row, col, height, width).map(|(pos, _)| pos));

        let mut changed = 0;
        for pos in cells {
            let dead_end = self.is_dead_end(pos.row as isize, pos.col as isize);
            let (fixed, monster) = {
                let tile = &self.tiles[pos.row][pos.col];
                (tile.is_fixed(), tile.is_monster())
            };
            if dead_end && !fixed {
                self.write(pos, monster_tile(glyph));
                changed += 1;
            } else if !dead_end && monster {
                self.write(pos, Tile::floor());
                changed += 1;
            }
        }

        if changed > 0 {
            debug!(changed, "monsters updated");
            self.notify();
        }
        changed
    }
}

fn monster_tile(symbol: Option<&str>) -> Tile {
    match symbol {
        Some(symbol) if glyph::classify(symbol).is_monster() => Tile::from_glyph(symbol),
        _ => Tile::monster(),
    }
}

impl<P: EditPolicy> Clone for Puzzle<P> {
    /// Observers are not cloned: a clone is an independent snapshot.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            row_targets: self.row_targets.clone(),
            col_targets: self.col_targets.clone(),
            tiles: self.tiles.clone(),
            observers: Observers::default(),
            revision: self.revision,
            policy: PhantomData,
        }
    }
}

impl<P: EditPolicy> fmt::Debug for Puzzle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Puzzle")
            .field("name", &self.name)
            .field("mode", &P::NAME)
            .field("row_targets", &self.row_targets)
            .field("col_targets", &self.col_targets)
            .field("tiles", &self.tiles)
            .field("observers", &self.observers.callbacks.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl<P: EditPolicy> fmt::Display for Puzzle<P> {
    /// Column targets on top, row targets on the left, ASCII glyphs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for target in &self.col_targets {
            write!(f, " {}", target)?;
        }
        writeln!(f)?;
        for (target, row) in self.row_targets.iter().zip(&self.tiles) {
            write!(f, "{:>3}", target)?;
            for tile in row {
                write!(f, " {}", tile.ascii())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn floor_puzzle<P: EditPolicy>(rows: usize, cols: usize) -> Puzzle<P> {
        Puzzle::new("test", vec![0; rows], vec![0; cols]).unwrap()
    }

    fn counter<P: EditPolicy>(puzzle: &mut Puzzle<P>) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        puzzle.subscribe(move || seen.set(seen.get() + 1));
        count
    }

    #[test]
    fn test_new_fills_with_floor() {
        let puzzle: SolvablePuzzle = floor_puzzle(2, 3);
        assert_eq!(puzzle.n_rows(), 2);
        assert_eq!(puzzle.n_cols(), 3);
        assert!(puzzle.cells().all(|(_, t)| t.kind() == TileKind::Floor));
    }

    #[test]
    fn test_with_tiles_pads_and_truncates() {
        let tiles = vec![
            vec![Tile::wall()],
            vec![Tile::wall(), Tile::wall(), Tile::wall(), Tile::wall()],
            vec![Tile::wall()],
        ];
        let puzzle = SolvablePuzzle::with_tiles("t", vec![0, 0], vec![0, 0, 0], tiles).unwrap();
        puzzle.assert_invariants();
        assert_eq!(puzzle.get_tile(0, 0).unwrap().kind(), TileKind::Wall);
        assert_eq!(puzzle.get_tile(0, 1).unwrap().kind(), TileKind::Floor);
        assert_eq!(puzzle.get_tile(1, 2).unwrap().kind(), TileKind::Wall);
    }

    #[test]
    fn test_empty_targets_rejected() {
        let result = SolvablePuzzle::new("t", vec![], vec![1]);
        assert!(matches!(
            result,
            Err(PuzzleError::InvalidDimension { rows: 0, cols: 1 })
        ));
    }

    #[test]
    fn test_get_tile_bounds() {
        let puzzle: SolvablePuzzle = floor_puzzle(3, 4);
        assert!(puzzle.get_tile(-1, 0).is_none());
        assert!(puzzle.get_tile(3, 0).is_none());
        assert!(puzzle.get_tile(0, 4).is_none());
        assert!(puzzle.get_tile(0, -1).is_none());
        assert!(puzzle.get_tile(2, 3).is_some());
    }

    #[test]
    fn test_set_tile_out_of_bounds() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(2, 2);
        let count = counter(&mut puzzle);
        assert!(!puzzle.set_tile(2, 0, Tile::wall()));
        assert!(!puzzle.set_tile(0, -1, Tile::wall()));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_solving_policy_protects_monster() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(5, 5);
        puzzle.tiles[2][2] = Tile::monster();
        let count = counter(&mut puzzle);

        assert!(!puzzle.can_edit(2, 2));
        assert!(!puzzle.set_tile(2, 2, Tile::floor()));
        assert_eq!(puzzle.get_tile(2, 2).unwrap().kind(), TileKind::Monster);
        assert_eq!(count.get(), 0);

        assert!(puzzle.set_tile(2, 3, Tile::wall()));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_authoring_policy_edits_monster() {
        let mut puzzle: EditablePuzzle = floor_puzzle(5, 5);
        puzzle.tiles[2][2] = Tile::monster();
        assert!(puzzle.set_tile(2, 2, Tile::floor()));
        assert_eq!(puzzle.get_tile(2, 2).unwrap().kind(), TileKind::Floor);
    }

    #[test]
    fn test_count_walls() {
        let mut puzzle: EditablePuzzle = floor_puzzle(3, 3);
        for (r, c) in [(0, 0), (0, 1), (1, 0)] {
            puzzle.set_tile(r, c, Tile::wall());
        }
        let counts = puzzle.count_walls();
        assert_eq!(counts.rows, vec![2, 1, 0]);
        assert_eq!(counts.cols, vec![2, 1, 0]);
    }

    #[test]
    fn test_dead_end_corridor() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(1, 3);
        puzzle.set_tile(0, 2, Tile::wall());
        assert!(puzzle.is_dead_end(0, 0));
        assert!(puzzle.is_dead_end(0, 1));
        assert!(!puzzle.is_dead_end(0, 2));
        assert!(!puzzle.is_dead_end(0, 3));
        assert_eq!(
            puzzle.dead_ends().collect::<Vec<_>>(),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_isolated_cell_is_not_dead_end() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(3, 3);
        for (r, c) in [(0, 1), (1, 0), (1, 2), (2, 1)] {
            puzzle.set_tile(r, c, Tile::wall());
        }
        assert!(!puzzle.is_dead_end(1, 1));
    }

    #[test]
    fn test_unsolve_keeps_fixed_tiles_and_notifies_once() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(2, 3);
        puzzle.tiles[0][0] = Tile::monster();
        puzzle.tiles[1][2] = Tile::treasure();
        puzzle.set_tile(0, 1, Tile::wall());
        puzzle.set_tile(1, 1, Tile::marked_floor());
        puzzle.set_tile(1, 0, Tile::from_glyph("#"));

        let count = counter(&mut puzzle);
        puzzle.unsolve();
        assert_eq!(count.get(), 1);

        let kinds: Vec<TileKind> = puzzle.cells().map(|(_, t)| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TileKind::Monster,
                TileKind::Floor,
                TileKind::Floor,
                TileKind::Floor,
                TileKind::Floor,
                TileKind::Treasure,
            ]
        );

        let once = puzzle.tiles().to_vec();
        puzzle.unsolve();
        assert_eq!(puzzle.tiles(), once.as_slice());
    }

    #[test]
    fn test_unmark_floors_idempotent() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(2, 2);
        puzzle.set_tile(0, 0, Tile::marked_floor());
        puzzle.set_tile(1, 1, Tile::wall());
        let count = counter(&mut puzzle);

        puzzle.unmark_floors();
        let once = puzzle.tiles().to_vec();
        puzzle.unmark_floors();
        assert_eq!(puzzle.tiles(), once.as_slice());
        assert_eq!(count.get(), 2);
        assert_eq!(puzzle.get_tile(0, 0).unwrap().kind(), TileKind::Floor);
        assert_eq!(puzzle.get_tile(1, 1).unwrap().kind(), TileKind::Wall);
    }

    #[test]
    fn test_unsubscribe_and_revision() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(2, 2);
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let sub = puzzle.subscribe(move || seen.set(seen.get() + 1));

        puzzle.set_tile(0, 0, Tile::wall());
        assert!(puzzle.unsubscribe(sub));
        assert!(!puzzle.unsubscribe(sub));
        puzzle.set_tile(0, 1, Tile::wall());

        assert_eq!(count.get(), 1);
        assert_eq!(puzzle.revision(), 2);
    }

    #[test]
    fn test_set_size_preserves_overlap() {
        let mut puzzle: EditablePuzzle =
            Puzzle::new("t", vec![1, 2], vec![3, 4]).unwrap();
        puzzle.set_tile(1, 1, Tile::wall());
        let count = counter(&mut puzzle);

        puzzle.set_size(3, 1, TargetMode::Keep).unwrap();
        puzzle.assert_invariants();
        assert_eq!(puzzle.row_targets(), &[1, 2, 0]);
        assert_eq!(puzzle.col_targets(), &[3]);
        assert_eq!(count.get(), 1);

        puzzle.set_size(3, 3, TargetMode::Keep).unwrap();
        // (1, 1) was cut off and comes back as floor
        assert_eq!(puzzle.get_tile(1, 1).unwrap().kind(), TileKind::Floor);
        assert_eq!(puzzle.col_targets(), &[3, 0, 0]);
    }

    #[test]
    fn test_set_size_recount() {
        let mut puzzle: EditablePuzzle = floor_puzzle(2, 2);
        puzzle.set_tile(0, 0, Tile::wall());
        puzzle.set_tile(1, 0, Tile::wall());
        puzzle.set_size(2, 3, TargetMode::Recount).unwrap();
        assert_eq!(puzzle.row_targets(), &[1, 1]);
        assert_eq!(puzzle.col_targets(), &[2, 0, 0]);
    }

    #[test]
    fn test_recount_resize_shrink_and_grow() {
        let mut puzzle: EditablePuzzle = floor_puzzle(3, 3);
        puzzle.set_tile(0, 2, Tile::wall());
        puzzle.set_tile(2, 0, Tile::wall());
        puzzle.set_tile(1, 1, Tile::wall());

        puzzle.resize_by(0, -1, TargetMode::Recount).unwrap();
        puzzle.assert_invariants();
        assert_eq!((puzzle.n_rows(), puzzle.n_cols()), (3, 2));
        assert_eq!(puzzle.row_targets(), &[0, 1, 1]);
        assert_eq!(puzzle.col_targets(), &[1, 1]);

        puzzle.resize_by(-1, 0, TargetMode::Recount).unwrap();
        puzzle.assert_invariants();
        assert_eq!(puzzle.row_targets(), &[0, 1]);
        assert_eq!(puzzle.col_targets(), &[0, 1]);

        puzzle.resize_by(2, 3, TargetMode::Recount).unwrap();
        puzzle.assert_invariants();
        assert_eq!((puzzle.n_rows(), puzzle.n_cols()), (4, 5));
        assert_eq!(puzzle.row_targets(), &[0, 1, 0, 0]);
        assert_eq!(puzzle.col_targets(), &[0, 1, 0, 0, 0]);
        assert_eq!(puzzle.count_walls().rows.len(), 4);
    }

    #[test]
    fn test_invalid_resize_leaves_puzzle_untouched() {
        let mut puzzle: EditablePuzzle = floor_puzzle(2, 2);
        let count = counter(&mut puzzle);
        assert!(matches!(
            puzzle.set_size(0, 2, TargetMode::Keep),
            Err(PuzzleError::InvalidDimension { rows: 0, cols: 2 })
        ));
        assert!(matches!(
            puzzle.resize_by(0, -3, TargetMode::Keep),
            Err(PuzzleError::InvalidDimension { rows: 2, cols: -1 })
        ));
        assert_eq!((puzzle.n_rows(), puzzle.n_cols()), (2, 2));
        assert_eq!(count.get(), 0);

        puzzle.resize_by(1, -1, TargetMode::Keep).unwrap();
        assert_eq!((puzzle.n_rows(), puzzle.n_cols()), (3, 1));
    }

    #[test]
    fn test_set_targets() {
        let mut puzzle: EditablePuzzle = floor_puzzle(2, 2);
        assert!(puzzle.set_row_target(1, 2));
        assert!(puzzle.set_col_target(0, 1));
        assert!(!puzzle.set_col_target(2, 1));
        assert_eq!(puzzle.row_targets(), &[0, 2]);
        assert_eq!(puzzle.col_targets(), &[1, 0]);
    }

    #[test]
    fn test_update_monsters_places_and_removes() {
        // . . -
        let mut puzzle: EditablePuzzle = floor_puzzle(1, 3);
        puzzle.set_tile(0, 2, Tile::wall());
        let count = counter(&mut puzzle);

        let changed = puzzle.update_monsters(0, 2, 1, 1, Some("🐍"));
        assert_eq!(changed, 1);
        assert_eq!(count.get(), 1);
        let monster = puzzle.get_tile(0, 1).unwrap();
        assert_eq!(monster.kind(), TileKind::Monster);
        assert_eq!(monster.preferred(), Some("🐍"));

        // erasing the wall opens the corridor again
        puzzle.set_tile(0, 2, Tile::floor());
        let changed = puzzle.update_monsters(0, 2, 1, 1, None);
        assert_eq!(changed, 2);
        assert_eq!(puzzle.get_tile(0, 1).unwrap().kind(), TileKind::Floor);
        assert_eq!(puzzle.get_tile(0, 2).unwrap().kind(), TileKind::Monster);
    }

    #[test]
    fn test_update_monsters_spares_treasure() {
        let mut puzzle: EditablePuzzle = floor_puzzle(1, 2);
        puzzle.set_tile(0, 0, Tile::treasure());
        assert_eq!(puzzle.update_monsters(0, 0, 1, 1, None), 1);
        assert_eq!(puzzle.get_tile(0, 0).unwrap().kind(), TileKind::Treasure);
        assert_eq!(puzzle.get_tile(0, 1).unwrap().kind(), TileKind::Monster);
    }

    #[test]
    fn test_update_monsters_ignores_non_monster_glyph() {
        let mut puzzle: EditablePuzzle = floor_puzzle(1, 2);
        puzzle.update_monsters(0, 0, 1, 2, Some("#"));
        assert!(puzzle.cells().all(|(_, t)| t == &Tile::monster()));
    }

    #[test]
    fn test_mode_conversion_keeps_grid() {
        let mut puzzle: EditablePuzzle = floor_puzzle(2, 2);
        puzzle.set_tile(0, 0, Tile::monster());
        let mut solvable = puzzle.into_solvable();
        assert_eq!(solvable.mode(), "solving");
        assert!(!solvable.set_tile(0, 0, Tile::wall()));
        let editable = solvable.into_editable();
        assert_eq!(editable.get_tile(0, 0).unwrap().kind(), TileKind::Monster);
    }

    #[test]
    fn test_clone_drops_observers() {
        let mut puzzle: SolvablePuzzle = floor_puzzle(1, 1);
        let count = counter(&mut puzzle);
        let mut copy = puzzle.clone();
        copy.set_tile(0, 0, Tile::wall());
        assert_eq!(count.get(), 0);
        assert_eq!(puzzle.get_tile(0, 0).unwrap().kind(), TileKind::Floor);
    }

    #[test]
    fn test_display() {
        let mut puzzle: EditablePuzzle = Puzzle::new("t", vec![1, 0], vec![0, 1]).unwrap();
        puzzle.set_tile(0, 1, Tile::wall());
        assert_eq!(puzzle.to_string(), "    0 1\n  1 . -\n  0 . .\n");
    }
}
