//! Validation engine: decides whether a grid satisfies the win condition.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. wall counts match the row and column targets;
//! 2. every monster sits in a dead end and every dead end holds a monster;
//! 3. treasure rooms are closed 3x3 rooms with a single exit, and open 2x2
//!    floor areas only occur next to treasure.
//!
//! Check 3 only runs under [`Rules::Full`]. Under the default rules the
//! verdict lists it in [`Verdict::unchecked`], so a caller can tell that a
//! grid with a malformed treasure room or an open hall would be accepted.

use crate::policy::EditPolicy;
use crate::puzzle::{Puzzle, WallCounts};
use crate::region::Position;
use crate::tile::TileKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Which checks the validator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rules {
    /// Wall counts and monster placement only
    #[default]
    Partial,
    /// Also treasure rooms and open areas
    Full,
}

impl Rules {
    /// Checks this rule set skips
    pub fn unchecked(self) -> &'static [Check] {
        match self {
            Rules::Partial => &[Check::TreasureRooms, Check::OpenAreas],
            Rules::Full => &[],
        }
    }
}

/// The individual checks, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Check {
    WallCounts,
    Monsters,
    TreasureRooms,
    OpenAreas,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::WallCounts => write!(f, "wall counts"),
            Check::Monsters => write!(f, "monster placement"),
            Check::TreasureRooms => write!(f, "treasure rooms"),
            Check::OpenAreas => write!(f, "open areas"),
        }
    }
}

/// Why a grid is not solved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Failure {
    RowWalls { row: usize, found: usize, expected: usize },
    ColumnWalls { col: usize, found: usize, expected: usize },
    /// A monster outside a dead end
    StrayMonster { pos: Position },
    /// A dead end without a monster
    UnguardedDeadEnd { pos: Position },
    /// A treasure that isn't in a closed 3x3 room with one exit
    TreasureRoom { pos: Position },
    /// Top-left corner of a 2x2 block of floor with no treasure nearby
    OpenArea { pos: Position },
}

impl Failure {
    pub fn check(&self) -> Check {
        match self {
            Failure::RowWalls { .. } | Failure::ColumnWalls { .. } => Check::WallCounts,
            Failure::StrayMonster { .. } | Failure::UnguardedDeadEnd { .. } => Check::Monsters,
            Failure::TreasureRoom { .. } => Check::TreasureRooms,
            Failure::OpenArea { .. } => Check::OpenAreas,
        }
    }

    /// Cell the failure points at, if any
    pub fn position(&self) -> Option<Position> {
        match self {
            Failure::RowWalls { .. } | Failure::ColumnWalls { .. } => None,
            Failure::StrayMonster { pos }
            | Failure::UnguardedDeadEnd { pos }
            | Failure::TreasureRoom { pos }
            | Failure::OpenArea { pos } => Some(*pos),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::RowWalls { row, found, expected } => write!(
                f,
                "Row {} has {} walls but needs {}",
                row + 1,
                found,
                expected
            ),
            Failure::ColumnWalls { col, found, expected } => write!(
                f,
                "Column {} has {} walls but needs {}",
                col + 1,
                found,
                expected
            ),
            Failure::StrayMonster { pos } => {
                write!(f, "Monster at {} is not in a dead end", pos)
            }
            Failure::UnguardedDeadEnd { pos } => {
                write!(f, "Dead end at {} has no monster", pos)
            }
            Failure::TreasureRoom { pos } => write!(
                f,
                "Treasure at {} is not in a closed 3x3 room with one exit",
                pos
            ),
            Failure::OpenArea { pos } => {
                write!(f, "Open 2x2 area at {} is outside a treasure room", pos)
            }
        }
    }
}

/// Result of validating a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub solved: bool,
    /// Player-facing explanation
    pub reason: String,
    pub failure: Option<Failure>,
    /// Checks that were not run; a success only covers the others
    pub unchecked: Vec<Check>,
}

impl Verdict {
    fn success(rules: Rules) -> Self {
        Self {
            solved: true,
            reason: "Solved!".to_string(),
            failure: None,
            unchecked: rules.unchecked().to_vec(),
        }
    }

    fn failed(failure: Failure, rules: Rules) -> Self {
        Self {
            solved: false,
            reason: failure.to_string(),
            failure: Some(failure),
            unchecked: rules.unchecked().to_vec(),
        }
    }

    /// True when the verdict skipped some checks
    pub fn is_partial(&self) -> bool {
        !self.unchecked.is_empty()
    }
}

/// Validator. Stateless apart from its rule set; every call works on the
/// puzzle it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    rules: Rules,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Rules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Run the checks in order and report the first failure.
    pub fn is_solved<P: EditPolicy>(&self, puzzle: &Puzzle<P>) -> Verdict {
        let result = self
            .check_walls(puzzle)
            .and_then(|()| self.check_monsters(puzzle))
            .and_then(|()| match self.rules {
                Rules::Partial => Ok(()),
                Rules::Full => self
                    .check_treasure_rooms(puzzle)
                    .and_then(|()| self.check_open_areas(puzzle)),
            });

        let verdict = match result {
            Ok(()) => Verdict::success(self.rules),
            Err(failure) => Verdict::failed(failure, self.rules),
        };
        debug!(
            name = puzzle.name(),
            solved = verdict.solved,
            reason = %verdict.reason,
            rules = ?self.rules,
            "validated"
        );
        verdict
    }

    /// Check 1: every row and column has exactly its target number of walls.
    pub fn check_walls<P: EditPolicy>(&self, puzzle: &Puzzle<P>) -> Result<(), Failure> {
        let WallCounts { rows, cols } = puzzle.count_walls();
        for (row, (&found, &expected)) in rows.iter().zip(puzzle.row_targets()).enumerate() {
            if found != expected {
                return Err(Failure::RowWalls { row, found, expected });
            }
        }
        for (col, (&found, &expected)) in cols.iter().zip(puzzle.col_targets()).enumerate() {
            if found != expected {
                return Err(Failure::ColumnWalls { col, found, expected });
            }
        }
        Ok(())
    }

    /// Check 2: monsters and dead ends coincide exactly.
    pub fn check_monsters<P: EditPolicy>(&self, puzzle: &Puzzle<P>) -> Result<(), Failure> {
        for (pos, tile) in puzzle.cells() {
            let dead_end = puzzle.is_dead_end(pos.row as isize, pos.col as isize);
            if tile.is_monster() && !dead_end {
                return Err(Failure::StrayMonster { pos });
            }
            if dead_end && !tile.is_monster() {
                return Err(Failure::UnguardedDeadEnd { pos });
            }
        }
        Ok(())
    }

    /// Check 3a: every treasure lies in a closed 3x3 room.
    pub fn check_treasure_rooms<P: EditPolicy>(
        &self,
        puzzle: &Puzzle<P>,
    ) -> Result<(), Failure> {
        for (pos, tile) in puzzle.cells() {
            if tile.kind() == TileKind::Treasure && treasure_room(puzzle, pos).is_none() {
                return Err(Failure::TreasureRoom { pos });
            }
        }
        Ok(())
    }

    /// Check 3b: no 2x2 block of floor unless treasure is right next to it.
    pub fn check_open_areas<P: EditPolicy>(&self, puzzle: &Puzzle<P>) -> Result<(), Failure> {
        let rows = puzzle.n_rows().saturating_sub(1);
        let cols = puzzle.n_cols().saturating_sub(1);
        for (pos, _) in puzzle.region(0, 0, rows, cols) {
            let (row, col) = (pos.row as isize, pos.col as isize);
            let open = puzzle
                .region(row, col, 2, 2)
                .all(|(_, tile)| tile.kind().is_floor());
            if !open {
                continue;
            }
            let near_treasure = puzzle
                .region(row - 1, col - 1, 4, 4)
                .any(|(_, tile)| tile.kind() == TileKind::Treasure);
            if !near_treasure {
                return Err(Failure::OpenArea { pos });
            }
        }
        Ok(())
    }
}

/// Top-left corner of a 3x3 room holding the treasure at `pos`, if there is
/// one.
///
/// A room is a fully in-bounds 3x3 block holding this treasure and eight
/// floor cells, whose twelve bordering cells hold exactly one walkable cell
/// (the exit) and no monster.
pub fn treasure_room<P: EditPolicy>(puzzle: &Puzzle<P>, pos: Position) -> Option<Position> {
    let tops = pos.row.saturating_sub(2)..=pos.row;
    tops.flat_map(|top| (pos.col.saturating_sub(2)..=pos.col).map(move |left| (top, left)))
        .filter(|&(top, left)| top + 3 <= puzzle.n_rows() && left + 3 <= puzzle.n_cols())
        .find(|&(top, left)| is_room(puzzle, pos, top as isize, left as isize))
        .map(|(top, left)| Position::new(top, left))
}

fn is_room<P: EditPolicy>(
    puzzle: &Puzzle<P>,
    treasure: Position,
    top: isize,
    left: isize,
) -> bool {
    // one treasure per room
    let inside_open = puzzle
        .region(top, left, 3, 3)
        .all(|(cell, tile)| cell == treasure || tile.kind().is_floor());
    if !inside_open {
        return false;
    }
    let mut exits = 0;
    for (_, tile) in puzzle.adjacent(top, left, 3, 3) {
        if tile.is_monster() {
            return false;
        }
        if tile.is_walkable() {
            exits += 1;
        }
    }
    exits == 1
}
