//! Edit-permission policies.
//!
//! A puzzle is parameterised by its policy, so the solving and authoring
//! variants share the grid model and differ only in which cells may be
//! written.

use crate::tile::Tile;
use std::fmt::Debug;

/// Decides whether an in-bounds cell may be overwritten.
pub trait EditPolicy: Debug + Default + Clone + Copy + 'static {
    /// Short name used in logs and save files
    const NAME: &'static str;

    /// `occupant` is the tile currently in the cell.
    fn may_edit(occupant: &Tile) -> bool;
}

/// Solving mode: players toggle walls and marks but never move obstacles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Solving;

impl EditPolicy for Solving {
    const NAME: &'static str = "solving";

    fn may_edit(occupant: &Tile) -> bool {
        !occupant.is_fixed()
    }
}

/// Authoring mode: every cell is editable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Authoring;

impl EditPolicy for Authoring {
    const NAME: &'static str = "authoring";

    fn may_edit(_occupant: &Tile) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solving_refuses_fixed_tiles() {
        assert!(Solving::may_edit(&Tile::floor()));
        assert!(Solving::may_edit(&Tile::wall()));
        assert!(Solving::may_edit(&Tile::marked_floor()));
        assert!(!Solving::may_edit(&Tile::monster()));
        assert!(!Solving::may_edit(&Tile::boss_monster()));
        assert!(!Solving::may_edit(&Tile::treasure()));
    }

    #[test]
    fn test_authoring_allows_everything() {
        for tile in [Tile::floor(), Tile::wall(), Tile::monster(), Tile::treasure()] {
            assert!(Authoring::may_edit(&tile));
        }
    }
}
