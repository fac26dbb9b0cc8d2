//! Dungeon layout puzzle engine
//!
//! Players place walls on a grid so that every row and column holds the
//! target number of walls, every dead end holds a monster, and treasure sits
//! in a closed room. This crate provides the tile taxonomy, the glyph
//! resolver, the grid model with its edit policies, and the validator.

mod data;
mod error;
mod glyph;
mod policy;
mod puzzle;
mod region;
mod tile;
mod validate;

pub use data::{PuzzleData, TileRow};
pub use error::PuzzleError;
pub use glyph::{classify, glyphs, is_emoji};
pub use policy::{Authoring, EditPolicy, Solving};
pub use puzzle::{EditablePuzzle, Puzzle, SolvablePuzzle, Subscription, TargetMode, WallCounts};
pub use region::{Adjacent, Position, Region};
pub use tile::{DefaultGlyphs, DisplayForms, FloorStyle, GlyphSupport, Tile, TileKind};
pub use validate::{treasure_room, Check, Failure, Rules, Validator, Verdict};
