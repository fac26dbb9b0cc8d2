//! Plain data shape used to store and exchange puzzles.

use crate::error::PuzzleError;
use crate::glyph;
use crate::policy::EditPolicy;
use crate::puzzle::Puzzle;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A puzzle as it appears in a file:
///
/// ```json
/// { "name": "Cellar", "rowTargets": [1, 0], "colTargets": [0, 1],
///   "tiles": [["m", "#"], ". ."] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleData {
    pub name: String,
    pub row_targets: Vec<usize>,
    pub col_targets: Vec<usize>,
    #[serde(default)]
    pub tiles: Vec<TileRow>,
}

/// One row of glyphs: either a list of symbols or a single string whose
/// grapheme clusters are the symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileRow {
    Glyphs(Vec<String>),
    Line(String),
}

impl TileRow {
    pub fn glyphs(&self) -> Vec<&str> {
        match self {
            TileRow::Glyphs(glyphs) => glyphs.iter().map(String::as_str).collect(),
            TileRow::Line(line) => glyph::glyphs(line).collect(),
        }
    }
}

impl PuzzleData {
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PuzzleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<P: EditPolicy> Puzzle<P> {
    /// Build a puzzle, resolving every glyph through the classifier.
    ///
    /// Targets are copied as they are; the grid takes its size from them.
    pub fn from_data(data: &PuzzleData) -> Result<Self, PuzzleError> {
        let tiles = data
            .tiles
            .iter()
            .map(|row| row.glyphs().into_iter().map(Tile::from_glyph).collect())
            .collect();
        debug!(name = %data.name, rows = data.tiles.len(), "loading puzzle data");
        Self::with_tiles(
            data.name.clone(),
            data.row_targets.clone(),
            data.col_targets.clone(),
            tiles,
        )
    }

    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        Self::from_data(&PuzzleData::from_json(json)?)
    }

    /// Snapshot of the puzzle; each tile is written as the glyph its author
    /// typed, or its ASCII fallback.
    pub fn to_data(&self) -> PuzzleData {
        PuzzleData {
            name: self.name().to_string(),
            row_targets: self.row_targets().to_vec(),
            col_targets: self.col_targets().to_vec(),
            tiles: self
                .tiles()
                .iter()
                .map(|row| TileRow::Glyphs(row.iter().map(|t| t.glyph().to_string()).collect()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::SolvablePuzzle;
    use crate::tile::TileKind;

    const CELLAR: &str = r##"{
        "name": "Cellar",
        "rowTargets": [1, 1],
        "colTargets": [0, 1, 1],
        "tiles": [["m", "#", " "], "🐍.-"]
    }"##;

    #[test]
    fn test_from_json_mixed_rows() {
        let puzzle = SolvablePuzzle::from_json(CELLAR).unwrap();
        assert_eq!(puzzle.name(), "Cellar");
        assert_eq!(puzzle.n_rows(), 2);
        assert_eq!(puzzle.n_cols(), 3);

        let kinds: Vec<TileKind> = puzzle.cells().map(|(_, t)| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TileKind::Monster,
                TileKind::Wall,
                TileKind::Floor,
                TileKind::Monster,
                TileKind::Floor,
                TileKind::Wall,
            ]
        );
        assert_eq!(puzzle.get_tile(1, 0).unwrap().pictographic(), "🐍");
        assert_eq!(puzzle.get_tile(0, 1).unwrap().ascii(), "#");
    }

    #[test]
    fn test_missing_cells_default_to_floor() {
        let data = PuzzleData {
            name: "sparse".to_string(),
            row_targets: vec![0, 0, 0],
            col_targets: vec![0, 0],
            tiles: vec![TileRow::Line("-".to_string())],
        };
        let puzzle = SolvablePuzzle::from_data(&data).unwrap();
        puzzle.assert_invariants();
        assert_eq!(puzzle.get_tile(0, 0).unwrap().kind(), TileKind::Wall);
        assert_eq!(puzzle.get_tile(0, 1).unwrap().kind(), TileKind::Floor);
        assert_eq!(puzzle.get_tile(2, 1).unwrap().kind(), TileKind::Floor);
    }

    #[test]
    fn test_tiles_key_optional() {
        let puzzle =
            SolvablePuzzle::from_json(r#"{"name":"e","rowTargets":[0],"colTargets":[0,0]}"#)
                .unwrap();
        assert_eq!(puzzle.n_cols(), 2);
    }

    #[test]
    fn test_malformed_json() {
        let err = SolvablePuzzle::from_json("{\"name\": 3}").unwrap_err();
        assert!(matches!(err, PuzzleError::Json(_)));
        assert!(err.to_string().starts_with("malformed puzzle data"));
    }

    #[test]
    fn test_to_data_keeps_typed_glyphs() {
        let puzzle = SolvablePuzzle::from_json(CELLAR).unwrap();
        let data = puzzle.to_data();
        assert_eq!(
            data.tiles[0],
            TileRow::Glyphs(vec!["m".into(), "#".into(), " ".into()])
        );
        assert_eq!(
            data.tiles[1],
            TileRow::Glyphs(vec!["🐍".into(), ".".into(), "-".into()])
        );

        let json = data.to_json_pretty().unwrap();
        assert!(json.contains("\"rowTargets\""));
        let reloaded = SolvablePuzzle::from_json(&json).unwrap();
        assert_eq!(reloaded.tiles(), puzzle.tiles());
    }
}
