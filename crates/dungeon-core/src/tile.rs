//! Tile taxonomy: the closed set of tile kinds, their capability flags and
//! the per-instance display hints.

use crate::glyph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a tile. Validation only ever looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
    MarkedFloor,
    Treasure,
    Monster,
    BossMonster,
}

/// Default ASCII and pictographic forms of a tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultGlyphs {
    /// URI-safe plain ASCII symbol
    pub ascii: &'static str,
    /// Square (double-width) pictograph
    pub pictographic: &'static str,
}

/// Indexed by `TileKind as usize`.
const DEFAULT_GLYPHS: [DefaultGlyphs; 6] = [
    DefaultGlyphs { ascii: ".", pictographic: "⬜" },
    DefaultGlyphs { ascii: "-", pictographic: "🧱" },
    DefaultGlyphs { ascii: "x", pictographic: "❌" },
    DefaultGlyphs { ascii: "t", pictographic: "💎" },
    DefaultGlyphs { ascii: "m", pictographic: "👾" },
    DefaultGlyphs { ascii: "M", pictographic: "🐉" },
];

impl TileKind {
    /// Every kind, in declaration order
    pub const ALL: [TileKind; 6] = [
        TileKind::Floor,
        TileKind::Wall,
        TileKind::MarkedFloor,
        TileKind::Treasure,
        TileKind::Monster,
        TileKind::BossMonster,
    ];

    /// Everything except walls can be walked on.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    /// Fixed tiles are obstacles placed by the author; a player can't move them.
    pub const fn is_fixed(self) -> bool {
        matches!(
            self,
            TileKind::Treasure | TileKind::Monster | TileKind::BossMonster
        )
    }

    /// Solvable tiles are the ones a player toggles while solving.
    pub const fn is_solvable(self) -> bool {
        !self.is_fixed()
    }

    /// Monster or boss monster
    pub const fn is_monster(self) -> bool {
        matches!(self, TileKind::Monster | TileKind::BossMonster)
    }

    /// Open floor, marked or not
    pub const fn is_floor(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::MarkedFloor)
    }

    pub const fn default_glyphs(self) -> DefaultGlyphs {
        DEFAULT_GLYPHS[self as usize]
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Floor => write!(f, "Floor"),
            TileKind::Wall => write!(f, "Wall"),
            TileKind::MarkedFloor => write!(f, "Marked Floor"),
            TileKind::Treasure => write!(f, "Treasure"),
            TileKind::Monster => write!(f, "Monster"),
            TileKind::BossMonster => write!(f, "Boss Monster"),
        }
    }
}

/// Cosmetic specialisation of floor tiles. Has no effect on validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FloorStyle {
    #[default]
    Plain,
    Room,
    Hall,
}

/// Decides whether a glyph can actually be shown on some output surface.
///
/// Implemented by rendering front-ends; the core never decides displayability.
pub trait GlyphSupport {
    fn can_display(&self, glyph: &str) -> bool;
}

impl<F: Fn(&str) -> bool> GlyphSupport for F {
    fn can_display(&self, glyph: &str) -> bool {
        self(glyph)
    }
}

/// The three display candidates of a tile, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayForms<'a> {
    pub preferred: Option<&'a str>,
    pub pictographic: &'a str,
    pub ascii: &'a str,
}

/// A single grid cell: a kind plus display hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    kind: TileKind,
    style: FloorStyle,
    ascii: String,
    pictographic: String,
    preferred: Option<String>,
}

impl Default for Tile {
    fn default() -> Self {
        Self::floor()
    }
}

impl Tile {
    /// Create a tile with the kind's default glyphs
    pub fn new(kind: TileKind) -> Self {
        let glyphs = kind.default_glyphs();
        Self {
            kind,
            style: FloorStyle::Plain,
            ascii: glyphs.ascii.to_string(),
            pictographic: glyphs.pictographic.to_string(),
            preferred: None,
        }
    }

    /// Classify `symbol` and remember it as this tile's display hint
    pub fn from_glyph(symbol: &str) -> Self {
        Self::new(glyph::classify(symbol)).with_glyph(symbol)
    }

    pub fn floor() -> Self {
        Self::new(TileKind::Floor)
    }

    pub fn room_floor() -> Self {
        Self::floor().with_style(FloorStyle::Room)
    }

    pub fn hall_floor() -> Self {
        Self::floor().with_style(FloorStyle::Hall)
    }

    pub fn wall() -> Self {
        Self::new(TileKind::Wall)
    }

    pub fn marked_floor() -> Self {
        Self::new(TileKind::MarkedFloor)
    }

    pub fn treasure() -> Self {
        Self::new(TileKind::Treasure)
    }

    pub fn monster() -> Self {
        Self::new(TileKind::Monster)
    }

    pub fn boss_monster() -> Self {
        Self::new(TileKind::BossMonster)
    }

    /// Set the floor style. Ignored for anything that isn't plain floor.
    pub fn with_style(mut self, style: FloorStyle) -> Self {
        if self.kind == TileKind::Floor {
            self.style = style;
        }
        self
    }

    pub fn with_glyph(mut self, symbol: &str) -> Self {
        self.set_glyph(symbol);
        self
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn style(&self) -> FloorStyle {
        self.style
    }

    pub fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }

    pub fn is_fixed(&self) -> bool {
        self.kind.is_fixed()
    }

    pub fn is_solvable(&self) -> bool {
        self.kind.is_solvable()
    }

    pub fn is_monster(&self) -> bool {
        self.kind.is_monster()
    }

    pub fn ascii(&self) -> &str {
        &self.ascii
    }

    pub fn pictographic(&self) -> &str {
        &self.pictographic
    }

    pub fn preferred(&self) -> Option<&str> {
        self.preferred.as_deref()
    }

    /// The symbol that best represents what the author typed.
    ///
    /// This is what gets written back out when a puzzle is saved.
    pub fn glyph(&self) -> &str {
        self.preferred.as_deref().unwrap_or(&self.ascii)
    }

    /// Attach `symbol` as a display hint.
    ///
    /// A symbol other than the current ASCII fallback becomes the preferred
    /// form; a pure ASCII symbol also replaces the ASCII fallback and an emoji
    /// replaces the pictographic one. Empty symbols are ignored. Never changes
    /// the kind.
    pub fn set_glyph(&mut self, symbol: &str) {
        if symbol.is_empty() {
            return;
        }
        if symbol != self.ascii {
            self.preferred = Some(symbol.to_string());
        }
        if symbol.is_ascii() {
            self.ascii = symbol.to_string();
        }
        if glyph::is_emoji(symbol) {
            self.pictographic = symbol.to_string();
        }
    }

    pub fn display_forms(&self) -> DisplayForms<'_> {
        DisplayForms {
            preferred: self.preferred(),
            pictographic: &self.pictographic,
            ascii: &self.ascii,
        }
    }

    /// Pick the form to draw: the preferred (or pictographic) form when the
    /// surface can show it, the ASCII fallback otherwise.
    pub fn display_with<S: GlyphSupport + ?Sized>(&self, support: &S) -> &str {
        let rich = self.preferred.as_deref().unwrap_or(&self.pictographic);
        if support.can_display(rich) {
            rich
        } else {
            &self.ascii
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_lattice() {
        for kind in TileKind::ALL {
            assert_eq!(kind.is_walkable(), kind != TileKind::Wall, "{kind}");
            assert_eq!(kind.is_solvable(), !kind.is_fixed(), "{kind}");
            // no tile is both an immovable obstacle and impassable
            assert!(!(kind.is_fixed() && !kind.is_walkable()), "{kind}");
        }
        assert!(TileKind::Treasure.is_fixed());
        assert!(TileKind::Monster.is_fixed());
        assert!(TileKind::BossMonster.is_fixed());
        assert!(!TileKind::MarkedFloor.is_fixed());
        assert!(TileKind::BossMonster.is_monster());
    }

    #[test]
    fn test_default_ascii_is_uri_safe() {
        for kind in TileKind::ALL {
            let ascii = kind.default_glyphs().ascii;
            assert!(
                ascii
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-._~".contains(c)),
                "{kind} uses {ascii:?}"
            );
        }
    }

    #[test]
    fn test_default_glyphs_classify_back() {
        for kind in TileKind::ALL {
            let glyphs = kind.default_glyphs();
            assert_eq!(glyph::classify(glyphs.ascii), kind);
            assert_eq!(glyph::classify(glyphs.pictographic), kind);
            assert!(glyph::is_emoji(glyphs.pictographic));
        }
    }

    #[test]
    fn test_set_glyph_ascii() {
        let mut tile = Tile::wall();
        tile.set_glyph("#");
        assert_eq!(tile.preferred(), Some("#"));
        assert_eq!(tile.ascii(), "#");
        assert_eq!(tile.pictographic(), "🧱");
        assert_eq!(tile.kind(), TileKind::Wall);
    }

    #[test]
    fn test_set_glyph_emoji() {
        let mut tile = Tile::monster();
        tile.set_glyph("🐍");
        assert_eq!(tile.preferred(), Some("🐍"));
        assert_eq!(tile.ascii(), "m");
        assert_eq!(tile.pictographic(), "🐍");
    }

    #[test]
    fn test_set_glyph_same_as_ascii_is_not_preferred() {
        let tile = Tile::floor().with_glyph(".");
        assert_eq!(tile.preferred(), None);
        assert_eq!(tile, Tile::floor());
    }

    #[test]
    fn test_set_glyph_idempotent() {
        let once = Tile::boss_monster().with_glyph("@");
        let twice = once.clone().with_glyph("@");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_glyph_ignores_empty() {
        let tile = Tile::floor().with_glyph("");
        assert_eq!(tile, Tile::floor());
    }

    #[test]
    fn test_display_with_fallback() {
        let tile = Tile::treasure().with_glyph("💰");
        let everything = |_: &str| true;
        let nothing = |_: &str| false;
        assert_eq!(tile.display_with(&everything), "💰");
        assert_eq!(tile.display_with(&nothing), "t");

        let plain = Tile::treasure();
        assert_eq!(plain.display_with(&everything), "💎");
    }

    #[test]
    fn test_display_forms() {
        let tile = Tile::monster().with_glyph("q");
        let forms = tile.display_forms();
        assert_eq!(forms.preferred, Some("q"));
        assert_eq!(forms.pictographic, "👾");
        assert_eq!(forms.ascii, "q");
    }

    #[test]
    fn test_floor_style_only_on_floor() {
        assert_eq!(Tile::room_floor().style(), FloorStyle::Room);
        assert_eq!(Tile::hall_floor().style(), FloorStyle::Hall);
        assert_eq!(Tile::wall().with_style(FloorStyle::Room).style(), FloorStyle::Plain);
        assert_eq!(Tile::room_floor().kind(), TileKind::Floor);
    }
}
