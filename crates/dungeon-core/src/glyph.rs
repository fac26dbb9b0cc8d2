//! Glyph resolver: maps any user-perceived symbol onto a tile kind.
//!
//! Matchers are tried in a fixed precedence order and the first match wins.
//! The sets overlap on purpose (curated symbols take priority over the broad
//! letter ranges), and monsters act as the catch-all so every symbol
//! resolves to something.

use crate::tile::TileKind;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

type Matcher = fn(&str) -> bool;

/// Precedence order. Monster is last and also the fallback.
const MATCHERS: [(TileKind, Matcher); 6] = [
    (TileKind::Floor, is_floor_glyph),
    (TileKind::Wall, is_wall_glyph),
    (TileKind::Treasure, is_treasure_glyph),
    (TileKind::BossMonster, is_boss_glyph),
    (TileKind::MarkedFloor, is_marked_glyph),
    (TileKind::Monster, is_monster_glyph),
];

const FLOOR_GLYPHS: &[&str] = &[".", "_", "·", "⬜", "▫"];
const WALL_GLYPHS: &[&str] = &["-", "#", "|", "+", "=", "█", "▓", "▒", "🧱", "⬛", "◼"];
const TREASURE_GLYPHS: &[&str] = &["t", "T", "$", "*", "💎", "💰", "👑", "🏆", "🪙", "📦"];
const BOSS_GLYPHS: &[&str] = &["@", "&", "🐉", "🐲", "👿", "😈", "👹", "🧙"];
const MARKED_GLYPHS: &[&str] = &["x", "X", "?", "❌", "✖", "✕", "⨯"];
const MONSTER_GLYPHS: &[&str] = &["👾", "🐀", "🦇", "🕷", "🐍", "💀", "🧟", "👻", "🐺"];

/// Resolve a symbol to a tile kind. Total: unknown symbols become monsters.
pub fn classify(symbol: &str) -> TileKind {
    match MATCHERS.iter().find(|(_, matches)| matches(symbol)) {
        Some((kind, _)) => *kind,
        None => {
            trace!(symbol, "unrecognised glyph, treating as monster");
            TileKind::Monster
        }
    }
}

/// Split a line into grapheme clusters, so that a multi-codepoint emoji
/// counts as one symbol.
pub fn glyphs(line: &str) -> impl Iterator<Item = &str> {
    line.graphemes(true)
}

/// Whether a symbol looks like an emoji pictograph.
pub fn is_emoji(symbol: &str) -> bool {
    has_emoji_presentation_selector(symbol) || symbol.chars().any(is_probable_emoji)
}

#[inline]
fn is_probable_emoji(c: char) -> bool {
    let u = c as u32;
    matches!(
        u,
        0x1F000..=0x1FAFF | 0x2300..=0x23FF | 0x2600..=0x27BF | 0x2B00..=0x2BFF
    ) && u != 0x2764
}

#[inline]
fn has_emoji_presentation_selector(symbol: &str) -> bool {
    symbol.chars().any(|c| c == '\u{FE0F}')
}

/// Drop a trailing VS16 so "🕷\u{FE0F}" matches the curated "🕷".
fn base(symbol: &str) -> &str {
    symbol.trim_end_matches('\u{FE0F}')
}

fn in_set(set: &[&str], symbol: &str) -> bool {
    let symbol = base(symbol);
    set.contains(&symbol)
}

fn single_char(symbol: &str) -> Option<char> {
    let mut chars = symbol.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn is_floor_glyph(symbol: &str) -> bool {
    // empty cells count as floor, hence `all` rather than a non-empty check
    symbol.chars().all(char::is_whitespace) || in_set(FLOOR_GLYPHS, symbol)
}

fn is_wall_glyph(symbol: &str) -> bool {
    in_set(WALL_GLYPHS, symbol)
}

fn is_treasure_glyph(symbol: &str) -> bool {
    in_set(TREASURE_GLYPHS, symbol)
}

fn is_boss_glyph(symbol: &str) -> bool {
    single_char(symbol).is_some_and(|c| matches!(c, 'A'..='S' | 'U'..='W' | 'Y' | 'Z'))
        || in_set(BOSS_GLYPHS, symbol)
}

fn is_marked_glyph(symbol: &str) -> bool {
    in_set(MARKED_GLYPHS, symbol)
}

fn is_monster_glyph(symbol: &str) -> bool {
    single_char(symbol).is_some_and(|c| matches!(c, 'a'..='s' | 'u'..='w' | 'y' | 'z'))
        || in_set(MONSTER_GLYPHS, symbol)
}
