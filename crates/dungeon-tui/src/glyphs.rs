//! Decides which tile glyphs the terminal can draw.
//!
//! Every cell is two columns wide. Pictographs are used when emoji are
//! enabled and the glyph fits; everything else falls back to ASCII.

use dungeon_core::GlyphSupport;
use unicode_width::UnicodeWidthStr;

const ENV_GLYPH_EMOJI: &str = "DUNGEON_GLYPH_EMOJI";

/// Terminal columns per cell glyph
pub const CELL_WIDTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPolicy {
    pub emoji: bool,
}

impl GlyphPolicy {
    /// Read the environment; `ascii` (from `--ascii`) always wins.
    pub fn detect(ascii: bool) -> Self {
        Self::from_env_with(|key| std::env::var(key).ok(), ascii)
    }

    pub fn from_env_with<F>(get_env: F, ascii: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if ascii {
            return Self { emoji: false };
        }
        let emoji = get_env(ENV_GLYPH_EMOJI)
            .and_then(|value| parse_bool(&value))
            .unwrap_or(true);
        Self { emoji }
    }

    /// `glyph` followed by enough spaces to fill a cell
    pub fn pad(glyph: &str) -> String {
        let width = glyph.width();
        format!("{}{}", glyph, " ".repeat(CELL_WIDTH.saturating_sub(width)))
    }
}

impl GlyphSupport for GlyphPolicy {
    fn can_display(&self, glyph: &str) -> bool {
        let width = glyph.width();
        if width == 0 || width > CELL_WIDTH {
            return false;
        }
        glyph.is_ascii() || self.emoji
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::Tile;

    fn env(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| {
            assert_eq!(key, ENV_GLYPH_EMOJI);
            value.map(str::to_string)
        }
    }

    #[test]
    fn test_emoji_default_on() {
        assert!(GlyphPolicy::from_env_with(env(None), false).emoji);
        assert!(GlyphPolicy::from_env_with(env(Some("garbage")), false).emoji);
    }

    #[test]
    fn test_env_override() {
        assert!(!GlyphPolicy::from_env_with(env(Some("0")), false).emoji);
        assert!(!GlyphPolicy::from_env_with(env(Some(" Off ")), false).emoji);
        assert!(GlyphPolicy::from_env_with(env(Some("yes")), false).emoji);
    }

    #[test]
    fn test_ascii_flag_wins() {
        assert!(!GlyphPolicy::from_env_with(env(Some("1")), true).emoji);
    }

    #[test]
    fn test_display_choice() {
        let emoji = GlyphPolicy { emoji: true };
        let ascii = GlyphPolicy { emoji: false };
        let wall = Tile::wall();
        assert_eq!(wall.display_with(&emoji), "🧱");
        assert_eq!(wall.display_with(&ascii), "-");

        let typed = Tile::from_glyph("#");
        assert_eq!(typed.display_with(&ascii), "#");
        assert!(!emoji.can_display("\u{200B}"));
        assert!(!emoji.can_display("👨\u{200D}👩\u{200D}👧\u{200D}👦x"));
    }

    #[test]
    fn test_pad_to_cell_width() {
        assert_eq!(GlyphPolicy::pad("-"), "- ");
        assert_eq!(GlyphPolicy::pad("🧱"), "🧱");
    }
}
