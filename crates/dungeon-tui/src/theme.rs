use crossterm::style::Color;
use dungeon_core::TileKind;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Target and count labels
    pub border: Color,
    pub wall: Color,
    pub floor: Color,
    /// Player scratch marks
    pub marked: Color,
    pub treasure: Color,
    pub monster: Color,
    /// Selected cell background
    pub selected_bg: Color,
    /// Error/mismatch color
    pub error: Color,
    /// Success/complete color
    pub success: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            wall: Color::Rgb { r: 190, g: 120, b: 80 },
            floor: Color::Rgb { r: 90, g: 95, b: 110 },
            marked: Color::Rgb { r: 140, g: 150, b: 180 },
            treasure: Color::Rgb { r: 255, g: 210, b: 100 },
            monster: Color::Rgb { r: 200, g: 120, b: 255 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 60, g: 60, b: 80 },
            wall: Color::Rgb { r: 150, g: 70, b: 30 },
            floor: Color::Rgb { r: 180, g: 180, b: 195 },
            marked: Color::Rgb { r: 130, g: 130, b: 150 },
            treasure: Color::Rgb { r: 200, g: 120, b: 20 },
            monster: Color::Rgb { r: 130, g: 40, b: 180 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            name: "high contrast",
            bg: Color::Black,
            fg: Color::White,
            border: Color::White,
            wall: Color::Yellow,
            floor: Color::Grey,
            marked: Color::Cyan,
            treasure: Color::Green,
            monster: Color::Magenta,
            selected_bg: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }

    /// The theme after this one, wrapping around
    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    pub fn tile(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Floor => self.floor,
            TileKind::Wall => self.wall,
            TileKind::MarkedFloor => self.marked,
            TileKind::Treasure => self.treasure,
            TileKind::Monster | TileKind::BossMonster => self.monster,
        }
    }
}
