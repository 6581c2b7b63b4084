//! Display surface capabilities and color types

/// Display surface capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCapabilities {
    /// Width in logical units
    pub width: u32,
    /// Height in logical units
    pub height: u32,
    /// Supports depth/3D rendering
    pub supports_depth: bool,
    /// Can load and draw mesh assets
    pub supports_meshes: bool,
    /// Horizontal field of view in degrees (for AR)
    pub fov_horizontal: Option<f32>,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            supports_depth: false,
            supports_meshes: false,
            fov_horizontal: None,
        }
    }
}

/// Color representation supporting multiple formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Reset to default
    #[default]
    Reset,
    Black,
    White,
    Grey,
    DarkGrey,
    /// True color RGB
    Rgb(u8, u8, u8),
}

impl Color {
    pub const TABLE_BROWN: Self = Color::from_hex(0x8b4513);
    pub const BAR_GREY: Self = Color::from_hex(0x666666);
    pub const TEAM_A_BLUE: Self = Color::from_hex(0x0000ff);
    pub const TEAM_B_RED: Self = Color::from_hex(0xff0000);
    pub const BALL_WHITE: Self = Color::from_hex(0xffffff);
    pub const RETICLE_GREEN: Self = Color::from_hex(0x00ff00);

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Color::Rgb(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    /// Convert to RGB tuple if possible
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Rgb(r, g, b) => Some((*r, *g, *b)),
            Color::Black => Some((0, 0, 0)),
            Color::White => Some((255, 255, 255)),
            Color::Grey => Some((128, 128, 128)),
            Color::DarkGrey => Some((64, 64, 64)),
            Color::Reset => None,
        }
    }

    /// Convert to crossterm color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        match self {
            Color::Reset => crossterm::style::Color::Reset,
            Color::Black => crossterm::style::Color::Black,
            Color::White => crossterm::style::Color::White,
            Color::Grey => crossterm::style::Color::Grey,
            Color::DarkGrey => crossterm::style::Color::DarkGrey,
            Color::Rgb(r, g, b) => crossterm::style::Color::Rgb {
                r: *r,
                g: *g,
                b: *b,
            },
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_rgb() {
            Some((r, g, b)) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            None => f.write_str("default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::TABLE_BROWN, Color::Rgb(0x8b, 0x45, 0x13));
        assert_eq!(Color::TEAM_A_BLUE.to_string(), "#0000ff");
        assert_eq!(Color::Reset.to_string(), "default");
    }
}
