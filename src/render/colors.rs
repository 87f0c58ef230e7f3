//! Visitor glyphs and colour palette

/// Opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex string (`#rrggbb`)
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// People glyphs a visitor may be drawn with
pub const VISITOR_GLYPHS: [&str; 5] = ["🏃", "🚶", "🧍", "🧒", "👧"];

/// Visitor colors
pub const VISITOR_PALETTE: [Color; 6] = [
    Color::new(0xef, 0x44, 0x44), // Red
    Color::new(0x3b, 0x82, 0xf6), // Blue
    Color::new(0x10, 0xb9, 0x81), // Green
    Color::new(0xf5, 0x9e, 0x0b), // Amber
    Color::new(0x8b, 0x5c, 0xf6), // Violet
    Color::new(0xec, 0x48, 0x99), // Pink
];
