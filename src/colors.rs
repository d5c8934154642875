//! RGBA8 color type and the palette used by the viewer.
//!
//! Pixels are stored as [`Color`] values (`r, g, b, a` bytes, in that order).
//! The presentation adapter wants packed ARGB8888 words, so [`Color::to_argb`]
//! converts at the boundary.

/// An 8-bit-per-channel RGBA color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Pack into a `0xAARRGGBB` word.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const RED: Color = Color::rgb(230, 41, 55);
pub const BLUE: Color = Color::rgb(0, 121, 241);
pub const PINK: Color = Color::rgb(255, 109, 194);

/// Clear color for every frame.
pub const BACKGROUND: Color = PINK;
/// Playground triangle fill.
pub const PLAYGROUND: Color = RED;
/// Pinned playground vertices and the cursor.
pub const MARKER: Color = BLUE;
