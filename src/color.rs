//! Color words for 16-bit TFT panels
//!
//! Panels on the 8080 bus are driven in RGB565: one 16-bit bus word per
//! pixel. Monochrome font and icon bitmaps are resolved to two such words,
//! a foreground and a background, when the glyph cache is built.
//!
//! | Bits  | Channel |
//! |-------|---------|
//! | 15-11 | Red     |
//! | 10-5  | Green   |
//! | 4-0   | Blue    |
//!
//! ## Example
//!
//! ```
//! use i8080_tft::Color;
//!
//! assert_eq!(Color::from_rgb(255, 255, 255), Color::WHITE);
//! assert_eq!(Color::from_rgb(255, 0, 0).raw(), 0xF800);
//! ```

/// A pixel color as the panel's RGB565 bus word
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Color(pub u16);

impl Color {
    /// All channels off
    pub const BLACK: Self = Self(0x0000);
    /// All channels full
    pub const WHITE: Self = Self(0xFFFF);
    /// Full red
    pub const RED: Self = Self(0xF800);
    /// Full green
    pub const GREEN: Self = Self(0x07E0);
    /// Full blue
    pub const BLUE: Self = Self(0x001F);

    /// Build a color from 8-bit channels, dropping the low bits of each
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 >> 3) << 11;
        let g = (g as u16 >> 2) << 5;
        let b = b as u16 >> 3;
        Self(r | g | b)
    }

    /// The raw bus word
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU16;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb565> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::Rgb565) -> Self {
        use embedded_graphics_core::pixelcolor::IntoStorage;
        Self(color.into_storage())
    }
}

/// The two colors a monochrome glyph is expanded into
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    /// Color for set bits
    pub foreground: Color,
    /// Color for clear bits
    pub background: Color,
}

impl Palette {
    /// Create a palette
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Resolve one source bit to its bus word
    #[inline]
    pub const fn word(self, bit_set: bool) -> u16 {
        if bit_set {
            self.foreground.0
        } else {
            self.background.0
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Color::WHITE, Color::BLACK)
    }
}
