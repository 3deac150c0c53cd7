//! Font tables and icon bitmaps
//!
//! Source bitmaps are row-major, one bit per pixel, leftmost pixel in the
//! most significant bit.
//!
//! - [`FontTable`]: 256 glyphs indexed by character code, 8 or 16 pixels wide
//! - [`Bitmap16`]: a 16x16 icon, registered under a name in an [`IconSet`]
//!
//! With the `graphics` feature, [`FontTable::builtin_cells`] and
//! [`FontTable::builtin_pages`] rasterise the ISO-8859-1 faces shipped with
//! `embedded-graphics`.
//!
//! ## Example
//!
//! ```
//! use i8080_tft::{Bitmap16, IconSet};
//!
//! let art = "
//!     ................
//!     .******..******.
//!     .*....*..*....*.
//!     .*....*..*....*.
//!     .*....*..*....*.
//!     .******..******.
//!     ................
//!     ................
//!     ................
//!     ................
//!     .******..******.
//!     .*....*..*....*.
//!     .*....*..*....*.
//!     .*....*..*....*.
//!     .******..******.
//!     ................
//! ";
//! let mut icons = IconSet::new();
//! icons.insert("grid".into(), Bitmap16::from_ascii(art).unwrap());
//! assert_eq!(icons["grid"].row(1), Some(0x7E7E));
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::BuilderError;

/// Glyphs in every font table
pub const GLYPH_COUNT: usize = 256;

/// Tallest supported glyph
pub const MAX_GLYPH_HEIGHT: usize = 64;

/// Named icons, replaced as a whole by `set_glyphs`
pub type IconSet = BTreeMap<String, Bitmap16>;

/// A fixed-pitch bitmap font
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontTable {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl FontTable {
    /// Create a font from raw glyph data
    ///
    /// `data` holds 256 glyphs back to back, `height` scanlines each.
    /// 8-wide glyphs use one byte per scanline. 16-wide glyphs use two: the
    /// low then the high byte of a 16-bit value with the leftmost pixel in
    /// its most significant bit.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidFont` if the width is not 8 or 16, the
    /// height is outside 1..=64, or `data` is not exactly 256 glyphs long.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, BuilderError> {
        let invalid = BuilderError::InvalidFont {
            width,
            height,
            len: data.len(),
        };
        if !matches!(width, 8 | 16) || height == 0 || height > MAX_GLYPH_HEIGHT {
            return Err(invalid);
        }
        if data.len() != GLYPH_COUNT * height * width / 8 {
            return Err(invalid);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Glyph width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Glyph height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per scanline
    pub fn row_bytes(&self) -> usize {
        self.width / 8
    }

    /// Bytes per glyph
    pub fn glyph_bytes(&self) -> usize {
        self.row_bytes() * self.height
    }

    /// Source scanlines of one glyph
    pub fn glyph(&self, code: u8) -> &[u8] {
        let size = self.glyph_bytes();
        let start = usize::from(code) * size;
        &self.data[start..start + size]
    }
}

#[cfg(feature = "graphics")]
mod raster {
    use super::{FontTable, GLYPH_COUNT};
    use crate::error::BuilderError;
    use alloc::vec;
    use core::convert::Infallible;
    use embedded_graphics::{
        mono_font::{MonoFont, MonoTextStyle},
        pixelcolor::BinaryColor,
        prelude::*,
        text::{Baseline, Text},
    };

    /// One glyph cell being rasterised into font-table layout
    struct GlyphCanvas<'a> {
        width: usize,
        height: usize,
        rows: &'a mut [u8],
    }

    impl GlyphCanvas<'_> {
        fn set_pixel(&mut self, x: usize, y: usize) {
            let row_bytes = self.width / 8;
            let row = &mut self.rows[y * row_bytes..(y + 1) * row_bytes];
            if self.width == 8 {
                row[0] |= 0x80 >> x;
            } else {
                let packed = u16::from_le_bytes([row[0], row[1]]) | (0x8000 >> x);
                row.copy_from_slice(&packed.to_le_bytes());
            }
        }
    }

    impl OriginDimensions for GlyphCanvas<'_> {
        fn size(&self) -> Size {
            Size::new(self.width as u32, self.height as u32)
        }
    }

    impl DrawTarget for GlyphCanvas<'_> {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
        where
            Iter: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(Point { x, y }, color) in pixels {
                if x < 0 || y < 0 || color.is_off() {
                    continue;
                }
                let (x, y) = (x as usize, y as usize);
                if x >= self.width || y >= self.height {
                    continue;
                }
                self.set_pixel(x, y);
            }
            Ok(())
        }
    }

    impl FontTable {
        /// Rasterise an `embedded-graphics` mono font into a font table
        ///
        /// Each glyph is centred in a `width` x `height` cell. Codes the
        /// face has no printable glyph for (control characters) stay blank.
        ///
        /// # Errors
        ///
        /// Returns `BuilderError::InvalidFont` for an unsupported cell size.
        pub fn from_mono_font(
            font: &MonoFont<'_>,
            width: usize,
            height: usize,
        ) -> Result<Self, BuilderError> {
            let glyph_bytes = width / 8 * height;
            let mut data = vec![0u8; GLYPH_COUNT * glyph_bytes];
            let origin = Point::new(
                (width as i32 - font.character_size.width as i32).max(0) / 2,
                (height as i32 - font.character_size.height as i32).max(0) / 2,
            );
            let style = MonoTextStyle::new(font, BinaryColor::On);

            if matches!(width, 8 | 16) {
                for (code, rows) in data.chunks_exact_mut(glyph_bytes).enumerate() {
                    let ch = char::from(code as u8);
                    if ch.is_control() {
                        continue;
                    }
                    let mut buf = [0u8; 4];
                    let mut canvas = GlyphCanvas {
                        width,
                        height,
                        rows,
                    };
                    let text =
                        Text::with_baseline(ch.encode_utf8(&mut buf), origin, style, Baseline::Top);
                    match text.draw(&mut canvas) {
                        Ok(_) => {}
                        Err(never) => match never {},
                    }
                }
            }
            Self::new(width, height, data)
        }

        /// 16x24 font for cell-grid panels
        pub fn builtin_cells() -> Self {
            Self::rasterised(&embedded_graphics::mono_font::iso_8859_1::FONT_10X20, 16, 24)
        }

        /// 8x16 font for page panels
        pub fn builtin_pages() -> Self {
            Self::rasterised(&embedded_graphics::mono_font::iso_8859_1::FONT_8X13, 8, 16)
        }

        fn rasterised(font: &MonoFont<'_>, width: usize, height: usize) -> Self {
            Self::from_mono_font(font, width, height).unwrap_or_else(|_| Self {
                width,
                height,
                data: vec![0; GLYPH_COUNT * width / 8 * height],
            })
        }
    }
}

/// A 16x16 monochrome icon
///
/// Each row is a `u16` with the leftmost pixel in the most significant bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bitmap16 {
    rows: [u16; 16],
}

impl Bitmap16 {
    /// Create an icon from its 16 rows
    pub const fn from_rows(rows: [u16; 16]) -> Self {
        Self { rows }
    }

    /// Create an icon from its left and right 8-column halves
    pub fn from_halves(left: &[u8; 16], right: &[u8; 16]) -> Self {
        let mut rows = [0u16; 16];
        for (row, (&l, &r)) in rows.iter_mut().zip(left.iter().zip(right.iter())) {
            *row = u16::from_be_bytes([l, r]);
        }
        Self { rows }
    }

    /// Parse icon art: 16 lines of 16 `.` (off) or `*` (on) characters
    ///
    /// Surrounding whitespace and blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidIconArt` with the first offending line,
    /// or line 16 when there are too few or too many lines.
    pub fn from_ascii(art: &str) -> Result<Self, BuilderError> {
        let mut rows = [0u16; 16];
        let mut count = 0;
        for line in art.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if count >= 16 || line.len() != 16 {
                return Err(BuilderError::InvalidIconArt { line: count });
            }
            let mut row = 0u16;
            for c in line.bytes() {
                row = match c {
                    b'*' => row << 1 | 1,
                    b'.' => row << 1,
                    _ => return Err(BuilderError::InvalidIconArt { line: count }),
                };
            }
            rows[count] = row;
            count += 1;
        }
        if count != 16 {
            return Err(BuilderError::InvalidIconArt { line: count });
        }
        Ok(Self { rows })
    }

    /// All rows
    pub fn rows(&self) -> &[u16; 16] {
        &self.rows
    }

    /// One row, `None` past the last
    pub fn row(&self, index: usize) -> Option<u16> {
        self.rows.get(index).copied()
    }

    /// Left 8 columns, one byte per row
    pub fn left(&self) -> [u8; 16] {
        self.rows.map(|r| (r >> 8) as u8)
    }

    /// Right 8 columns, one byte per row
    pub fn right(&self) -> [u8; 16] {
        self.rows.map(|r| r as u8)
    }
}

/// Character drawn for a named glyph that has no icon
///
/// | Name          | Character |
/// |---------------|-----------|
/// | `degrees`     | `°` (0xB0) |
/// | `left_arrow`  | `<`       |
/// | `right_arrow` | `>`       |
pub fn text_glyph(name: &str) -> Option<u8> {
    match name {
        "degrees" => Some(0xB0),
        "left_arrow" => Some(b'<'),
        "right_arrow" => Some(b'>'),
        _ => None,
    }
}
