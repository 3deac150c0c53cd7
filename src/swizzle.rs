//! Bit swizzling from row-major bitmaps to panel scan order
//!
//! Font and icon sources are stored the way they are drawn: one scanline per
//! row, most significant bit leftmost. Panels want something else.
//!
//! - Page-addressed monochrome controllers take one byte per pixel column,
//!   covering 8 rows of a page with the least significant bit at the top
//!   ([`swizzle_page`]).
//! - 16-bit TFT controllers take one color word per pixel in raster order
//!   ([`expand_row`], [`expand_glyph`]).
//!
//! ## Broadcast and mask
//!
//! Multiplying a byte by `0x8040_2010_0804_0201` places eight shifted copies
//! of it 9 bits apart. The copies never overlap, so the product is their OR,
//! and masking the top bit of every byte lane leaves source bit `7 - k` in
//! lane `k`: one pixel column per lane. Shifting that right by the row index
//! and OR-ing eight rows together transposes an 8x8 block in eight
//! multiplies.
//!
//! ## Example
//!
//! ```
//! use i8080_tft::swizzle::transpose8;
//!
//! // A single vertical line in the leftmost column...
//! let rows = [0x80; 8];
//! // ...becomes a single full byte for column 0
//! assert_eq!(transpose8(rows), [0xFF, 0, 0, 0, 0, 0, 0, 0]);
//! ```

use alloc::vec::Vec;

use crate::color::Palette;

/// Eight copies of a byte, 9 bits apart
const SPREAD: u64 = 0x8040_2010_0804_0201;

/// Top bit of every byte lane
const LANE_TOP: u64 = 0x8080_8080_8080_8080;

/// Broadcast the 8 bits of `b` into the top bit of 8 byte lanes
///
/// Lane `k` carries source bit `7 - k`, which is pixel column `k` of a
/// most-significant-bit-first scanline.
#[inline]
pub const fn spread(b: u8) -> u64 {
    (b as u64).wrapping_mul(SPREAD) & LANE_TOP
}

/// Transpose an 8x8 bit block
///
/// Output byte `c` holds pixel column `c` with row 0 in its most significant
/// bit. Applying it twice gives back the input.
pub const fn transpose8(rows: [u8; 8]) -> [u8; 8] {
    let mut acc = 0u64;
    let mut r = 0;
    while r < 8 {
        acc |= spread(rows[r]) >> r;
        r += 1;
    }
    acc.to_le_bytes()
}

/// Swizzle one 8-pixel-wide, 16-row glyph into two page planes
///
/// Returns `(top, bottom)`: rows 0-7 and rows 8-15. Each plane holds one
/// byte per pixel column with the topmost row in the least significant bit,
/// the layout of a page-addressed controller's display RAM.
pub const fn swizzle_page(rows: &[u8; 16]) -> ([u8; 8], [u8; 8]) {
    let mut top = 0u64;
    let mut bottom = 0u64;
    let mut r = 0;
    while r < 8 {
        top |= spread(rows[r]) >> (7 - r);
        bottom |= spread(rows[r + 8]) >> (7 - r);
        r += 1;
    }
    (top.to_le_bytes(), bottom.to_le_bytes())
}

/// Expand one 16-pixel scanline into color words, leftmost pixel first
#[inline]
pub fn expand_row(packed: u16, palette: Palette) -> [u16; 16] {
    let mut out = [0u16; 16];
    for (i, word) in out.iter_mut().enumerate() {
        *word = palette.word(packed & (0x8000 >> i) != 0);
    }
    out
}

/// Expand a 16-pixel-wide glyph into color words in raster order
///
/// `data` holds two bytes per scanline: the first is the low byte and the
/// second the high byte of a 16-bit value whose most significant bit is the
/// leftmost pixel. A trailing odd byte is ignored.
pub fn expand_glyph(data: &[u8], palette: Palette) -> Vec<u16> {
    let mut words = Vec::with_capacity(data.len() * 8);
    for pair in data.chunks_exact(2) {
        let packed = u16::from_le_bytes([pair[0], pair[1]]);
        words.extend_from_slice(&expand_row(packed, palette));
    }
    words
}
