//! Glyph cache
//!
//! Font glyphs and icons are swizzled into panel order once, when a frame
//! buffer is built, and shared read-only by every draw call after that.
//!
//! The cached form depends on the panel:
//!
//! - [`ColorGlyph`]: color words for window-addressed 16-bit panels, with
//!   foreground and background already resolved
//! - [`PageGlyph`]: two page planes for page-addressed monochrome panels;
//!   an icon there spans two cells
//!
//! Character lookups always succeed. Icon lookups return `None` for names
//! that were never registered.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use log::debug;

use crate::color::Palette;
use crate::error::BuilderError;
use crate::font::{Bitmap16, FontTable, GLYPH_COUNT, IconSet};
use crate::swizzle::{expand_glyph, expand_row, swizzle_page};

/// Icon height and width in pixels
pub const ICON_SIZE: usize = 16;

/// Conversion from source bitmaps into a cached, panel-ordered glyph
pub trait Swizzle: Sized {
    /// Values fixed at cache-build time (colors)
    type Params: Copy;
    /// Cached form of a 16x16 icon
    type Icon;

    /// Reject fonts this glyph form cannot hold
    fn check_font(font: &FontTable) -> Result<(), BuilderError>;

    /// Swizzle one font glyph
    ///
    /// Only called with fonts accepted by [`check_font`](Self::check_font).
    fn from_font(font: &FontTable, code: u8, params: Self::Params) -> Self;

    /// Swizzle one icon for a font cell `cell_height` rows tall
    fn from_icon(
        icon: &Bitmap16,
        cell_height: usize,
        params: Self::Params,
    ) -> Result<Self::Icon, BuilderError>;
}

/// Color-expanded glyph: one RGB565 word per pixel, raster order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGlyph {
    words: Vec<u16>,
}

impl ColorGlyph {
    /// All pixel words, ready for one address window
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Pixel words one scanline at a time
    pub fn rows(&self) -> core::slice::ChunksExact<'_, u16> {
        self.words.chunks_exact(ICON_SIZE)
    }
}

impl Swizzle for ColorGlyph {
    type Params = Palette;
    type Icon = ColorGlyph;

    fn check_font(font: &FontTable) -> Result<(), BuilderError> {
        if font.width() != 16 {
            return Err(BuilderError::UnsupportedFont {
                width: font.width(),
                height: font.height(),
            });
        }
        Ok(())
    }

    fn from_font(font: &FontTable, code: u8, palette: Palette) -> Self {
        Self {
            words: expand_glyph(font.glyph(code), palette),
        }
    }

    fn from_icon(
        icon: &Bitmap16,
        cell_height: usize,
        palette: Palette,
    ) -> Result<Self, BuilderError> {
        if cell_height < ICON_SIZE {
            return Err(BuilderError::IconTooTall { cell_height });
        }
        let above = (cell_height - ICON_SIZE) / 2;
        let below = cell_height - ICON_SIZE - above;
        let blank = palette.background.raw();

        let mut words = Vec::with_capacity(cell_height * ICON_SIZE);
        words.resize(above * ICON_SIZE, blank);
        for &row in icon.rows() {
            words.extend_from_slice(&expand_row(row, palette));
        }
        words.resize(words.len() + below * ICON_SIZE, blank);
        Ok(Self { words })
    }
}

/// Page-plane glyph: one 8x16 cell as two 8-byte pages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageGlyph {
    /// Rows 0-7, one byte per column, top row in bit 0
    pub top: [u8; 8],
    /// Rows 8-15
    pub bottom: [u8; 8],
}

impl PageGlyph {
    /// Swizzle an 8x16 bitmap, one byte per row
    pub fn from_rows(rows: &[u8; 16]) -> Self {
        let (top, bottom) = swizzle_page(rows);
        Self { top, bottom }
    }
}

impl Swizzle for PageGlyph {
    type Params = ();
    type Icon = [PageGlyph; 2];

    fn check_font(font: &FontTable) -> Result<(), BuilderError> {
        if font.width() != 8 || font.height() != ICON_SIZE {
            return Err(BuilderError::UnsupportedFont {
                width: font.width(),
                height: font.height(),
            });
        }
        Ok(())
    }

    fn from_font(font: &FontTable, code: u8, _params: ()) -> Self {
        let mut rows = [0u8; 16];
        for (dst, src) in rows.iter_mut().zip(font.glyph(code)) {
            *dst = *src;
        }
        Self::from_rows(&rows)
    }

    fn from_icon(
        icon: &Bitmap16,
        _cell_height: usize,
        _params: (),
    ) -> Result<[PageGlyph; 2], BuilderError> {
        Ok([
            Self::from_rows(&icon.left()),
            Self::from_rows(&icon.right()),
        ])
    }
}

/// Swizzled font and icon glyphs for one frame buffer
pub struct GlyphCache<G: Swizzle> {
    font: Vec<G>,
    icons: BTreeMap<String, G::Icon>,
    params: G::Params,
    cell_height: usize,
}

impl<G: Swizzle> GlyphCache<G> {
    /// Swizzle a font and an icon set
    ///
    /// # Errors
    ///
    /// Fails if the font shape does not suit `G` or an icon does not fit a
    /// font cell.
    pub fn new(font: &FontTable, icons: &IconSet, params: G::Params) -> Result<Self, BuilderError> {
        G::check_font(font)?;
        let glyphs = (0..GLYPH_COUNT)
            .map(|code| G::from_font(font, code as u8, params))
            .collect();
        let mut cache = Self {
            font: glyphs,
            icons: BTreeMap::new(),
            params,
            cell_height: font.height(),
        };
        cache.set_icons(icons)?;
        Ok(cache)
    }

    /// Glyph for a character code
    pub fn lookup_char(&self, code: u8) -> &G {
        &self.font[usize::from(code)]
    }

    /// Icon registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&G::Icon> {
        self.icons.get(name)
    }

    /// Replace every icon, keeping the font
    ///
    /// The new set is built in full before the old one is dropped, so a
    /// failure leaves the cache unchanged.
    pub fn set_icons(&mut self, icons: &IconSet) -> Result<(), BuilderError> {
        let mut swizzled = BTreeMap::new();
        for (name, icon) in icons {
            swizzled.insert(name.clone(), G::from_icon(icon, self.cell_height, self.params)?);
        }
        debug!("glyph cache: {} icons", swizzled.len());
        self.icons = swizzled;
        Ok(())
    }

    /// Number of registered icons
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    /// Font cell height in pixels
    pub fn cell_height(&self) -> usize {
        self.cell_height
    }
}

impl<G: Swizzle> core::fmt::Debug for GlyphCache<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("glyphs", &self.font.len())
            .field("icons", &self.icons.len())
            .field("cell_height", &self.cell_height)
            .finish()
    }
}
