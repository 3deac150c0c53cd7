//! Frame buffer contract shared by both flush strategies
//!
//! A frame buffer keeps two copies of the screen: `current`, changed by the
//! drawing calls, and `previous`, changed only by [`FrameBuffer::flush`] and
//! [`FrameBuffer::clear_all`], mirroring what the panel shows. `flush`
//! transmits the difference.
//!
//! | Strategy                    | Panels             | Unit of change      |
//! |-----------------------------|--------------------|---------------------|
//! | [`CellFrameBuffer`]         | SSD1963, ILI9488   | one text cell       |
//! | [`PageFrameBuffer`]         | SSD1306            | coalesced byte runs |
//!
//! [`Surface`] holds either one, chosen by [`Chip`](crate::Chip).
//!
//! ## Drawing never fails
//!
//! Coordinates are in text cells. Rows past the grid are ignored, text is
//! cut at the last column, unknown glyph names draw nothing. Only
//! transmission can fail.
//!
//! ## Example
//!
//! ```
//! use std::collections::VecDeque;
//! use i8080_tft::{
//!     Builder, CellFrameBuffer, Dimensions, FontTable, FrameBuffer, IconSet, Interface,
//! };
//!
//! let config = Builder::new()
//!     .dimensions(Dimensions::new(320, 480).unwrap())
//!     .build()
//!     .unwrap();
//! let font = FontTable::new(16, 24, vec![0; 256 * 48]).unwrap();
//! let interface = Interface::new(VecDeque::new(), 0);
//! let mut fb = CellFrameBuffer::new(interface, &config, &font, &IconSet::new()).unwrap();
//!
//! assert_eq!(fb.dimensions(), (20, 20));
//! fb.write_text(0, 0, b"Hi");
//! fb.flush().unwrap();
//! // two cells, each: window (2), memory write, 24 scanlines of pixels
//! assert_eq!(fb.interface().queue().len(), 2 * (3 + 24));
//! ```

use alloc::string::String;

use crate::error::{BuilderError, Error};
use crate::font::{Bitmap16, IconSet};
use crate::interface::DisplayInterface;

pub use crate::cells::CellFrameBuffer;
pub use crate::pages::PageFrameBuffer;

/// Result of a transmitting frame buffer operation
pub type FlushResult<I> = core::result::Result<(), Error<I>>;

/// Content of one text cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// A character code from the font
    Char(u8),
    /// A named icon
    Icon(String),
}

impl Cell {
    /// The blank sentinel every cell starts as
    pub const BLANK: Self = Self::Char(b' ');
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Text and icon drawing with diff-based flushing
pub trait FrameBuffer {
    /// Interface flushes are sent through
    type Interface: DisplayInterface;

    /// Grid size as `(columns, rows)`
    fn dimensions(&self) -> (usize, usize);

    /// Write character codes starting at cell `(x, y)`, cut at the last column
    fn write_text(&mut self, x: usize, y: usize, text: &[u8]);

    /// Write a named glyph at cell `(x, y)`
    ///
    /// Returns the number of cells the caller should advance by, also when
    /// nothing was drawn.
    fn write_glyph(&mut self, x: usize, y: usize, name: &str) -> usize;

    /// XOR a 16x16 pattern into the pixels at cell `(x, y)`
    ///
    /// Applying the same pattern twice restores the original pixels. Only
    /// page panels support overlays; elsewhere this does nothing.
    fn write_graphics(&mut self, x: usize, y: usize, bitmap: &Bitmap16) {
        let _ = (x, y, bitmap);
    }

    /// Reset every cell to blank without touching the panel
    fn clear(&mut self);

    /// Transmit every change since the last flush
    ///
    /// On error, the cells or runs already queued count as transmitted; the
    /// next flush sends the rest.
    fn flush(&mut self) -> FlushResult<Self::Interface>;

    /// Fill the whole panel with the background and forget what was shown
    ///
    /// The next flush repaints every non-blank cell.
    fn clear_all(&mut self) -> FlushResult<Self::Interface>;

    /// Replace the icon set
    fn set_glyphs(&mut self, icons: &IconSet) -> Result<(), BuilderError>;
}

/// A frame buffer of either strategy
#[derive(Debug)]
pub enum Surface<I: DisplayInterface> {
    /// Cell grid on a window-addressed panel
    Cells(CellFrameBuffer<I>),
    /// Pixel pages on a page-addressed panel
    Pages(PageFrameBuffer<I>),
}

impl<I: DisplayInterface> Surface<I> {
    /// Access the interface
    pub fn interface(&self) -> &I {
        match self {
            Self::Cells(fb) => fb.interface(),
            Self::Pages(fb) => fb.interface(),
        }
    }

    /// Access the interface mutably
    pub fn interface_mut(&mut self) -> &mut I {
        match self {
            Self::Cells(fb) => fb.interface_mut(),
            Self::Pages(fb) => fb.interface_mut(),
        }
    }

    /// Give the interface back
    pub fn release(self) -> I {
        match self {
            Self::Cells(fb) => fb.release(),
            Self::Pages(fb) => fb.release(),
        }
    }
}

impl<I: DisplayInterface> FrameBuffer for Surface<I> {
    type Interface = I;

    fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Cells(fb) => fb.dimensions(),
            Self::Pages(fb) => fb.dimensions(),
        }
    }

    fn write_text(&mut self, x: usize, y: usize, text: &[u8]) {
        match self {
            Self::Cells(fb) => fb.write_text(x, y, text),
            Self::Pages(fb) => fb.write_text(x, y, text),
        }
    }

    fn write_glyph(&mut self, x: usize, y: usize, name: &str) -> usize {
        match self {
            Self::Cells(fb) => fb.write_glyph(x, y, name),
            Self::Pages(fb) => fb.write_glyph(x, y, name),
        }
    }

    fn write_graphics(&mut self, x: usize, y: usize, bitmap: &Bitmap16) {
        match self {
            Self::Cells(fb) => fb.write_graphics(x, y, bitmap),
            Self::Pages(fb) => fb.write_graphics(x, y, bitmap),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Cells(fb) => fb.clear(),
            Self::Pages(fb) => fb.clear(),
        }
    }

    fn flush(&mut self) -> FlushResult<I> {
        match self {
            Self::Cells(fb) => fb.flush(),
            Self::Pages(fb) => fb.flush(),
        }
    }

    fn clear_all(&mut self) -> FlushResult<I> {
        match self {
            Self::Cells(fb) => fb.clear_all(),
            Self::Pages(fb) => fb.clear_all(),
        }
    }

    fn set_glyphs(&mut self, icons: &IconSet) -> Result<(), BuilderError> {
        match self {
            Self::Cells(fb) => fb.set_glyphs(icons),
            Self::Pages(fb) => fb.set_glyphs(icons),
        }
    }
}
