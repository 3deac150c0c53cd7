//! Page frame buffer for page-addressed monochrome panels
//!
//! The panel's display RAM is a stack of pages, each a row of bytes covering
//! 8 pixel rows of one column. This buffer keeps a copy of every page, draws
//! 8x16 glyphs straight into them and, on flush, sends each page's changed
//! bytes as coalesced runs.
//!
//! ## Layout
//!
//! - Text cell: 8 columns by 2 pages (8x16 pixels)
//! - Icon: two neighbouring cells
//! - Page `p` byte `c`: pixel column `c`, rows `8p..8p+8`, top row in bit 0
//!
//! ## Command sequence per dirty run
//!
//! 1. `0xB0 | page`
//! 2. `0x10 | column >> 4`
//! 3. `column & 0x0F`
//! 4. The run's bytes, one pixel-data word each
//!
//! Column addresses include the configured `x_offset`.

use alloc::vec;
use alloc::vec::Vec;
use log::{debug, trace};

use crate::command::ssd1306;
use crate::config::Config;
use crate::diff::{DiffPolicy, dirty_runs};
use crate::error::{BuilderError, Error};
use crate::font::{Bitmap16, FontTable, IconSet, text_glyph};
use crate::framebuffer::{FlushResult, FrameBuffer};
use crate::glyph::{GlyphCache, PageGlyph};
use crate::interface::DisplayInterface;

/// Cell width in pixels
pub const CELL_WIDTH: usize = 8;

/// Pixel rows per page
pub const PAGE_HEIGHT: usize = 8;

/// Most pages a controller addresses
pub const MAX_PAGES: usize = 8;

/// Highest column address reachable with the two nibble commands
const MAX_COLUMN: usize = 0xFF;

/// Pixel pages with text, icons and XOR overlays
#[derive(Debug)]
pub struct PageFrameBuffer<I: DisplayInterface> {
    interface: I,
    glyphs: GlyphCache<PageGlyph>,
    policy: DiffPolicy,
    width: usize,
    columns: usize,
    rows: usize,
    x_offset: usize,
    current: Vec<Vec<u8>>,
    previous: Vec<Vec<u8>>,
}

impl<I: DisplayInterface> PageFrameBuffer<I> {
    /// Build the pages and the glyph cache
    ///
    /// The panel height must be a whole number of text rows (16 pixels) and
    /// at most 8 pages tall.
    ///
    /// # Errors
    ///
    /// Fails if the font is not 8x16, the panel shape cannot be paged, or a
    /// configured grid is larger than the panel.
    pub fn new(
        interface: I,
        config: &Config,
        font: &FontTable,
        icons: &IconSet,
    ) -> Result<Self, BuilderError> {
        let glyphs = GlyphCache::new(font, icons, ())?;
        let dims = config.dimensions;
        let width = usize::from(dims.width);
        let height = usize::from(dims.height);
        let pages = height / PAGE_HEIGHT;
        if height % (2 * PAGE_HEIGHT) != 0
            || pages > MAX_PAGES
            || width % CELL_WIDTH != 0
            || width
                .checked_add(config.x_offset)
                .is_none_or(|end| end > MAX_COLUMN + 1)
        {
            return Err(BuilderError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }

        let fit = (width / CELL_WIDTH, pages / 2);
        let (columns, rows) = config.grid.unwrap_or(fit);
        if columns > fit.0 || rows > fit.1 {
            return Err(BuilderError::GridTooLarge { columns, rows });
        }
        debug!("page buffer {} pages x {} columns, grid {}x{}", pages, width, columns, rows);

        Ok(Self {
            interface,
            glyphs,
            policy: config.diff_policy,
            width,
            columns,
            rows,
            x_offset: config.x_offset,
            current: vec![vec![0; width]; pages],
            previous: vec![vec![0; width]; pages],
        })
    }

    /// Access the interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Access the interface mutably
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give the interface back
    pub fn release(self) -> I {
        self.interface
    }

    /// Number of pages
    pub fn pages(&self) -> usize {
        self.current.len()
    }

    /// Current content of one page
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        self.current.get(page).map(Vec::as_slice)
    }

    /// Whether pixel `(x, y)` is lit in the current frame
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.current
            .get(y / PAGE_HEIGHT)
            .and_then(|page| page.get(x))
            .is_some_and(|byte| byte & (1 << (y % PAGE_HEIGHT)) != 0)
    }

    fn put_cell(&mut self, x: usize, y: usize, glyph: PageGlyph) {
        let start = x * CELL_WIDTH;
        self.current[y * 2][start..start + CELL_WIDTH].copy_from_slice(&glyph.top);
        self.current[y * 2 + 1][start..start + CELL_WIDTH].copy_from_slice(&glyph.bottom);
    }

    fn xor_cell(&mut self, x: usize, y: usize, glyph: PageGlyph) {
        let start = x * CELL_WIDTH;
        let planes = [(y * 2, glyph.top), (y * 2 + 1, glyph.bottom)];
        for (page, plane) in planes {
            for (byte, bits) in self.current[page][start..start + CELL_WIDTH].iter_mut().zip(plane) {
                *byte ^= bits;
            }
        }
    }

    fn set_position(&mut self, page: usize, column: usize) -> Result<(), I::Error> {
        let column = column + self.x_offset;
        self.interface
            .send_command(ssd1306::SET_PAGE_ADDRESS | (page as u8 & 0x0F))?;
        self.interface
            .send_command(ssd1306::SET_COLUMN_HIGH | ((column >> 4) as u8 & 0x0F))?;
        self.interface
            .send_command(ssd1306::SET_COLUMN_LOW | (column as u8 & 0x0F))
    }
}

impl<I: DisplayInterface> FrameBuffer for PageFrameBuffer<I> {
    type Interface = I;

    fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    fn write_text(&mut self, x: usize, y: usize, text: &[u8]) {
        if y >= self.rows || x >= self.columns {
            return;
        }
        let len = text.len().min(self.columns - x);
        for (i, &code) in text[..len].iter().enumerate() {
            let glyph = *self.glyphs.lookup_char(code);
            self.put_cell(x + i, y, glyph);
        }
    }

    /// Icons take two cells and are only drawn when both fit; otherwise a
    /// character stand-in is tried. Returns 2 when an icon was drawn.
    fn write_glyph(&mut self, x: usize, y: usize, name: &str) -> usize {
        if x >= self.columns || y >= self.rows {
            return 1;
        }
        if let Some(&[left, right]) = self.glyphs.lookup(name) {
            if x + 1 < self.columns {
                self.put_cell(x, y, left);
                self.put_cell(x + 1, y, right);
                return 2;
            }
        }
        match text_glyph(name) {
            Some(code) => self.write_text(x, y, &[code]),
            None => debug!("no glyph named {}", name),
        }
        1
    }

    fn write_graphics(&mut self, x: usize, y: usize, bitmap: &Bitmap16) {
        if x >= self.columns || y >= self.rows {
            return;
        }
        let halves = [
            PageGlyph::from_rows(&bitmap.left()),
            PageGlyph::from_rows(&bitmap.right()),
        ];
        for (i, half) in halves.into_iter().enumerate() {
            if x + i < self.columns {
                self.xor_cell(x + i, y, half);
            }
        }
    }

    fn clear(&mut self) {
        for page in &mut self.current {
            page.fill(0);
        }
    }

    fn flush(&mut self) -> FlushResult<I> {
        for page in 0..self.current.len() {
            if self.current[page] == self.previous[page] {
                continue;
            }
            let runs = dirty_runs(&self.current[page], &self.previous[page], self.policy);
            for run in runs {
                trace!("page {} run {}+{}", page, run.start, run.count);
                let span = run.start..run.end();
                let words: Vec<u16> = self.current[page][span.clone()]
                    .iter()
                    .map(|&b| u16::from(b))
                    .collect();
                self.set_position(page, run.start).map_err(Error::Interface)?;
                self.interface
                    .send_pixel_data(&words)
                    .map_err(Error::Interface)?;
                let (current, previous) = (&self.current[page], &mut self.previous[page]);
                previous[span.clone()].copy_from_slice(&current[span]);
            }
        }
        Ok(())
    }

    fn clear_all(&mut self) -> FlushResult<I> {
        for page in 0..self.previous.len() {
            self.set_position(page, 0).map_err(Error::Interface)?;
            self.interface
                .send_fill(0, self.width as u32)
                .map_err(Error::Interface)?;
            self.previous[page].fill(0);
        }
        Ok(())
    }

    fn set_glyphs(&mut self, icons: &IconSet) -> Result<(), BuilderError> {
        self.glyphs.set_icons(icons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{execute_all, sim::PagePanel};
    use crate::config::{Builder, Chip, Dimensions};
    use crate::interface::{Command, Interface};
    use alloc::collections::VecDeque;

    #[derive(Debug, Default)]
    struct MockInterface {
        commands: Vec<u8>,
        data: Vec<Vec<u16>>,
        fills: Vec<(u16, u32)>,
        fail_after: Option<usize>,
        ops: usize,
    }

    impl MockInterface {
        fn tick(&mut self) -> Result<(), &'static str> {
            if self.fail_after.is_some_and(|n| self.ops >= n) {
                return Err("queue full");
            }
            self.ops += 1;
            Ok(())
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = &'static str;

        fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error> {
            self.tick()?;
            self.commands.push(opcode);
            Ok(())
        }

        fn send_command_with_params(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
            self.tick()?;
            self.commands.push(opcode);
            self.commands.extend_from_slice(params);
            Ok(())
        }

        fn send_pixel_data(&mut self, words: &[u16]) -> Result<(), Self::Error> {
            self.tick()?;
            self.data.push(words.to_vec());
            Ok(())
        }

        fn send_fill(&mut self, color: u16, count: u32) -> Result<(), Self::Error> {
            self.tick()?;
            self.fills.push((color, count));
            Ok(())
        }
    }

    /// 8x16 font: glyph `c` has row 0 = `c`, row 15 = `c`
    fn test_font() -> FontTable {
        let mut data = vec![0u8; 256 * 16];
        for (code, glyph) in data.chunks_exact_mut(16).enumerate() {
            if code != usize::from(b' ') {
                glyph[0] = code as u8;
                glyph[15] = code as u8;
            }
        }
        FontTable::new(8, 16, data).unwrap()
    }

    fn config(x_offset: usize) -> Config {
        Builder::new()
            .chip(Chip::Ssd1306)
            .dimensions(Dimensions::new(128, 64).unwrap())
            .x_offset(x_offset)
            .build()
            .unwrap()
    }

    fn framebuffer() -> PageFrameBuffer<MockInterface> {
        PageFrameBuffer::new(MockInterface::default(), &config(0), &test_font(), &IconSet::new())
            .unwrap()
    }

    fn block() -> Bitmap16 {
        let mut rows = [0u16; 16];
        rows[0] = 0xF00F;
        rows[9] = 0x0180;
        Bitmap16::from_rows(rows)
    }

    #[test]
    fn test_geometry() {
        let fb = framebuffer();
        assert_eq!(fb.dimensions(), (16, 4));
        assert_eq!(fb.pages(), 8);
    }

    #[test]
    fn test_rejects_unpageable_panels() {
        let dims = Dimensions::new(128, 40).unwrap();
        let short = Builder::new().dimensions(dims).build().unwrap();
        let result =
            PageFrameBuffer::new(MockInterface::default(), &short, &test_font(), &IconSet::new());
        assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));

        let wide_font = FontTable::new(16, 16, vec![0; 256 * 32]).unwrap();
        let result =
            PageFrameBuffer::new(MockInterface::default(), &config(0), &wide_font, &IconSet::new());
        assert!(matches!(result, Err(BuilderError::UnsupportedFont { .. })));
    }

    #[test]
    fn test_huge_offset_or_grid_is_rejected() {
        let result = PageFrameBuffer::new(
            MockInterface::default(),
            &config(usize::MAX),
            &test_font(),
            &IconSet::new(),
        );
        assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));

        let huge = Builder::new()
            .chip(Chip::Ssd1306)
            .dimensions(Dimensions::new(128, 64).unwrap())
            .grid(1usize << 60, 1)
            .build()
            .unwrap();
        let result =
            PageFrameBuffer::new(MockInterface::default(), &huge, &test_font(), &IconSet::new());
        assert!(matches!(result, Err(BuilderError::GridTooLarge { .. })));
    }

    #[test]
    fn test_text_lands_in_pages() {
        let mut fb = framebuffer();
        fb.write_text(1, 2, &[0x80]);
        // row 0 of the cell: page 4, column 8, top bit
        assert!(fb.pixel(8, 32));
        assert!(!fb.pixel(9, 32));
        // row 15: page 5
        assert!(fb.pixel(8, 47));
        assert_eq!(fb.page(4).unwrap()[8], 0x01);
        assert_eq!(fb.page(5).unwrap()[8], 0x80);
    }

    #[test]
    fn test_write_text_clamps_to_last_column() {
        let mut fb = framebuffer();
        fb.write_text(14, 0, &[0xFF; 5]);
        assert!(fb.pixel(14 * 8, 0));
        assert!(fb.pixel(127, 0));
        // nothing wrapped into the next text row
        assert!(fb.page(2).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_flush_emits_coalesced_runs() {
        let mut fb = framebuffer();
        fb.write_text(0, 0, &[0x01]);
        fb.flush().unwrap();
        // page 0 and page 1 each get one run of a single column
        assert_eq!(fb.interface().commands, vec![0xB0, 0x10, 0x07, 0xB1, 0x10, 0x07]);
        assert_eq!(fb.interface().data, vec![vec![0x01], vec![0x80]]);
    }

    #[test]
    fn test_nearby_changes_share_a_run() {
        let mut fb = framebuffer();
        fb.write_text(0, 0, &[0x80]);
        fb.flush().unwrap();
        fb.interface_mut().commands.clear();
        fb.interface_mut().data.clear();

        // columns 0 and 3 change in both pages: gap 2, one run of 4 each
        fb.write_text(0, 0, &[0x10]);
        fb.flush().unwrap();
        assert_eq!(fb.interface().data.len(), 2);
        assert!(fb.interface().data.iter().all(|run| run.len() == 4));
    }

    #[test]
    fn test_second_flush_is_silent() {
        let mut fb = framebuffer();
        fb.write_text(0, 0, b"Status");
        fb.write_text(3, 3, b"ok");
        fb.flush().unwrap();
        let sent = fb.interface().ops;
        fb.flush().unwrap();
        assert_eq!(fb.interface().ops, sent);
    }

    #[test]
    fn test_xor_overlay_restores_pixels() {
        let mut fb = framebuffer();
        fb.write_text(0, 1, b"AB");
        let before: Vec<Vec<u8>> = (0..8).map(|p| fb.page(p).unwrap().to_vec()).collect();

        fb.write_graphics(0, 1, &block());
        assert_ne!(fb.page(2).unwrap(), before[2].as_slice());
        fb.write_graphics(0, 1, &block());

        let after: Vec<Vec<u8>> = (0..8).map(|p| fb.page(p).unwrap().to_vec()).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_overlay_clipped_at_last_column() {
        let mut fb = framebuffer();
        fb.write_graphics(15, 0, &block());
        // only the left half fits
        assert!(fb.pixel(120, 0));
        assert!(!fb.pixel(127, 0));
        fb.write_graphics(16, 0, &block());
        fb.write_graphics(0, 4, &block());
    }

    #[test]
    fn test_icon_takes_two_cells() {
        let mut icons = IconSet::new();
        icons.insert("block".into(), block());
        let mut fb = framebuffer();
        fb.set_glyphs(&icons).unwrap();

        assert_eq!(fb.write_glyph(0, 0, "block"), 2);
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(15, 0));
        assert!(fb.pixel(7, 9));
        assert!(fb.pixel(8, 9));

        // no room for the right half: nothing drawn
        assert_eq!(fb.write_glyph(15, 1, "block"), 1);
        assert!(fb.page(2).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_glyph_fallbacks() {
        let mut fb = framebuffer();
        assert_eq!(fb.write_glyph(0, 0, "right_arrow"), 1);
        assert_eq!(fb.page(0).unwrap()[5], 0x01); // '>' = 0x3E, column 5 set
        assert_eq!(fb.write_glyph(2, 0, "unknown"), 1);
        assert!(fb.page(0).unwrap()[16..24].iter().all(|&b| b == 0));
        assert_eq!(fb.write_glyph(40, 9, "block"), 1);
    }

    #[test]
    fn test_clear_all_fills_every_page() {
        let mut fb = framebuffer();
        fb.clear_all().unwrap();
        assert_eq!(fb.interface().fills, vec![(0, 128); 8]);
        assert_eq!(fb.interface().commands.len(), 8 * 3);
        assert_eq!(fb.interface().commands[3..6], [0xB1, 0x10, 0x00]);
    }

    #[test]
    fn test_failed_flush_resends_remaining_runs() {
        let mut fb = framebuffer();
        fb.write_text(0, 0, &[0x01]);
        // first run (3 commands + data) succeeds, second fails
        fb.interface_mut().fail_after = Some(5);
        assert!(fb.flush().is_err());

        fb.interface_mut().fail_after = None;
        fb.interface_mut().data.clear();
        fb.flush().unwrap();
        assert_eq!(fb.interface().data, vec![vec![0x80]]);
    }

    #[test]
    fn test_flush_paints_panel_with_offset() {
        let interface = Interface::new(VecDeque::new(), 0);
        let mut fb = PageFrameBuffer::new(interface, &config(2), &test_font(), &IconSet::new())
            .unwrap();
        fb.clear_all().unwrap();
        fb.write_text(0, 0, b"Hi");
        fb.write_text(2, 3, &[0xFF]);
        fb.flush().unwrap();
        fb.write_text(2, 3, &[0x81]);
        fb.flush().unwrap();

        let expected: Vec<Vec<u8>> = (0..8).map(|p| fb.page(p).unwrap().to_vec()).collect();
        let queue: Vec<Command> = fb.release().release().into_iter().collect();
        let mut panel = PagePanel::new(132, 8);
        execute_all(&mut panel, &queue);

        for (page, bytes) in expected.iter().enumerate() {
            assert_eq!(&panel.ram[page][2..130], bytes.as_slice());
        }
        assert!(panel.pixel(2 + 16, 48));
        assert!(panel.pixel(2 + 23, 48));
        assert!(!panel.pixel(2 + 17, 48));
    }
}
