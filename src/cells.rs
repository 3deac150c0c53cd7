//! Cell-grid frame buffer for window-addressed color panels
//!
//! The screen is a grid of 16-pixel-wide text cells, centred on the panel.
//! Each cell that differs from what the panel shows is sent on its own: an
//! address window over the cell's rectangle, a memory write, and the
//! cell's pre-expanded color words. Cells are not merged because two dirty
//! cells are rarely adjacent in panel memory.
//!
//! ## Command sequence per dirty cell
//!
//! 1. Column address set: `[x0 >> 8, x0, x1 >> 8, x1]`
//! 2. Page address set: `[y0 >> 8, y0, y1 >> 8, y1]`
//! 3. Memory write
//! 4. `16 * cell_height` pixel words

use alloc::vec;
use alloc::vec::Vec;
use log::{debug, trace};

use crate::color::Color;
use crate::command::dcs;
use crate::config::Config;
use crate::error::{BuilderError, Error};
use crate::font::{FontTable, IconSet, text_glyph};
use crate::framebuffer::{Cell, FlushResult, FrameBuffer};
use crate::glyph::{ColorGlyph, GlyphCache};
use crate::interface::DisplayInterface;

/// Cell width in pixels
pub const CELL_WIDTH: usize = 16;

/// Set the panel's address window to `(x0, y0)-(x1, y1)` and start a memory write
pub fn set_address_window<I: DisplayInterface>(
    interface: &mut I,
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
) -> Result<(), I::Error> {
    let [x0h, x0l] = x0.to_be_bytes();
    let [x1h, x1l] = x1.to_be_bytes();
    let [y0h, y0l] = y0.to_be_bytes();
    let [y1h, y1l] = y1.to_be_bytes();
    interface.send_command_with_params(dcs::COLUMN_ADDRESS_SET, &[x0h, x0l, x1h, x1l])?;
    interface.send_command_with_params(dcs::PAGE_ADDRESS_SET, &[y0h, y0l, y1h, y1l])?;
    interface.send_command(dcs::MEMORY_WRITE)
}

/// Character and icon grid over a 16-bit window-addressed panel
#[derive(Debug)]
pub struct CellFrameBuffer<I: DisplayInterface> {
    interface: I,
    glyphs: GlyphCache<ColorGlyph>,
    background: Color,
    columns: usize,
    rows: usize,
    cell_height: usize,
    width: u16,
    height: u16,
    x_offset: usize,
    y_offset: usize,
    current: Vec<Cell>,
    previous: Vec<Cell>,
}

impl<I: DisplayInterface> CellFrameBuffer<I> {
    /// Build the grid and its glyph cache
    ///
    /// Without a configured grid, as many cells as fit on the panel are
    /// used. The grid is centred; leftover pixels become margins.
    ///
    /// # Errors
    ///
    /// Fails if the font is not 16 pixels wide, an icon does not fit a cell,
    /// or the grid does not fit on the panel.
    pub fn new(
        interface: I,
        config: &Config,
        font: &FontTable,
        icons: &IconSet,
    ) -> Result<Self, BuilderError> {
        let glyphs = GlyphCache::new(font, icons, config.palette)?;
        let cell_height = font.height();
        let width = usize::from(config.dimensions.width);
        let height = usize::from(config.dimensions.height);
        let (columns, rows) = config
            .grid
            .unwrap_or((width / CELL_WIDTH, height / cell_height));
        let fits = columns.checked_mul(CELL_WIDTH).is_some_and(|w| w <= width)
            && rows.checked_mul(cell_height).is_some_and(|h| h <= height);
        if !fits {
            return Err(BuilderError::GridTooLarge { columns, rows });
        }
        debug!(
            "cell grid {}x{} of {}x{} on {}x{}",
            columns, rows, CELL_WIDTH, cell_height, width, height
        );

        let cells = columns * rows;
        Ok(Self {
            interface,
            glyphs,
            background: config.palette.background,
            columns,
            rows,
            cell_height,
            width: config.dimensions.width,
            height: config.dimensions.height,
            x_offset: (width - columns * CELL_WIDTH) / 2,
            y_offset: (height - rows * cell_height) / 2,
            current: vec![Cell::BLANK; cells],
            previous: vec![Cell::BLANK; cells],
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

    /// Pixel position of the grid's top-left corner
    pub fn offset(&self) -> (usize, usize) {
        (self.x_offset, self.y_offset)
    }

    /// Cell size in pixels
    pub fn cell_size(&self) -> (usize, usize) {
        (CELL_WIDTH, self.cell_height)
    }

    /// Content of cell `(x, y)`
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        self.current.get(y * self.columns + x)
    }

    fn draw_cell(&mut self, index: usize) -> Result<(), I::Error> {
        let (col, row) = (index % self.columns, index / self.columns);
        let x0 = self.x_offset + col * CELL_WIDTH;
        let y0 = self.y_offset + row * self.cell_height;
        let x1 = x0 + CELL_WIDTH - 1;
        let y1 = y0 + self.cell_height - 1;

        let glyph = match &self.current[index] {
            Cell::Char(code) => self.glyphs.lookup_char(*code),
            Cell::Icon(name) => self.glyphs.lookup(name).unwrap_or_else(|| {
                debug!("icon {} no longer registered, drawing blank", name);
                self.glyphs.lookup_char(b' ')
            }),
        };
        trace!("cell ({}, {}) -> ({}, {})-({}, {})", col, row, x0, y0, x1, y1);

        set_address_window(
            &mut self.interface,
            x0 as u16,
            y0 as u16,
            x1 as u16,
            y1 as u16,
        )?;
        self.interface.send_pixel_data(glyph.words())
    }
}

impl<I: DisplayInterface> FrameBuffer for CellFrameBuffer<I> {
    type Interface = I;

    fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    fn write_text(&mut self, x: usize, y: usize, text: &[u8]) {
        if y >= self.rows || x >= self.columns {
            return;
        }
        let len = text.len().min(self.columns - x);
        let start = y * self.columns + x;
        for (cell, &code) in self.current[start..start + len].iter_mut().zip(text) {
            *cell = Cell::Char(code);
        }
    }

    fn write_glyph(&mut self, x: usize, y: usize, name: &str) -> usize {
        if x >= self.columns || y >= self.rows {
            return 1;
        }
        let index = y * self.columns + x;
        if self.glyphs.lookup(name).is_some() {
            self.current[index] = Cell::Icon(name.into());
        } else if let Some(code) = text_glyph(name) {
            self.current[index] = Cell::Char(code);
        } else {
            debug!("no glyph named {}", name);
        }
        1
    }

    fn clear(&mut self) {
        self.current.fill(Cell::BLANK);
    }

    fn flush(&mut self) -> FlushResult<I> {
        for index in 0..self.current.len() {
            if self.current[index] == self.previous[index] {
                continue;
            }
            self.draw_cell(index).map_err(Error::Interface)?;
            self.previous[index] = self.current[index].clone();
        }
        Ok(())
    }

    fn clear_all(&mut self) -> FlushResult<I> {
        set_address_window(
            &mut self.interface,
            0,
            0,
            self.width - 1,
            self.height - 1,
        )
        .map_err(Error::Interface)?;
        let count = u32::from(self.width) * u32::from(self.height);
        self.interface
            .send_fill(self.background.raw(), count)
            .map_err(Error::Interface)?;
        self.previous.fill(Cell::BLANK);
        Ok(())
    }

    fn set_glyphs(&mut self, icons: &IconSet) -> Result<(), BuilderError> {
        self.glyphs.set_icons(icons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{execute_all, sim::WindowPanel};
    use crate::color::{Color, Palette};
    use crate::config::{Builder, Dimensions};
    use crate::font::Bitmap16;
    use crate::interface::{Command, Interface};
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    const FG: u16 = 0xFFFF;
    const BG: u16 = 0x0842;

    #[derive(Debug, Default)]
    struct MockInterface {
        commands: Vec<(u8, Vec<u8>)>,
        pixels: Vec<u16>,
        fills: Vec<(u16, u32)>,
        /// Fail once this many operations succeeded
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

        fn windows(&self) -> usize {
            self.commands
                .iter()
                .filter(|(op, _)| *op == dcs::MEMORY_WRITE)
                .count()
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = &'static str;

        fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error> {
            self.tick()?;
            self.commands.push((opcode, Vec::new()));
            Ok(())
        }

        fn send_command_with_params(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
            self.tick()?;
            self.commands.push((opcode, params.to_vec()));
            Ok(())
        }

        fn send_pixel_data(&mut self, words: &[u16]) -> Result<(), Self::Error> {
            self.tick()?;
            self.pixels.extend_from_slice(words);
            Ok(())
        }

        fn send_fill(&mut self, color: u16, count: u32) -> Result<(), Self::Error> {
            self.tick()?;
            self.fills.push((color, count));
            Ok(())
        }
    }

    /// 16x24 font where every glyph has its character code as row 0
    fn test_font() -> FontTable {
        let mut data = vec![0u8; 256 * 48];
        for (code, glyph) in data.chunks_exact_mut(48).enumerate() {
            if code != usize::from(b' ') {
                glyph[1] = code as u8;
            }
        }
        FontTable::new(16, 24, data).unwrap()
    }

    fn config(width: u16, height: u16, grid: Option<(usize, usize)>) -> Config {
        let mut builder = Builder::new()
            .dimensions(Dimensions::new(width, height).unwrap())
            .foreground(Color(FG))
            .background(Color(BG));
        if let Some((c, r)) = grid {
            builder = builder.grid(c, r);
        }
        builder.build().unwrap()
    }

    fn framebuffer(grid: (usize, usize)) -> CellFrameBuffer<MockInterface> {
        CellFrameBuffer::new(
            MockInterface::default(),
            &config(320, 480, Some(grid)),
            &test_font(),
            &IconSet::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_grid_is_centred() {
        let fb = framebuffer((16, 4));
        assert_eq!(fb.dimensions(), (16, 4));
        assert_eq!(fb.offset(), ((320 - 256) / 2, (480 - 96) / 2));
    }

    #[test]
    fn test_default_grid_fills_panel() {
        let fb = CellFrameBuffer::new(
            MockInterface::default(),
            &config(480, 272, None),
            &test_font(),
            &IconSet::new(),
        )
        .unwrap();
        assert_eq!(fb.dimensions(), (30, 11));
        assert_eq!(fb.offset(), (0, 4));
    }

    #[test]
    fn test_grid_too_large() {
        let result = CellFrameBuffer::new(
            MockInterface::default(),
            &config(320, 480, Some((21, 4))),
            &test_font(),
            &IconSet::new(),
        );
        assert!(matches!(
            result,
            Err(BuilderError::GridTooLarge { columns: 21, rows: 4 })
        ));
    }

    #[test]
    fn test_huge_grid_is_rejected() {
        for grid in [(1usize << 60, 1), (1, 1usize << 60), (usize::MAX, usize::MAX)] {
            let result = CellFrameBuffer::new(
                MockInterface::default(),
                &config(320, 480, Some(grid)),
                &test_font(),
                &IconSet::new(),
            );
            assert!(matches!(result, Err(BuilderError::GridTooLarge { .. })));
        }
    }

    #[test]
    fn test_write_text_clamps_to_last_column() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(14, 1, b"ABCDE");
        assert_eq!(fb.cell(14, 1), Some(&Cell::Char(b'A')));
        assert_eq!(fb.cell(15, 1), Some(&Cell::Char(b'B')));
        // nothing wrapped onto the next row
        assert_eq!(fb.cell(0, 2), Some(&Cell::BLANK));
    }

    #[test]
    fn test_write_text_out_of_rows_is_ignored() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(0, 4, b"X");
        fb.write_text(16, 0, b"X");
        fb.flush().unwrap();
        assert!(fb.interface().commands.is_empty());
    }

    #[test]
    fn test_flush_sends_window_per_cell() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(1, 0, b"A");
        fb.flush().unwrap();

        let (x0, y0) = fb.offset();
        let x0 = x0 + 16;
        let commands = &fb.interface().commands;
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[0],
            (
                dcs::COLUMN_ADDRESS_SET,
                vec![0, x0 as u8, 0, (x0 + 15) as u8]
            )
        );
        assert_eq!(
            commands[1],
            (
                dcs::PAGE_ADDRESS_SET,
                vec![(y0 >> 8) as u8, y0 as u8, ((y0 + 23) >> 8) as u8, (y0 + 23) as u8]
            )
        );
        assert_eq!(commands[2], (dcs::MEMORY_WRITE, Vec::new()));
        assert_eq!(fb.interface().pixels.len(), 16 * 24);
    }

    #[test]
    fn test_second_flush_is_silent() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(0, 0, b"Hello");
        fb.write_text(0, 3, b"World");
        fb.flush().unwrap();
        let sent = fb.interface().ops;
        fb.flush().unwrap();
        assert_eq!(fb.interface().ops, sent);
    }

    #[test]
    fn test_unchanged_cells_are_skipped() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(0, 0, b"abc");
        fb.flush().unwrap();
        fb.write_text(0, 0, b"abd");
        fb.flush().unwrap();
        assert_eq!(fb.interface().windows(), 4);
    }

    #[test]
    fn test_clear_repaints_only_non_blank() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(0, 0, b"ab");
        fb.flush().unwrap();
        fb.clear();
        fb.flush().unwrap();
        // two cells drawn, then the same two drawn blank
        assert_eq!(fb.interface().windows(), 4);
        fb.flush().unwrap();
        assert_eq!(fb.interface().windows(), 4);
    }

    #[test]
    fn test_clear_all_is_one_window_and_one_fill() {
        let mut fb = framebuffer((16, 4));
        fb.clear_all().unwrap();
        let commands = &fb.interface().commands;
        assert_eq!(commands[0], (dcs::COLUMN_ADDRESS_SET, vec![0, 0, 0x01, 0x3F]));
        assert_eq!(commands[1], (dcs::PAGE_ADDRESS_SET, vec![0, 0, 0x01, 0xDF]));
        assert_eq!(commands[2], (dcs::MEMORY_WRITE, Vec::new()));
        assert_eq!(fb.interface().fills, vec![(BG, 320 * 480)]);
        assert!(fb.interface().pixels.is_empty());
    }

    #[test]
    fn test_clear_all_forces_repaint() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(0, 0, b"ab");
        fb.flush().unwrap();
        fb.clear_all().unwrap();
        fb.flush().unwrap();
        assert_eq!(fb.interface().windows(), 2 + 1 + 2);
    }

    #[test]
    fn test_unknown_glyph_is_noop_consuming_one() {
        let mut fb = framebuffer((16, 4));
        assert_eq!(fb.write_glyph(0, 0, "nope"), 1);
        assert_eq!(fb.write_glyph(99, 99, "nope"), 1);
        assert_eq!(fb.cell(0, 0), Some(&Cell::BLANK));
    }

    #[test]
    fn test_text_glyph_fallback() {
        let mut fb = framebuffer((16, 4));
        assert_eq!(fb.write_glyph(2, 0, "degrees"), 1);
        assert_eq!(fb.cell(2, 0), Some(&Cell::Char(0xB0)));
    }

    #[test]
    fn test_icon_cells_and_removal() {
        let mut icons = IconSet::new();
        icons.insert("full".into(), Bitmap16::from_rows([0xFFFF; 16]));
        let mut fb = framebuffer((16, 4));
        fb.set_glyphs(&icons).unwrap();
        fb.write_glyph(0, 0, "full");
        assert_eq!(fb.cell(0, 0), Some(&Cell::Icon("full".into())));
        fb.flush().unwrap();
        let pixels = &fb.interface().pixels;
        assert!(pixels[..4 * 16].iter().all(|&w| w == BG));
        assert!(pixels[4 * 16..20 * 16].iter().all(|&w| w == FG));

        // icon dropped from the set: a repaint draws the cell blank
        fb.set_glyphs(&IconSet::new()).unwrap();
        fb.clear_all().unwrap();
        fb.interface_mut().pixels.clear();
        fb.flush().unwrap();
        assert_eq!(fb.interface().pixels.len(), 16 * 24);
        assert!(fb.interface().pixels.iter().all(|&w| w == BG));
    }

    #[test]
    fn test_failed_flush_keeps_unsent_cells_dirty() {
        let mut fb = framebuffer((16, 4));
        fb.write_text(0, 0, b"abc");
        // cell a: 4 operations; fail inside cell b
        fb.interface_mut().fail_after = Some(6);
        assert!(matches!(fb.flush(), Err(Error::Interface("queue full"))));

        fb.interface_mut().fail_after = None;
        fb.interface_mut().commands.clear();
        fb.flush().unwrap();
        // a was sent; b and c are retried
        assert_eq!(fb.interface().windows(), 2);
    }

    #[test]
    fn test_flush_paints_panel() {
        let channel = Interface::new(VecDeque::new(), 0);
        let mut fb =
            CellFrameBuffer::new(channel, &config(64, 48, Some((2, 1))), &test_font(), &IconSet::new())
                .unwrap();
        fb.clear_all().unwrap();
        fb.write_text(0, 0, &[0x81, 0x01]);
        fb.flush().unwrap();

        let queue: Vec<Command> = fb.release().release().into_iter().collect();
        let mut panel = WindowPanel::new(64, 48);
        execute_all(&mut panel, &queue);

        let palette = Palette::new(Color(FG), Color(BG));
        let (x0, y0) = (16, 12);
        // 0x81: pixels 0 and 7 of the first scanline
        assert_eq!(panel.pixel(x0, y0), palette.foreground.raw());
        assert_eq!(panel.pixel(x0 + 1, y0), BG);
        assert_eq!(panel.pixel(x0 + 7, y0), FG);
        // 0x01 in the second cell: only the eighth pixel
        assert_eq!(panel.pixel(x0 + 16, y0), BG);
        assert_eq!(panel.pixel(x0 + 23, y0), FG);
        assert_eq!(panel.pixel(x0, y0 + 1), BG);
        // margins keep the background
        assert_eq!(panel.pixel(0, 0), BG);
        assert_eq!(panel.pixel(63, 47), BG);
    }
}
