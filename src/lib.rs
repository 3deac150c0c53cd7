//! Text and icon rendering for TFT panels on an 8080-style parallel bus
//!
//! Renders a grid of character cells and named 16x16 icons to small panels
//! driven by a microcontroller over an Intel 8080-style parallel command bus.
//! Drawing only changes an in-memory frame buffer; [`FrameBuffer::flush`]
//! compares it with what the panel shows and transmits just the difference as
//! a stream of [`Command`]s.
//!
//! ## Features
//!
//! - `no_std` compatible (requires `alloc`)
//! - `embedded-hal` v1.0 delays for controller bring-up
//! - `embedded-graphics` pixel colors and built-in fonts (with `graphics` feature)
//! - SSD1963 and ILI9488 color panels, redrawn one changed cell at a time
//! - SSD1306-style monochrome page panels, redrawn in coalesced byte runs
//! - XOR overlays on page panels
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::VecDeque;
//! use embedded_hal::delay::DelayNs;
//! use i8080_tft::{
//!     Bitmap16, Builder, Chip, Command, Dimensions, FontTable, FrameBuffer, IconSet,
//!     Interface, Panel,
//! };
//!
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().chip(Chip::Ssd1306).dimensions(dims).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let font = match FontTable::new(8, 16, vec![0xFF; 256 * 16]) {
//!     Ok(font) => font,
//!     Err(_) => return,
//! };
//! let mut icons = IconSet::new();
//! icons.insert("fan".into(), Bitmap16::from_rows([0xFFFF; 16]));
//!
//! let interface = Interface::new(VecDeque::new(), 0);
//! let mut panel = match Panel::new(interface, &config, &font, &icons) {
//!     Ok(panel) => panel,
//!     Err(_) => return,
//! };
//! let _ = panel.initialize(&mut delay);
//!
//! if let Ok(fb) = panel.framebuffer() {
//!     let advance = fb.write_glyph(0, 0, "fan");
//!     fb.write_text(advance, 0, b"42%");
//!     let _ = fb.flush();
//! }
//!
//! let queue = panel.release().release();
//! assert!(queue.iter().any(|c| matches!(c, Command::Data16 { .. })));
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

/// Parallel bus execution of queued commands
pub mod bus;
/// Cell-grid frame buffer for window-addressed panels
pub mod cells;
/// 16-bit panel colors
pub mod color;
/// Wire templates and controller opcodes
pub mod command;
/// Panel configuration types and builder
pub mod config;
/// Dirty-run detection and coalescing
pub mod diff;
/// Error types for the renderer
pub mod error;
/// Font tables and icon bitmaps
pub mod font;
/// Frame buffer contract
pub mod framebuffer;
/// Pre-rendered glyph caches
pub mod glyph;
/// Command queue abstraction
pub mod interface;
/// Page frame buffer for monochrome panels
pub mod pages;
/// Controller bring-up and panel lifecycle
pub mod panel;
/// Bit-level glyph transforms
pub mod swizzle;

pub use bus::ParallelBus;
pub use color::{Color, Palette};
pub use config::{Addressing, Builder, Chip, Config, Dimensions, MAX_HEIGHT, MAX_WIDTH};
pub use diff::{DiffPolicy, DirtyRun};
pub use error::{BuilderError, Error};
pub use font::{Bitmap16, FontTable, IconSet};
pub use framebuffer::{Cell, CellFrameBuffer, FrameBuffer, PageFrameBuffer, Surface};
pub use glyph::{ColorGlyph, GlyphCache, PageGlyph};
pub use interface::{Command, CommandQueue, DisplayInterface, Interface, InterfaceError};
pub use panel::{InitStep, Panel, PanelState};
