//! Panel drivers
//!
//! A [`Panel`] owns the frame buffer for one physical panel and brings the
//! controller up before handing that frame buffer out.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --initialize ok--> Ready
//!       |
//!       +-------initialize err---> Failed
//! ```
//!
//! Initialization plays the family's fixed register table (see
//! [`init_sequence`]), clears the whole panel to the background color and
//! marks the panel `Ready`. It runs once; a transport error on the way is
//! fatal and the panel must be rebuilt.
//!
//! ## Example
//!
//! ```
//! use std::collections::VecDeque;
//! use embedded_hal::delay::DelayNs;
//! use i8080_tft::{
//!     Builder, Chip, Dimensions, FontTable, FrameBuffer, IconSet, Interface, Panel,
//! };
//!
//! struct NoDelay;
//! impl DelayNs for NoDelay {
//!     fn delay_ns(&mut self, _ns: u32) {}
//! }
//!
//! let config = Builder::new()
//!     .chip(Chip::Ili9488)
//!     .dimensions(Dimensions::new(480, 320).unwrap())
//!     .grid(20, 8)
//!     .build()
//!     .unwrap();
//! let font = FontTable::new(16, 24, vec![0; 256 * 48]).unwrap();
//! let interface = Interface::new(VecDeque::new(), 0);
//!
//! let mut panel = Panel::new(interface, &config, &font, &IconSet::new()).unwrap();
//! panel.initialize(&mut NoDelay).unwrap();
//!
//! let fb = panel.framebuffer().unwrap();
//! fb.write_text(0, 0, b"Ready");
//! fb.flush().unwrap();
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::cells::CellFrameBuffer;
use crate::command::{dcs, ili9488, ssd1306, ssd1963};
use crate::config::{Addressing, Chip, Config};
use crate::error::{BuilderError, Error};
use crate::font::{FontTable, IconSet};
use crate::framebuffer::{FrameBuffer, Surface};
use crate::interface::DisplayInterface;
use crate::pages::PageFrameBuffer;

type PanelResult<I> = core::result::Result<(), Error<I>>;

/// Settle time after each SSD1963 PLL start pulse
pub const PLL_SETTLE_MS: u32 = 10;

/// Settle time after a soft reset
pub const RESET_SETTLE_MS: u32 = 100;

/// Settle time after leaving sleep mode
pub const SLEEP_OUT_SETTLE_MS: u32 = 120;

/// One step of a controller bring-up table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStep {
    /// Zero-parameter command
    Command(u8),
    /// Command with parameter bytes
    Params(u8, &'static [u8]),
    /// Bytes each sent as its own command
    Commands(&'static [u8]),
    /// Wait at least this many milliseconds
    DelayMs(u32),
}

/// SSD1963 on a 480x272 panel, 16-bit 565 pixels
pub const SSD1963_INIT: &[InitStep] = &[
    // VCO = 25 MHz * 24, PLL = VCO / 5 = 120 MHz
    InitStep::Params(ssd1963::SET_PLL_MN, &[0x17, 0x04, 0x54]),
    InitStep::Params(ssd1963::START_PLL, &[0x01]),
    InitStep::DelayMs(PLL_SETTLE_MS),
    InitStep::Params(ssd1963::START_PLL, &[0x03]),
    InitStep::DelayMs(PLL_SETTLE_MS),
    InitStep::Command(dcs::SOFT_RESET),
    InitStep::DelayMs(RESET_SETTLE_MS),
    // 12 MHz pixel clock
    InitStep::Params(ssd1963::SET_LSHIFT_FREQ, &[0x01, 0x33, 0x32]),
    InitStep::Params(ssd1963::SET_LCD_MODE, &[0x00, 0x00, 0x01, 0xDF, 0x01, 0x0F, 0x00]),
    InitStep::Params(
        ssd1963::SET_HORI_PERIOD,
        &[0x02, 0x0A, 0x00, 0x29, 0x00, 0x00, 0x00, 0x00],
    ),
    InitStep::Params(
        ssd1963::SET_VERT_PERIOD,
        &[0x01, 0x1B, 0x00, 0x0A, 0x01, 0x00, 0x00],
    ),
    InitStep::Params(ssd1963::SET_PIXEL_DATA_INTERFACE, &[0x03]),
    InitStep::Params(ssd1963::SET_POST_PROC, &[0x40, 0x80, 0x40, 0x01]),
    InitStep::Command(dcs::DISPLAY_ON),
    InitStep::Params(dcs::ADDRESS_MODE, &[0x00]),
];

/// ILI9488 in landscape, 16-bit 565 pixels
pub const ILI9488_INIT: &[InitStep] = &[
    InitStep::Params(ili9488::POWER_CONTROL_1, &[0x0C, 0x02]),
    InitStep::Params(ili9488::POWER_CONTROL_2, &[0x44]),
    InitStep::Params(ili9488::VCOM_CONTROL, &[0x00, 0x16, 0x80]),
    InitStep::Params(dcs::ADDRESS_MODE, &[0x28]),
    InitStep::Params(dcs::PIXEL_FORMAT, &[0x55]),
    InitStep::Params(ili9488::INTERFACE_MODE, &[0x00]),
    InitStep::Params(ili9488::FRAME_RATE, &[0xB0]),
    InitStep::Params(ili9488::INVERSION_CONTROL, &[0x02]),
    InitStep::Params(ili9488::DISPLAY_FUNCTION, &[0x02, 0x02]),
    InitStep::Params(ili9488::SET_IMAGE_FUNCTION, &[0x00]),
    InitStep::Params(ili9488::ADJUST_CONTROL_3, &[0xA9, 0x51, 0x2C, 0x82]),
    InitStep::Command(dcs::SLEEP_OUT),
    InitStep::DelayMs(SLEEP_OUT_SETTLE_MS),
    InitStep::Command(dcs::DISPLAY_ON),
];

/// SSD1306 on a 128x64 panel with internal charge pump
pub const SSD1306_INIT: &[InitStep] = &[InitStep::Commands(&[
    ssd1306::DISPLAY_OFF,
    ssd1306::SET_CLOCK_DIV,
    0x80,
    ssd1306::SET_MULTIPLEX,
    0x3F,
    ssd1306::SET_DISPLAY_OFFSET,
    0x00,
    ssd1306::SET_START_LINE,
    ssd1306::CHARGE_PUMP,
    0x14,
    ssd1306::SET_MEMORY_MODE,
    0x02,
    ssd1306::SEGMENT_REMAP,
    ssd1306::COM_SCAN_DEC,
    ssd1306::SET_COM_PINS,
    0x12,
    ssd1306::SET_CONTRAST,
    0xEF,
    ssd1306::SET_PRECHARGE,
    0xA1,
    ssd1306::SET_VCOM_DETECT,
    0x00,
    ssd1306::DISPLAY_ALL_ON_RESUME,
    ssd1306::NORMAL_DISPLAY,
    ssd1306::DISPLAY_ON,
])];

/// Bring-up table of a controller family
pub fn init_sequence(chip: Chip) -> &'static [InitStep] {
    match chip {
        Chip::Ssd1963 => SSD1963_INIT,
        Chip::Ili9488 => ILI9488_INIT,
        Chip::Ssd1306 => SSD1306_INIT,
    }
}

/// Where a panel is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    /// Built, nothing sent yet
    Uninitialized,
    /// Initialized; the frame buffer may be used
    Ready,
    /// Initialization failed; rebuild the panel
    Failed,
}

/// One panel: controller bring-up plus its frame buffer
#[derive(Debug)]
pub struct Panel<I: DisplayInterface> {
    chip: Chip,
    state: PanelState,
    surface: Surface<I>,
}

impl<I: DisplayInterface> Panel<I> {
    /// Build a panel and its frame buffer
    ///
    /// Window-addressed families get a [`CellFrameBuffer`], page-addressed
    /// ones a [`PageFrameBuffer`]. Nothing is sent until
    /// [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Fails if the font, icons or grid do not suit the panel.
    pub fn new(
        interface: I,
        config: &Config,
        font: &FontTable,
        icons: &IconSet,
    ) -> Result<Self, BuilderError> {
        let surface = match config.chip.addressing() {
            Addressing::Window => {
                Surface::Cells(CellFrameBuffer::new(interface, config, font, icons)?)
            }
            Addressing::Page => {
                Surface::Pages(PageFrameBuffer::new(interface, config, font, icons)?)
            }
        };
        Ok(Self {
            chip: config.chip,
            state: PanelState::Uninitialized,
            surface,
        })
    }

    /// Build a panel with the built-in font for its family
    #[cfg(feature = "graphics")]
    pub fn with_builtin_font(
        interface: I,
        config: &Config,
        icons: &IconSet,
    ) -> Result<Self, BuilderError> {
        let font = match config.chip.addressing() {
            Addressing::Window => FontTable::builtin_cells(),
            Addressing::Page => FontTable::builtin_pages(),
        };
        Self::new(interface, config, &font, icons)
    }

    /// Run the bring-up table and clear the panel
    ///
    /// # Errors
    ///
    /// Returns `Error::NotReady` unless the panel is uninitialized, and
    /// `Error::Interface` if a command could not be queued. After an
    /// interface error the panel stays `Failed`.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> PanelResult<I> {
        if self.state != PanelState::Uninitialized {
            return Err(Error::NotReady { state: self.state });
        }
        match self.bring_up(delay) {
            Ok(()) => {
                debug!("{:?} ready", self.chip);
                self.state = PanelState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!("{:?} initialization failed: {}", self.chip, e);
                self.state = PanelState::Failed;
                Err(e)
            }
        }
    }

    fn bring_up<D: DelayNs>(&mut self, delay: &mut D) -> PanelResult<I> {
        let interface = self.surface.interface_mut();
        for step in init_sequence(self.chip) {
            let sent = match *step {
                InitStep::Command(opcode) => interface.send_command(opcode),
                InitStep::Params(opcode, params) => {
                    interface.send_command_with_params(opcode, params)
                }
                InitStep::Commands(opcodes) => opcodes
                    .iter()
                    .try_for_each(|&opcode| interface.send_command(opcode)),
                InitStep::DelayMs(ms) => {
                    debug!("{:?} settle {} ms", self.chip, ms);
                    delay.delay_ms(ms);
                    Ok(())
                }
            };
            sent.map_err(Error::Interface)?;
        }
        self.surface.clear_all()
    }

    /// The frame buffer, once the panel is ready
    ///
    /// # Errors
    ///
    /// Returns `Error::NotReady` before a successful
    /// [`initialize`](Self::initialize).
    pub fn framebuffer(&mut self) -> Result<&mut Surface<I>, Error<I>> {
        match self.state {
            PanelState::Ready => Ok(&mut self.surface),
            state => Err(Error::NotReady { state }),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Controller family
    pub fn chip(&self) -> Chip {
        self.chip
    }

    /// Give the interface back
    pub fn release(self) -> I {
        self.surface.release()
    }
}
