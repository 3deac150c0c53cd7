//! Wire templates and panel opcodes
//!
//! Two layers of constants live here:
//!
//! 1. The four transaction templates understood by the microcontroller's
//!    8080 firmware. Every queued [`Command`](crate::interface::Command)
//!    renders to exactly one of them.
//! 2. The register opcodes of the panel controllers themselves. These travel
//!    inside the `cmd=` field of a template.
//!
//! ## Transaction shape on the panel side
//!
//! 1. Register write (RS low) carrying the opcode
//! 2. One data write (RS high) per parameter byte or pixel word
//!
//! ## Example
//!
//! ```
//! use i8080_tft::command;
//!
//! assert_eq!(command::dcs::MEMORY_WRITE, 0x2C);
//! assert!(command::TEMPLATE_FILL.starts_with("i8080_send_fill"));
//! ```

/// Zero-parameter command template
pub const TEMPLATE_CMD: &str = "i8080_send_cmd oid=%c cmd=%c";

/// Command with byte parameters
pub const TEMPLATE_CMD_PARAMS: &str = "i8080_send_cmd_param8 oid=%c cmd=%c param=%*s";

/// Raw 16-bit pixel data stream into the current address window
pub const TEMPLATE_DATA16: &str = "i8080_send_data16 oid=%c data=%*s";

/// Device-side solid fill of `count` pixels
pub const TEMPLATE_FILL: &str = "i8080_send_fill oid=%c color=%c count=%c";

/// Maximum parameter bytes carried by one `i8080_send_cmd_param8`
pub const MAX_COMMAND_PARAMS: usize = 16;

/// Maximum pixel words carried by one `i8080_send_data16`
///
/// Longer streams are split into consecutive transactions.
pub const MAX_DATA_WORDS: usize = 16;

/// MIPI DCS opcodes shared by the window-addressable controllers
pub mod dcs {
    /// Soft reset (0x01)
    ///
    /// All registers return to defaults. The controller needs settle time
    /// before the next command.
    pub const SOFT_RESET: u8 = 0x01;

    /// Exit sleep mode (0x11)
    pub const SLEEP_OUT: u8 = 0x11;

    /// Display on (0x29)
    pub const DISPLAY_ON: u8 = 0x29;

    /// Column address set (0x2A)
    ///
    /// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
    pub const COLUMN_ADDRESS_SET: u8 = 0x2A;

    /// Page (row) address set (0x2B)
    ///
    /// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
    pub const PAGE_ADDRESS_SET: u8 = 0x2B;

    /// Memory write (0x2C)
    ///
    /// Subsequent data words fill the address window left to right, top to
    /// bottom.
    pub const MEMORY_WRITE: u8 = 0x2C;

    /// Address mode / memory access control (0x36)
    pub const ADDRESS_MODE: u8 = 0x36;

    /// Interface pixel format (0x3A)
    pub const PIXEL_FORMAT: u8 = 0x3A;
}

/// SSD1963 display controller opcodes
pub mod ssd1963 {
    /// PLL multiplier/divider (0xE2), 3 bytes
    pub const SET_PLL_MN: u8 = 0xE2;
    /// Start PLL (0xE0), 1 byte: 0x01 enable, 0x03 lock as system clock
    pub const START_PLL: u8 = 0xE0;
    /// Pixel clock frequency (0xE6), 3 bytes
    pub const SET_LSHIFT_FREQ: u8 = 0xE6;
    /// LCD panel mode and resolution (0xB0), 7 bytes
    pub const SET_LCD_MODE: u8 = 0xB0;
    /// Horizontal period (0xB4), 8 bytes
    pub const SET_HORI_PERIOD: u8 = 0xB4;
    /// Vertical period (0xB6), 7 bytes
    pub const SET_VERT_PERIOD: u8 = 0xB6;
    /// Pixel data interface format (0xF0), 1 byte: 0x03 = 16-bit 565
    pub const SET_PIXEL_DATA_INTERFACE: u8 = 0xF0;
    /// Contrast/brightness/saturation post processor (0xBC), 4 bytes
    pub const SET_POST_PROC: u8 = 0xBC;
}

/// ILI9488 display controller opcodes
pub mod ili9488 {
    /// Power control 1 (0xC0), 2 bytes
    pub const POWER_CONTROL_1: u8 = 0xC0;
    /// Power control 2 (0xC1), 1 byte
    pub const POWER_CONTROL_2: u8 = 0xC1;
    /// VCOM control (0xC5), 3 bytes
    pub const VCOM_CONTROL: u8 = 0xC5;
    /// Interface mode control (0xB0), 1 byte
    pub const INTERFACE_MODE: u8 = 0xB0;
    /// Frame rate control (0xB1), 1 byte
    pub const FRAME_RATE: u8 = 0xB1;
    /// Display inversion control (0xB4), 1 byte
    pub const INVERSION_CONTROL: u8 = 0xB4;
    /// Display function control (0xB6), 2 bytes
    pub const DISPLAY_FUNCTION: u8 = 0xB6;
    /// Set image function (0xE9), 1 byte
    pub const SET_IMAGE_FUNCTION: u8 = 0xE9;
    /// Adjust control 3 (0xF7), 4 bytes
    pub const ADJUST_CONTROL_3: u8 = 0xF7;
}

/// SSD1306-style page-addressed monochrome controller opcodes
///
/// Every byte, including what datasheets call "arguments", is sent as a
/// command byte on these controllers.
pub mod ssd1306 {
    /// Display off (0xAE)
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Display on (0xAF)
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Clock divide ratio (0xD5), followed by the ratio byte
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    /// Multiplex ratio (0xA8), followed by rows-1
    pub const SET_MULTIPLEX: u8 = 0xA8;
    /// Display offset (0xD3)
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    /// Start line 0 (0x40)
    pub const SET_START_LINE: u8 = 0x40;
    /// Charge pump (0x8D)
    pub const CHARGE_PUMP: u8 = 0x8D;
    /// Memory addressing mode (0x20)
    pub const SET_MEMORY_MODE: u8 = 0x20;
    /// Segment remap (0xA1)
    pub const SEGMENT_REMAP: u8 = 0xA1;
    /// COM scan direction decrement (0xC8)
    pub const COM_SCAN_DEC: u8 = 0xC8;
    /// COM pins configuration (0xDA)
    pub const SET_COM_PINS: u8 = 0xDA;
    /// Contrast (0x81)
    pub const SET_CONTRAST: u8 = 0x81;
    /// Pre-charge period (0xD9)
    pub const SET_PRECHARGE: u8 = 0xD9;
    /// VCOMH deselect level (0xDB)
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    /// Resume display from RAM (0xA4)
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    /// Non-inverted display (0xA6)
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    /// Page start address, OR'd with the page index (0xB0)
    pub const SET_PAGE_ADDRESS: u8 = 0xB0;
    /// Column start high nibble, OR'd with the nibble (0x10)
    pub const SET_COLUMN_HIGH: u8 = 0x10;
    /// Column start low nibble, OR'd with the nibble (0x00)
    pub const SET_COLUMN_LOW: u8 = 0x00;
}
