//! Panel configuration types and builder

pub use crate::error::{BuilderError, MAX_HEIGHT, MAX_WIDTH};

use crate::color::{Color, Palette};
use crate::diff::DiffPolicy;

/// Panel dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero,
    /// width > MAX_WIDTH or height > MAX_HEIGHT.
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_WIDTH || height == 0 || height > MAX_HEIGHT {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> u32 {
        u32::from(self.width) * u32::from(self.height)
    }
}

/// How a controller addresses its display RAM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addressing {
    /// Arbitrary rectangles via column/page address set, 16-bit color words
    Window,
    /// 8-row monochrome pages addressed by page and column nibbles
    Page,
}

/// Supported controller families
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Chip {
    /// Solomon SSD1963 TFT controller (up to 864x480)
    Ssd1963,
    /// Ilitek ILI9488 TFT controller (320x480)
    #[default]
    Ili9488,
    /// SSD1306-style page-addressed monochrome controller (128x64)
    Ssd1306,
}

impl Chip {
    /// Addressing model of this family
    pub fn addressing(self) -> Addressing {
        match self {
            Self::Ssd1963 | Self::Ili9488 => Addressing::Window,
            Self::Ssd1306 => Addressing::Page,
        }
    }
}

/// Panel configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Controller family
    pub chip: Chip,
    /// Panel dimensions
    pub dimensions: Dimensions,
    /// Text grid as (columns, rows); derived from the font when `None`
    pub grid: Option<(usize, usize)>,
    /// Text colors for color panels
    pub palette: Palette,
    /// Coalescing thresholds for page panels
    pub diff_policy: DiffPolicy,
    /// Column offset of the visible area on page panels
    pub x_offset: usize,
}

/// Builder for constructing panel configuration
///
/// # Example
///
/// ```rust
/// use i8080_tft::{Builder, Chip, Color, Dimensions};
///
/// let dims = match Dimensions::new(480, 272) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .chip(Chip::Ssd1963)
///     .dimensions(dims)
///     .grid(16, 4)
///     .foreground(Color::GREEN)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.grid, Some((16, 4)));
/// ```
#[must_use]
pub struct Builder {
    /// Controller family
    chip: Chip,
    /// Panel dimensions (required)
    dimensions: Option<Dimensions>,
    /// Text grid
    grid: Option<(usize, usize)>,
    /// Set-bit color
    foreground: Color,
    /// Clear-bit color
    background: Color,
    /// Coalescing thresholds
    diff_policy: DiffPolicy,
    /// Page panel column offset
    x_offset: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            chip: Chip::default(),
            dimensions: None,
            grid: None,
            foreground: Color::WHITE,
            background: Color::BLACK,
            diff_policy: DiffPolicy::default(),
            // SH1106-style panels need 2
            x_offset: 0,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the controller family
    pub fn chip(mut self, chip: Chip) -> Self {
        self.chip = chip;
        self
    }

    /// Set panel dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the text grid size
    ///
    /// Checked against the panel and font when the frame buffer is built.
    pub fn grid(mut self, columns: usize, rows: usize) -> Self {
        self.grid = Some((columns, rows));
        self
    }

    /// Set the text color
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    /// Set the background color
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the dirty-run coalescing thresholds
    pub fn diff_policy(mut self, policy: DiffPolicy) -> Self {
        self.diff_policy = policy;
        self
    }

    /// Set the column offset of the visible area (page panels)
    pub fn x_offset(mut self, offset: usize) -> Self {
        self.x_offset = offset;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            chip: self.chip,
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            grid: self.grid,
            palette: Palette::new(self.foreground, self.background),
            diff_policy: self.diff_policy,
            x_offset: self.x_offset,
        })
    }
}
