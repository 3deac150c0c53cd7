//! Error types for the renderer
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and panel/frame buffer operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors while building configuration, fonts and glyph caches
//! - [`Error`] - Runtime errors during initialization and flushing
//! - [`InterfaceError`](crate::interface::InterfaceError) - Command queue failures
//!
//! Drawing calls never fail: out-of-range text, glyphs and overlays are
//! clipped or ignored.
//!
//! ## Example
//!
//! ```
//! use i8080_tft::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(1000, 500); // Too wide
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;
use crate::panel::PanelState;

/// Widest panel supported by the window-addressable controllers
///
/// The SSD1963 drives up to 864 columns.
pub const MAX_WIDTH: u16 = 864;

/// Tallest panel supported by the window-addressable controllers
pub const MAX_HEIGHT: u16 = 480;

/// Errors that can occur when driving a panel
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (command queue)
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Panel is not ready for this operation
    ///
    /// Frame buffers are only handed out after a successful
    /// [`initialize`](crate::Panel::initialize), and initialization runs
    /// once. A panel whose initialization failed must be rebuilt.
    NotReady {
        /// State the panel was in
        state: PanelState,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::NotReady { state } => write!(f, "Panel not ready (state: {state:?})"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur before anything is sent to a panel.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// Requested text grid does not fit on the panel
    GridTooLarge {
        /// Columns requested
        columns: usize,
        /// Rows requested
        rows: usize,
    },
    /// Font table is malformed
    ///
    /// Fonts hold 256 glyphs, 8 or 16 pixels wide and 1 to 64 rows tall.
    InvalidFont {
        /// Glyph width
        width: usize,
        /// Glyph height
        height: usize,
        /// Length of the data provided
        len: usize,
    },
    /// Font cell too short to hold a 16-row icon
    IconTooTall {
        /// Font cell height
        cell_height: usize,
    },
    /// Font shape not usable by the selected frame buffer
    ///
    /// Cell-grid panels need 16-pixel-wide glyphs; page panels need 8x16.
    UnsupportedFont {
        /// Glyph width
        width: usize,
        /// Glyph height
        height: usize,
    },
    /// Icon ASCII art is malformed
    InvalidIconArt {
        /// Zero-based line of the first bad row
        line: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_WIDTH}x{MAX_HEIGHT})"
            ),
            Self::GridTooLarge { columns, rows } => {
                write!(f, "Grid {columns}x{rows} does not fit on the panel")
            }
            Self::InvalidFont { width, height, len } => write!(
                f,
                "Invalid font: {width}x{height} glyphs with {len} bytes of data"
            ),
            Self::IconTooTall { cell_height } => {
                write!(f, "Icons need 16 rows, font cell has {cell_height}")
            }
            Self::UnsupportedFont { width, height } => {
                write!(f, "Font {width}x{height} not supported by this panel")
            }
            Self::InvalidIconArt { line } => write!(f, "Invalid icon art at line {line}"),
        }
    }
}

impl core::error::Error for BuilderError {}
