//! Protocol adapter
//!
//! This module provides the [`DisplayInterface`] trait, the four operations
//! every frame buffer and panel driver is written against, and the
//! [`Interface`] struct that frames them into [`Command`]s on an outbound
//! [`CommandQueue`].
//!
//! ## Delivery model
//!
//! Every call is fire-and-forget: it either enqueues its transaction(s) or
//! fails with the queue's error. Nothing waits for the panel. Commands reach
//! the panel in enqueue order, so an address window and the pixel stream
//! behind it always land back to back.
//!
//! ## Example
//!
//! ```
//! use std::collections::VecDeque;
//! use i8080_tft::{command, Command, DisplayInterface, Interface};
//!
//! let mut interface = Interface::new(VecDeque::new(), 3);
//! let _ = interface.send_command_with_params(command::dcs::ADDRESS_MODE, &[0x28]);
//! let _ = interface.send_fill(0xFFFF, 480 * 320);
//!
//! let queue = interface.release();
//! assert_eq!(queue.len(), 2);
//! assert!(matches!(queue[1], Command::Fill { oid: 3, color: 0xFFFF, .. }));
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;
use core::fmt::Debug;

use crate::command::{
    MAX_COMMAND_PARAMS, MAX_DATA_WORDS, TEMPLATE_CMD, TEMPLATE_CMD_PARAMS, TEMPLATE_DATA16,
    TEMPLATE_FILL,
};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// One framed transaction for the microcontroller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Zero-parameter register command
    Cmd {
        /// Adapter instance id
        oid: u8,
        /// Register opcode
        opcode: u8,
    },
    /// Register command followed by parameter bytes
    CmdParams {
        /// Adapter instance id
        oid: u8,
        /// Register opcode
        opcode: u8,
        /// Parameter bytes, at most [`MAX_COMMAND_PARAMS`]
        params: Vec<u8>,
    },
    /// Pixel words streamed into the current address window
    Data16 {
        /// Adapter instance id
        oid: u8,
        /// Pixel words, at most [`MAX_DATA_WORDS`]
        words: Vec<u16>,
    },
    /// Device-side solid fill
    Fill {
        /// Adapter instance id
        oid: u8,
        /// Fill color word
        color: u16,
        /// Number of pixels to write
        count: u32,
    },
}

impl Command {
    /// The protocol template this command renders to
    pub fn template(&self) -> &'static str {
        match self {
            Self::Cmd { .. } => TEMPLATE_CMD,
            Self::CmdParams { .. } => TEMPLATE_CMD_PARAMS,
            Self::Data16 { .. } => TEMPLATE_DATA16,
            Self::Fill { .. } => TEMPLATE_FILL,
        }
    }

    /// Instance id of the adapter that framed this command
    pub fn oid(&self) -> u8 {
        match self {
            Self::Cmd { oid, .. }
            | Self::CmdParams { oid, .. }
            | Self::Data16 { oid, .. }
            | Self::Fill { oid, .. } => *oid,
        }
    }

    /// Opcode for register commands, `None` for data and fill
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Self::Cmd { opcode, .. } | Self::CmdParams { opcode, .. } => Some(*opcode),
            Self::Data16 { .. } | Self::Fill { .. } => None,
        }
    }

    /// Variable-length payload bytes as carried in the `%*s` field
    ///
    /// Pixel words travel high byte first. Fixed-size commands have no
    /// variable payload.
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::CmdParams { params, .. } => params.clone(),
            Self::Data16 { words, .. } => words.iter().flat_map(|w| w.to_be_bytes()).collect(),
            Self::Cmd { .. } | Self::Fill { .. } => Vec::new(),
        }
    }
}

/// Outbound, ordered command channel to the microcontroller
///
/// Implementations must deliver commands in enqueue order. Enqueueing may
/// block for backpressure but must not wait for the panel.
pub trait CommandQueue {
    /// Error raised when a command cannot be enqueued
    type Error: Debug;

    /// Append one command to the channel
    fn enqueue(&mut self, command: Command) -> InterfaceResult<(), Self::Error>;
}

impl CommandQueue for VecDeque<Command> {
    type Error = Infallible;

    fn enqueue(&mut self, command: Command) -> InterfaceResult<(), Self::Error> {
        self.push_back(command);
        Ok(())
    }
}

impl<Q: CommandQueue + ?Sized> CommandQueue for &mut Q {
    type Error = Q::Error;

    fn enqueue(&mut self, command: Command) -> InterfaceResult<(), Self::Error> {
        (**self).enqueue(command)
    }
}

/// Shared channel: several adapters, each with its own oid, on one queue
impl<Q: CommandQueue> CommandQueue for &RefCell<Q> {
    type Error = Q::Error;

    fn enqueue(&mut self, command: Command) -> InterfaceResult<(), Self::Error> {
        self.borrow_mut().enqueue(command)
    }
}

/// Trait for the protocol adapter used by frame buffers and panel drivers
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Tests and custom
/// transports can implement this trait directly.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a zero-parameter command
    fn send_command(&mut self, opcode: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a command with parameter bytes
    ///
    /// An empty parameter list must behave exactly like
    /// [`send_command`](Self::send_command).
    fn send_command_with_params(
        &mut self,
        opcode: u8,
        params: &[u8],
    ) -> InterfaceResult<(), Self::Error>;

    /// Stream pixel words into the current address window
    ///
    /// No geometry check is made here; the caller sizes the window.
    fn send_pixel_data(&mut self, words: &[u16]) -> InterfaceResult<(), Self::Error>;

    /// Fill `count` pixels of the current window with one color
    fn send_fill(&mut self, color: u16, count: u32) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<E> {
    /// The command queue refused the command
    Queue(E),
    /// Parameter list longer than one transaction can carry
    TooManyParams {
        /// Opcode being sent
        opcode: u8,
        /// Parameter bytes provided
        provided: usize,
        /// Protocol maximum
        max: usize,
    },
}

impl<E: Debug> core::fmt::Display for InterfaceError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Queue(e) => write!(f, "Command queue error: {e:?}"),
            Self::TooManyParams {
                opcode,
                provided,
                max,
            } => write!(
                f,
                "Too many parameters for command {opcode:#04x}: {provided} (max {max})"
            ),
        }
    }
}

impl<E: Debug> core::error::Error for InterfaceError<E> {}

/// 8080 protocol adapter over a [`CommandQueue`]
///
/// Frames each [`DisplayInterface`] call into [`Command`]s tagged with this
/// adapter's instance id, so several panels can share one channel.
///
/// ## Example
///
/// ```
/// use core::cell::RefCell;
/// use std::collections::VecDeque;
/// use i8080_tft::{DisplayInterface, Interface};
///
/// let channel = RefCell::new(VecDeque::new());
/// let mut left = Interface::new(&channel, 0);
/// let mut right = Interface::new(&channel, 1);
/// let _ = left.send_command(0x29);
/// let _ = right.send_command(0x29);
/// assert_eq!(channel.borrow().len(), 2);
/// ```
#[derive(Debug)]
pub struct Interface<Q> {
    /// Outbound channel
    queue: Q,
    /// Instance id stamped on every command
    oid: u8,
}

impl<Q> Interface<Q>
where
    Q: CommandQueue,
{
    /// Create an adapter with the given instance id
    pub fn new(queue: Q, oid: u8) -> Self {
        Self { queue, oid }
    }

    /// Instance id stamped on every command
    pub fn oid(&self) -> u8 {
        self.oid
    }

    /// Access the queue
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Access the queue mutably
    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// Give the queue back
    pub fn release(self) -> Q {
        self.queue
    }

    fn enqueue(&mut self, command: Command) -> InterfaceResult<(), InterfaceError<Q::Error>> {
        self.queue.enqueue(command).map_err(InterfaceError::Queue)
    }
}

impl<Q> DisplayInterface for Interface<Q>
where
    Q: CommandQueue,
{
    type Error = InterfaceError<Q::Error>;

    fn send_command(&mut self, opcode: u8) -> InterfaceResult<(), Self::Error> {
        let oid = self.oid;
        self.enqueue(Command::Cmd { oid, opcode })
    }

    fn send_command_with_params(
        &mut self,
        opcode: u8,
        params: &[u8],
    ) -> InterfaceResult<(), Self::Error> {
        if params.is_empty() {
            return self.send_command(opcode);
        }
        if params.len() > MAX_COMMAND_PARAMS {
            return Err(InterfaceError::TooManyParams {
                opcode,
                provided: params.len(),
                max: MAX_COMMAND_PARAMS,
            });
        }
        let oid = self.oid;
        self.enqueue(Command::CmdParams {
            oid,
            opcode,
            params: params.to_vec(),
        })
    }

    fn send_pixel_data(&mut self, words: &[u16]) -> InterfaceResult<(), Self::Error> {
        let oid = self.oid;
        for chunk in words.chunks(MAX_DATA_WORDS) {
            self.enqueue(Command::Data16 {
                oid,
                words: chunk.to_vec(),
            })?;
        }
        Ok(())
    }

    fn send_fill(&mut self, color: u16, count: u32) -> InterfaceResult<(), Self::Error> {
        let oid = self.oid;
        self.enqueue(Command::Fill { oid, color, count })
    }
}
