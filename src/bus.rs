//! Device-side command interpreter
//!
//! The microcontroller end of the protocol: each queued [`Command`] becomes a
//! sequence of 8080 strobes on a [`ParallelBus`]. A register write has the
//! RS line low; a data write has it high.
//!
//! | Command     | Strobes                                     |
//! |-------------|---------------------------------------------|
//! | `Cmd`       | one register write                          |
//! | `CmdParams` | one register write, one data write per byte |
//! | `Data16`    | one data write per word                     |
//! | `Fill`      | `count` data writes of `color`              |
//!
//! Firmware ports and host-side panel simulators implement [`ParallelBus`]
//! and feed it the queue in order.

use crate::interface::Command;

/// A 16-bit 8080-style parallel bus
pub trait ParallelBus {
    /// Strobe a word with RS low (register/command cycle)
    fn write_register(&mut self, value: u16);

    /// Strobe a word with RS high (data cycle)
    fn write_data(&mut self, value: u16);
}

impl<B: ParallelBus + ?Sized> ParallelBus for &mut B {
    fn write_register(&mut self, value: u16) {
        (**self).write_register(value);
    }

    fn write_data(&mut self, value: u16) {
        (**self).write_data(value);
    }
}

/// Play one command onto the bus
pub fn execute<B: ParallelBus>(bus: &mut B, command: &Command) {
    match command {
        Command::Cmd { opcode, .. } => bus.write_register(u16::from(*opcode)),
        Command::CmdParams { opcode, params, .. } => {
            bus.write_register(u16::from(*opcode));
            for &param in params {
                bus.write_data(u16::from(param));
            }
        }
        Command::Data16 { words, .. } => {
            for &word in words {
                bus.write_data(word);
            }
        }
        Command::Fill { color, count, .. } => {
            for _ in 0..*count {
                bus.write_data(*color);
            }
        }
    }
}

/// Play a sequence of commands onto the bus, in order
pub fn execute_all<'a, B, C>(bus: &mut B, commands: C)
where
    B: ParallelBus,
    C: IntoIterator<Item = &'a Command>,
{
    for command in commands {
        execute(bus, command);
    }
}
