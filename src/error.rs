use std::io;

use thiserror::Error;

use crate::memory::{Address, Byte};

/// Fatal conditions that stop the machine
#[derive(Debug, Error)]
pub enum MachineError {
    /// The fetched byte is not in the opcode table
    #[error("unrecognized opcode 0b{opcode:08b} at address 0x{address:02X}")]
    UnrecognizedOpcode { opcode: Byte, address: Address },
    #[error("memory address 0x{address:X} is outside of memory (size {size})")]
    MemoryOutOfBounds { address: Address, size: usize },
    #[error("register index {index} is outside of the register file (size {size})")]
    RegisterOutOfBounds { index: usize, size: usize },
    /// PRN could not write to the output sink
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

pub type Result<T, E = MachineError> = std::result::Result<T, E>;
