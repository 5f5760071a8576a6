use std::fmt;

use crate::memory::{Address, Byte};
use crate::registers::REGISTER_COUNT;

/// Snapshot of the machine at the start of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    pub pc: Address,
    /// Byte at `pc`
    pub ir: Byte,
    /// The two bytes after `pc`
    pub operands: [Byte; 2],
    pub registers: [Byte; REGISTER_COUNT],
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc, self.ir, self.operands[0], self.operands[1]
        )?;

        for register in &self.registers {
            write!(f, " {:02X}", register)?;
        }

        Ok(())
    }
}
