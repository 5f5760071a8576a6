use crate::error::{MachineError, Result};
use crate::memory::Byte;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;
/// Register reserved for the stack pointer by convention
pub const SP: usize = 7;
/// Initial stack pointer. The stack grows downwards from here.
pub const SP_INIT: Byte = 0xF4;

/// The register file of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterFile {
    data: [Byte; REGISTER_COUNT],
}

impl Default for RegisterFile {
    /// All registers zeroed, except the stack pointer
    fn default() -> Self {
        let mut data = [0; REGISTER_COUNT];
        data[SP] = SP_INIT;
        Self { data }
    }
}

impl RegisterFile {
    /// Reads a register
    pub fn read(&self, index: usize) -> Result<Byte> {
        self.data
            .get(index)
            .copied()
            .ok_or(MachineError::RegisterOutOfBounds {
                index,
                size: REGISTER_COUNT,
            })
    }

    /// Writes a register
    pub fn write(&mut self, index: usize, value: Byte) -> Result<()> {
        let register = self
            .data
            .get_mut(index)
            .ok_or(MachineError::RegisterOutOfBounds {
                index,
                size: REGISTER_COUNT,
            })?;
        *register = value;
        Ok(())
    }

    pub fn sp(&self) -> Byte {
        self.data[SP]
    }

    pub fn set_sp(&mut self, value: Byte) {
        self.data[SP] = value;
    }

    pub fn as_array(&self) -> &[Byte; REGISTER_COUNT] {
        &self.data
    }
}
