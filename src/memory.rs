use std::fs;
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{self, eyre, WrapErr};
use log::*;

use crate::error::{MachineError, Result};

pub mod parse;

use parse::{ParseError, Parser};

pub type Byte = u8; // 1 byte
pub type Address = usize;

/// Number of addressable cells of the machine
pub const MEMORY_SIZE: usize = 256;

/// Default memory
pub type StdMem = Memory<MEMORY_SIZE>;

/// Emulates memory for use with the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    pub data: [Byte; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Memory<S> {
    fn out_of_bounds(address: Address) -> MachineError {
        MachineError::MemoryOutOfBounds { address, size: S }
    }

    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Address) -> Result<Byte> {
        self.data
            .get(position)
            .copied()
            .ok_or_else(|| Self::out_of_bounds(position))
    }

    /// Reads a byte without bounds checking, yielding 0 past the end
    pub fn peek_byte(&self, position: Address) -> Byte {
        self.data.get(position).copied().unwrap_or(0)
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Address, value: Byte) -> Result<()> {
        let cell = self
            .data
            .get_mut(position)
            .ok_or_else(|| Self::out_of_bounds(position))?;
        *cell = value;
        Ok(())
    }

    /// Writes an array of bytes to the memory. Nothing is written if the
    /// array does not fit.
    pub fn write_array(&mut self, position: Address, data: &[Byte]) -> Result<()> {
        let end = position.saturating_add(data.len());
        if end > S {
            return Err(Self::out_of_bounds(position.max(S)));
        }

        self.data[position..end].copy_from_slice(data);
        Ok(())
    }

    /// Logs the memory contents, 16 cells per line
    pub fn dump(&self) {
        for (row, chunk) in self.data.chunks(16).enumerate() {
            let cells = chunk
                .iter()
                .map(|byte| format!("{:02X}", byte))
                .collect::<Vec<_>>()
                .join(" ");
            debug!("{:02X}: {}", row * 16, cells);
        }
    }

    /// Loads a program file into fresh memory
    pub fn from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read program `{}`", path.display()))?;

        Self::from_str(&data).map_err(|errors| {
            let report = errors
                .iter()
                .map(ParseError::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            eyre!("Failed to load program `{}`:\n{}", path.display(), report)
        })
    }
}

impl<const S: usize> FromStr for Memory<S> {
    type Err = Vec<ParseError>;

    fn from_str(data: &str) -> std::result::Result<Self, Self::Err> {
        Parser::new(data, Self::default()).parse()
    }
}

/// Writes a block of instructions directly into the memory
#[macro_export]
macro_rules! write_instructions {
    ( $mem:ident : $pos:expr => $( $byte:expr ),+ $(,)? ) => {
        $mem.write_array($pos, &[
            $(
                $byte as $crate::memory::Byte,
            )+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::instruction::Instruction;

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_read_byte() -> Result<()> {
        let mut mem = StdMem::default();
        mem.data[0x2] = 0x12;
        assert_eq!(mem.read_byte(0x2)?, 0x12);
        assert_eq!(mem.read_byte(0xFF)?, 0);

        Ok(())
    }

    #[test]
    fn test_write_byte() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_byte(0x44, 12)?;
        assert_eq!(mem.data[0x44], 12);

        Ok(())
    }

    #[test]
    fn test_out_of_bounds() -> Result<()> {
        let mut mem = StdMem::default();
        assert!(matches!(
            mem.read_byte(0x100),
            Err(MachineError::MemoryOutOfBounds {
                address: 0x100,
                size: 256
            })
        ));
        assert!(matches!(
            mem.write_byte(0x101, 1),
            Err(MachineError::MemoryOutOfBounds { address: 0x101, .. })
        ));
        assert_eq!(mem.peek_byte(0x100), 0);
        assert_eq!(mem, StdMem::default());

        Ok(())
    }

    #[test]
    fn test_write_array() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_array(0x44, &[0x12, 0x34, 0x56, 0x78])?;
        assert_eq!(mem.data[0x44], 0x12);
        assert_eq!(mem.data[0x45], 0x34);
        assert_eq!(mem.data[0x46], 0x56);
        assert_eq!(mem.data[0x47], 0x78);

        Ok(())
    }

    #[test]
    fn test_write_array_to_the_end() -> Result<()> {
        let mut mem = StdMem::default();
        mem.write_array(0xFE, &[1, 2])?;
        assert_eq!(mem.data[0xFF], 2);

        assert!(matches!(
            mem.write_array(0xFE, &[1, 2, 3]),
            Err(MachineError::MemoryOutOfBounds { address: 0x100, .. })
        ));
        assert_eq!(mem.data[0xFE], 1); // untouched

        Ok(())
    }

    #[test]
    fn test_write_instructions() -> Result<()> {
        let mut mem = StdMem::default();

        mem.write_array(
            0x10,
            &[
                Instruction::LDI as Byte,
                0,
                42,
                Instruction::PRN as Byte,
                0,
                Instruction::HLT as Byte,
            ],
        )?;

        let mut mem2 = StdMem::default();
        use crate::instruction::Instruction::*;
        write_instructions!(mem2 : 0x10 => LDI, 0, 42, PRN, 0, HLT)?;

        assert_eq!(mem, mem2);

        Ok(())
    }
}
