use crate::memory::Byte;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

/// Number of operand bytes following `opcode`, encoded in its top two bits
pub const fn operand_count(opcode: Byte) -> usize {
    (opcode >> 6) as usize
}

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// Defines the instructions
        /// Bits 6-7 of every opcode hold its operand count
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Instruction {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Instruction {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

instructions! {
    /// Stop the execution loop
    HLT = 0b0000_0001,
    /// Return from a subroutine: pop the program counter from the stack
    RET = 0b0001_0001,
    /// Push a register onto the stack
    /// @param register The register to push
    PUSH = 0b0100_0101,
    /// Pop the top of the stack into a register
    /// @param register The register to pop into
    POP = 0b0100_0110,
    /// Print a register as an unsigned decimal number
    /// @param register The register to print
    PRN = 0b0100_0111,
    /// Call a subroutine: push the return address, jump to the address in a register
    /// @param register The register holding the subroutine address
    CALL = 0b0101_0000,
    /// Load an immediate into a register
    /// @param register The destination register
    /// @param value The value to load
    LDI = 0b1000_0010,
    /// Add the second register to the first
    /// @param a The destination register
    /// @param b The source register
    ADD = 0b1010_0000,
    /// Multiply the first register by the second
    /// @param a The destination register
    /// @param b The source register
    MUL = 0b1010_0010,
}

impl Instruction {
    /// Operand bytes consumed by this instruction
    pub fn operand_count(self) -> usize {
        operand_count(self.into())
    }

    /// Bytes occupied in memory, opcode included
    pub fn size(self) -> usize {
        1 + self.operand_count()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_operand_counts() -> Result<()> {
        use Instruction::*;

        for (instruction, count) in [
            (HLT, 0),
            (RET, 0),
            (PUSH, 1),
            (POP, 1),
            (PRN, 1),
            (CALL, 1),
            (LDI, 2),
            (ADD, 2),
            (MUL, 2),
        ] {
            assert_eq!(instruction.operand_count(), count, "{}", instruction);
            assert_eq!(instruction.size(), count + 1);
        }

        Ok(())
    }

    #[test]
    fn test_decode() -> Result<()> {
        for instruction in Instruction::ALL {
            let opcode: Byte = (*instruction).into();
            assert_eq!(Instruction::try_from(opcode)?, *instruction);
        }

        assert!(Instruction::try_from(0b0000_0000).is_err());
        assert!(Instruction::try_from(0b1111_1111).is_err());

        Ok(())
    }

    #[test]
    fn test_names() -> Result<()> {
        assert_eq!(Instruction::LDI.name(), "LDI");
        assert_eq!(Instruction::CALL.to_string(), "CALL");
        assert_eq!(Instruction::ALL.len(), 9);

        Ok(())
    }
}
