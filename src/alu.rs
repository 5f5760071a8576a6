use crate::memory::Byte;

/// Binary operations of the arithmetic unit. Results are truncated to the
/// register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Mul,
}

impl AluOp {
    pub fn apply(self, a: Byte, b: Byte) -> Byte {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Mul => a.wrapping_mul(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_add() -> Result<()> {
        assert_eq!(AluOp::Add.apply(8, 9), 17);
        assert_eq!(AluOp::Add.apply(0xFF, 2), 1);

        Ok(())
    }

    #[test]
    fn test_mul() -> Result<()> {
        assert_eq!(AluOp::Mul.apply(8, 9), 72);
        assert_eq!(AluOp::Mul.apply(16, 17), 16); // 272 mod 256

        Ok(())
    }
}
