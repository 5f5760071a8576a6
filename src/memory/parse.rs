//! Programs are written one byte per line as a binary literal. Anything after
//! `#` is a comment, blank lines are skipped:
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 00000001 # HLT
//! ```

use std::borrow::Cow;
use std::error;
use std::{fmt, str::Lines};

use super::{Address, Byte, Memory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidAddress { address: Address },
    InvalidLiteral,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidAddress { address } => {
                write!(f, "memory has no address `0x{:x}`", address)
            }
            ParseErrorKind::InvalidLiteral => f.write_str("invalid literal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: usize,
}

impl ParseError {
    fn new<C, S>(kind: ParseErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn line_nr(&self) -> usize {
        self.line_nr
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(
                f,
                "error [ln: {}]: {} - {}",
                self.line_nr, self.kind, context
            )
        } else {
            write!(f, "error [ln: {}]: {}", self.line_nr, self.kind)
        }
    }
}

impl error::Error for ParseError {}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub struct Parser<'a, const S: usize> {
    lines: Lines<'a>,
    line_nr: usize,
    position: Address,
    memory: Memory<S>,
}

impl<'a, const S: usize> Parser<'a, S> {
    /// Creates a new parser for `data` which will try to populate `memory`
    /// starting at address 0.
    pub fn new(data: &'a str, memory: Memory<S>) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
            position: 0,
            memory,
        }
    }

    /// Places the program at `base` instead of address 0.
    pub fn at(mut self, base: Address) -> Self {
        self.position = base;
        self
    }

    /// Consumes `self` and tries to parse all `self.data` into memory.
    ///
    /// # Errors
    ///
    /// All errors which may occur are collected and returned at the end.
    pub fn parse(mut self) -> Result<Memory<S>, Vec<ParseError>> {
        let mut errors = Vec::new();

        while let Some(res) = self.parse_next_line() {
            if let Err(err) = res {
                log::error!("{}", err);
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(self.memory)
        } else {
            Err(errors)
        }
    }

    /// Tries to parse the next line of [`Parser::lines`]. Each byte should be
    /// located on it's own line.
    fn parse_next_line(&mut self) -> Option<Result<()>> {
        let line = self.lines.next()?;
        self.line_nr += 1;

        let line = match line.split_once('#') {
            Some((code, _comment)) => code,
            None => line,
        }
        .trim();

        if line.is_empty() {
            // Comment or empty line; skip
            Some(Ok(()))
        } else {
            Some(self.parse_literal(line))
        }
    }

    /// Tries to parse a comment-free, trimmed line as a binary byte literal.
    ///
    /// # Examples
    ///
    /// - `10000010`
    /// - `00000001`
    fn parse_literal(&mut self, line: &str) -> Result<()> {
        let byte = Byte::from_str_radix(line, 2).map_err(|_| {
            ParseError::new(
                ParseErrorKind::InvalidLiteral,
                format!("`{}` is not an 8 bit binary number", line),
                self.line_nr,
            )
        })?;

        log::debug!(
            "[{}] Byte 0b{:08b} at 0x{:02x}",
            self.line_nr,
            byte,
            self.position
        );

        self.write_byte(byte)
    }

    /// Writes `byte` into memory at [`Parser::position`]. Then it increments
    /// the position by one.
    ///
    /// # Errors
    ///
    /// This will return an error if the position is outside of memory.
    fn write_byte(&mut self, byte: Byte) -> Result<()> {
        self.memory.write_byte(self.position, byte).map_err(|_| {
            ParseError::new(
                ParseErrorKind::InvalidAddress {
                    address: self.position,
                },
                "program does not fit into memory",
                self.line_nr,
            )
        })?;
        self.position += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::instruction::Instruction;
    use crate::memory::StdMem;
    use std::str::FromStr;

    use super::*;
    use color_eyre::Result;

    #[test]
    fn parse_mult() -> Result<()> {
        let data = r#"
            10000010 # LDI R0,8
            00000000
            00001000
            10000010 # LDI R1,9
            00000001
            00001001
            10100010 # MUL R0,R1
            00000000
            00000001
            01000111 # PRN R0
            00000000
            00000001 # HLT
        "#;

        let mem = StdMem::from_str(data).unwrap();

        assert_eq!(mem.read_byte(0)?, Instruction::LDI.into());
        assert_eq!(mem.read_byte(2)?, 8);
        assert_eq!(mem.read_byte(5)?, 9);
        assert_eq!(mem.read_byte(6)?, Instruction::MUL.into());
        assert_eq!(mem.read_byte(9)?, Instruction::PRN.into());
        assert_eq!(mem.read_byte(11)?, Instruction::HLT.into());
        assert_eq!(mem.read_byte(12)?, 0);

        Ok(())
    }

    #[test]
    fn parse_comments_and_blank_lines() -> Result<()> {
        let data = "# header comment\n\n   \n00000001#no space before comment\n\t01000111   \n";

        let mem = StdMem::from_str(data).unwrap();

        assert_eq!(mem.read_byte(0)?, 0b0000_0001);
        assert_eq!(mem.read_byte(1)?, 0b0100_0111);

        Ok(())
    }

    #[test]
    fn parse_at_base() -> Result<()> {
        let data = "00000001\n00010001\n";

        let mem = Parser::new(data, StdMem::default()).at(0x80).parse().unwrap();

        assert_eq!(mem.read_byte(0x7F)?, 0);
        assert_eq!(mem.read_byte(0x80)?, 0b0000_0001);
        assert_eq!(mem.read_byte(0x81)?, 0b0001_0001);

        Ok(())
    }

    #[test]
    fn parse_invalid_literals() -> Result<()> {
        let data = "00000001\n00000002 # not binary\nLDI\n100000000\n";

        let errors = StdMem::from_str(data).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.iter().map(ParseError::line_nr).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert!(errors
            .iter()
            .all(|err| err.kind() == ParseErrorKind::InvalidLiteral));

        Ok(())
    }

    #[test]
    fn parse_program_too_large() -> Result<()> {
        let data = "00000001\n".repeat(257);

        let errors = StdMem::from_str(&data).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind(),
            ParseErrorKind::InvalidAddress { address: 256 }
        );
        assert_eq!(errors[0].line_nr(), 257);

        Ok(())
    }

    #[test]
    fn parse_demo_programs() -> Result<()> {
        for data in [
            include_str!("../../demos/programs/mult.ls8"),
            include_str!("../../demos/programs/call.ls8"),
            include_str!("../../demos/programs/stack.ls8"),
        ] {
            assert!(StdMem::from_str(data).is_ok());
        }

        Ok(())
    }
}
