use std::io::{self, Write};

use log::*;

use crate::alu::AluOp;
use crate::error::{MachineError, Result};
use crate::instruction::Instruction;
use crate::memory::{Address, Byte, StdMem, MEMORY_SIZE};
use crate::registers::RegisterFile;
use crate::trace::Trace;

/// Execution state of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Running,
    Halted,
}

/// Instruction handler. Every handler receives both pre-fetched operand
/// bytes and ignores the ones it does not use.
pub type Handler<W> = fn(&mut Machine<W>, Byte, Byte) -> Result<()>;

/// Emulates the whole machine. PRN output is written to `W`.
#[derive(Debug)]
pub struct Machine<W = io::Stdout> {
    pub memory: StdMem,
    pub registers: RegisterFile,
    /// Program counter
    pub pc: Address,
    /// Instruction register, the opcode fetched last
    pub ir: Byte,
    pub state: State,
    output: W,
}

impl Machine<io::Stdout> {
    /// Initializes a machine printing to stdout
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Machine<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Machine<W> {
    pub fn with_output(output: W) -> Self {
        Self {
            memory: StdMem::default(),
            registers: RegisterFile::default(),
            pc: 0,
            ir: 0,
            state: State::Running,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Copies `program` into memory starting at `base`
    pub fn load(&mut self, base: Address, program: &[Byte]) -> Result<()> {
        self.memory.write_array(base, program)?;
        debug!("Loaded {} bytes at 0x{:02X}", program.len(), base);

        Ok(())
    }

    pub fn trace(&self) -> Trace {
        Trace {
            pc: self.pc,
            ir: self.memory.peek_byte(self.pc),
            operands: [
                self.memory.peek_byte(self.pc + 1),
                self.memory.peek_byte(self.pc + 2),
            ],
            registers: *self.registers.as_array(),
        }
    }

    /// Resolves an instruction to the handler implementing it
    pub fn handler(instruction: Instruction) -> Handler<W> {
        let handler: Handler<W> = match instruction {
            Instruction::HLT => Self::hlt,
            Instruction::RET => Self::ret,
            Instruction::PUSH => Self::push,
            Instruction::POP => Self::pop,
            Instruction::PRN => Self::prn,
            Instruction::CALL => Self::call,
            Instruction::LDI => Self::ldi,
            Instruction::ADD => Self::add,
            Instruction::MUL => Self::mul,
        };
        handler
    }

    fn decode(opcode: Byte, address: Address) -> Result<Instruction> {
        Instruction::try_from(opcode)
            .map_err(|_| MachineError::UnrecognizedOpcode { opcode, address })
    }

    /// Executes `opcode` with the given operands. The error for an unknown
    /// opcode reports the current program counter.
    pub fn dispatch(&mut self, opcode: Byte, operand_a: Byte, operand_b: Byte) -> Result<()> {
        let instruction = Self::decode(opcode, self.pc)?;
        Self::handler(instruction)(self, operand_a, operand_b)
    }

    /// Reads the operand `offset` bytes after `address`. Only the first
    /// `required` operands are bounds checked, the others read as 0 past the
    /// end of memory.
    fn operand(&self, address: Address, offset: usize, required: usize) -> Result<Byte> {
        let position = address + offset;
        if offset <= required {
            self.memory.read_byte(position)
        } else {
            Ok(self.memory.peek_byte(position))
        }
    }

    /// Runs one fetch-decode-execute cycle
    pub fn step(&mut self) -> Result<()> {
        let address = self.pc;
        let opcode = self.memory.read_byte(address)?; // Read opcode where PC is
        self.ir = opcode;

        let instruction = Self::decode(opcode, address)?;
        let required = instruction.operand_count();
        let operand_a = self.operand(address, 1, required)?;
        let operand_b = self.operand(address, 2, required)?;

        // CALL and RET overwrite the already advanced PC
        self.pc = address + instruction.size();

        Self::handler(instruction)(self, operand_a, operand_b)
    }

    /// Run program until it halts
    pub fn run(&mut self) -> Result<()> {
        self.run_with(|trace| trace!("{}", trace))
    }

    /// Run program until it halts, showing `observer` the machine before
    /// every cycle
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<()>
    where
        F: FnMut(&Trace),
    {
        while self.is_running() {
            observer(&self.trace());
            self.step()?;
        }

        info!("Machine halted at 0x{:02X}", self.pc);

        Ok(())
    }

    fn decrement_sp(&mut self) -> Address {
        let sp = self.registers.sp().wrapping_sub(1);
        self.registers.set_sp(sp);
        sp.into()
    }

    fn increment_sp(&mut self) {
        let sp = self.registers.sp().wrapping_add(1);
        self.registers.set_sp(sp);
    }

    fn alu(&mut self, op: AluOp, reg_a: Byte, reg_b: Byte) -> Result<()> {
        let a = self.registers.read(reg_a.into())?;
        let b = self.registers.read(reg_b.into())?;
        let result = op.apply(a, b);
        self.registers.write(reg_a.into(), result)?;

        debug!("{:?} R{} R{}: {} {} -> {}", op, reg_a, reg_b, a, b, result);

        Ok(())
    }

    fn hlt(&mut self, _: Byte, _: Byte) -> Result<()> {
        self.state = State::Halted;

        debug!("HLT");

        Ok(())
    }

    fn ldi(&mut self, register: Byte, value: Byte) -> Result<()> {
        self.registers.write(register.into(), value)?;

        debug!("LDI R{} {}", register, value);

        Ok(())
    }

    fn prn(&mut self, register: Byte, _: Byte) -> Result<()> {
        let value = self.registers.read(register.into())?;
        writeln!(self.output, "{}", value)?;

        debug!("PRN R{}: {}", register, value);

        Ok(())
    }

    fn add(&mut self, reg_a: Byte, reg_b: Byte) -> Result<()> {
        self.alu(AluOp::Add, reg_a, reg_b)
    }

    fn mul(&mut self, reg_a: Byte, reg_b: Byte) -> Result<()> {
        self.alu(AluOp::Mul, reg_a, reg_b)
    }

    fn push(&mut self, register: Byte, _: Byte) -> Result<()> {
        let sp = self.decrement_sp();
        let value = self.registers.read(register.into())?;
        self.memory.write_byte(sp, value)?;

        debug!("PUSH R{}: {} -> 0x{:02X}", register, value, sp);

        Ok(())
    }

    fn pop(&mut self, register: Byte, _: Byte) -> Result<()> {
        let sp: Address = self.registers.sp().into();
        let value = self.memory.read_byte(sp)?;
        self.registers.write(register.into(), value)?;
        self.increment_sp();

        debug!("POP R{}: 0x{:02X} -> {}", register, sp, value);

        Ok(())
    }

    fn call(&mut self, register: Byte, _: Byte) -> Result<()> {
        let return_address = Byte::try_from(self.pc).map_err(|_| {
            MachineError::MemoryOutOfBounds {
                address: self.pc,
                size: MEMORY_SIZE,
            }
        })?;

        let sp = self.decrement_sp();
        self.memory.write_byte(sp, return_address)?;
        self.pc = self.registers.read(register.into())?.into();

        debug!(
            "CALL R{}: 0x{:02X}, returning to 0x{:02X}",
            register, self.pc, return_address
        );

        Ok(())
    }

    fn ret(&mut self, _: Byte, _: Byte) -> Result<()> {
        let sp: Address = self.registers.sp().into();
        self.pc = self.memory.read_byte(sp)?.into();
        self.increment_sp();

        debug!("RET 0x{:02X}", self.pc);

        Ok(())
    }
}
