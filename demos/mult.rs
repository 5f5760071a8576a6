use color_eyre::eyre::Result;

use log::LevelFilter;
use simple_logger::SimpleLogger;
use vm8::machine::Machine;
use vm8::write_instructions;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()
        .unwrap(); // logging

    let mut machine = Machine::new();

    use vm8::instruction::Instruction::*;
    let mem = &mut machine.memory;
    write_instructions!(mem : 0 =>
        LDI, 0, 8,
        LDI, 1, 9,
        MUL, 0, 1,
        PRN, 0,
        HLT
    )?;

    machine.run()?;

    Ok(())
}
