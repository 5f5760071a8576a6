use color_eyre::eyre::Result;

use log::LevelFilter;
use simple_logger::SimpleLogger;
use vm8::machine::Machine;
use vm8::memory::StdMem;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap(); // logging

    let mut machine = Machine::new();
    machine.memory = StdMem::from_file("demos/programs/call.ls8")?;
    machine.memory.dump();

    machine.run_with(|trace| println!("{}", trace))?;

    Ok(())
}
