use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use vm8::machine::Machine;
use vm8::memory::StdMem;

/// Runs a program on the 8 bit virtual machine
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Program file, one binary byte per line
    program: PathBuf,

    /// Log more, repeat for more detail (-vvv traces every cycle)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    let args = Args::parse();

    SimpleLogger::new()
        .with_level(level(args.verbose))
        .init()
        .map_err(|err| eyre!("Failed to initialize logger: {}", err))?; // logging

    let mut machine = Machine::new();
    machine.memory = StdMem::from_file(&args.program)?;
    machine.memory.dump();

    machine
        .run()
        .wrap_err_with(|| format!("Machine stopped at 0x{:02X}", machine.pc))?;

    Ok(())
}
