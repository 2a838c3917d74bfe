use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::LevelFilter;
use structopt::StructOpt;

use chip_8_vm::Emulator;

/// Run a CHIP-8 program without a frontend.
/// The keypad is never pressed, and nothing is drawn until the program stops.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip-8-vm")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Cycles per second
    #[structopt(long, default_value = "600")]
    hz: u32,

    /// Stop after this many cycles instead of running until the program fails
    #[structopt(long)]
    cycles: Option<u64>,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Print the screen when execution stops
    #[structopt(long)]
    dump: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    // Get configuration and read input file
    let opt = Opt::from_args();
    init_logging(opt.verbose);
    log::info!("Executing {:?}", &opt.input);

    let mut emulator = match opt.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emulator
        .load_file(&opt.input)
        .with_context(|| format!("failed to load {:?}", opt.input))?;

    let period = Duration::from_secs(1) / opt.hz.max(1);
    let mut next_cycle = Instant::now();
    let mut executed = 0u64;

    // Start execution
    let result = loop {
        if opt.cycles.map_or(false, |limit| executed >= limit) {
            break Ok(());
        }
        if let Err(e) = emulator.step() {
            log::error!("Halted after {} cycles: {}", executed, e);
            break Err(e);
        }
        executed += 1;

        next_cycle += period;
        let now = Instant::now();
        if next_cycle > now {
            thread::sleep(next_cycle - now);
        }
    };

    if opt.dump {
        print!("{}", emulator.screen());
    }
    log::info!("Executed {} cycles", executed);

    result.with_context(|| format!("{:?} stopped at {:#05x}", opt.input, emulator.program_counter()))
}
