// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::error::Error;

use clap::{arg, Arg, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use alu::decode::decode_program;
use alu::interp;
use alu::interrupt::Interrupt;
use alu::state::State;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("alu")
        .about("Alu VM")
        .version("0.1.0")
        .subcommand_required(true)
        .arg(arg!(--verbose "Show verbose output"))
        .subcommand(
            Command::new("run")
                .about("Run a compiled .alc program")
                .arg(Arg::new("file").required(true)),
        )
        .subcommand(
            Command::new("dis")
                .about("Disassemble a compiled .alc program")
                .arg(Arg::new("file").required(true)),
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    if verbose {
        init_logging(LevelFilter::Debug);
    }

    let exitcode = match matches.subcommand() {
        Some(("run", args)) => run(args, verbose)?,
        Some(("dis", args)) => disassemble(args)?,
        _ => unreachable!(),
    };
    std::process::exit(exitcode);
}

/// Runs a `.alc` file to completion, wiring `SIGINT` to the interpreter's
/// cooperative cancellation token so an in-progress run can be stopped
/// cleanly from the terminal rather than killed outright.
fn run(args: &ArgMatches, verbose: bool) -> Result<i32, Box<dyn Error>> {
    let filename = args.get_one::<String>("file").unwrap();

    let mut state = State::new_state();
    state.verbose = verbose;
    install_interrupt_handler(state.interrupt.clone());

    state.start_file(filename)?;
    log::info!("loaded {} ({} instructions)", filename, state.program.len());

    let _ = interp::execute(&mut state);
    Ok(state.close())
}

/// Prints each decoded instruction with its byte offset, one per line.
fn disassemble(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    let filename = args.get_one::<String>("file").unwrap();
    let bytes = std::fs::read(filename)?;
    let program = decode_program(&bytes)?;
    for (pc, insn) in program.iter().enumerate() {
        println!("{:>4}: {}", pc, insn);
    }
    Ok(0)
}

/// Installs a `SIGINT` handler that sets `interrupt`. Uses `libc` directly
/// rather than a signal-handling crate: the core stays signal-free (see
/// `alu::interrupt`), and the CLI is the one place in this crate that
/// needs to touch process-wide state.
fn install_interrupt_handler(interrupt: Interrupt) {
    use std::sync::OnceLock;
    static HANDLER_TARGET: OnceLock<Interrupt> = OnceLock::new();
    let _ = HANDLER_TARGET.set(interrupt);

    extern "C" fn on_sigint(_: libc::c_int) {
        if let Some(flag) = HANDLER_TARGET.get() {
            flag.set();
        }
    }

    unsafe {
        libc::signal(libc::SIGINT, on_sigint as libc::sighandler_t);
    }
}

pub fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    let stdout = ConsoleAppender::builder().encoder(Box::new(encoder)).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    let _handle = log4rs::init_config(config).unwrap();
}
