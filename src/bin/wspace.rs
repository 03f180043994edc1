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
use std::fs;

use clap::{arg, Arg, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
//
use wspace::program::Parser;

fn main() -> Result<(), Box<dyn Error>> {
    // Parse command-line arguments
    let matches = Command::new("wspace")
        .about("Whitespace Interpreter")
        .version("0.1.0")
        .subcommand_required(true)
        .arg(arg!(--verbose "Show verbose output"))
        .subcommand(
            Command::new("run")
                .about("Run a Whitespace program")
                .arg(Arg::new("file").required(true))
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .takes_value(true)
                        .help("File supplying the program's input stream"),
                )
                .visible_alias("r"),
        )
        .subcommand(
            Command::new("disassemble")
                .about("Print the decoded instructions of a Whitespace program")
                .arg(Arg::new("file").required(true))
                .visible_alias("d"),
        )
        .get_matches();
    // Extract top-level flags
    let verbose = matches.is_present("verbose");
    // Initialise logging
    if verbose {
        init_logging(LevelFilter::Info);
    }
    // Dispatch on outcome
    let ok = match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("disassemble", args)) => disassemble(args),
        _ => unreachable!(),
    }?;
    // Determine appropriate exit code
    let exitcode = if ok { 0 } else { 1 };
    // Done
    std::process::exit(exitcode);
}

/// Execute a given program file against its input stream (the
/// contents of the `--input` file, or nothing at all).
fn run(args: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    // Extract the file to be executed.
    let filename = args.get_one::<String>("file").unwrap();
    // Read the program file
    let text = fs::read_to_string(filename)?;
    // Read the input stream, if the program has one
    let input = match args.get_one::<String>("input") {
        Some(f) => fs::read_to_string(f)?,
        None => String::new(),
    };
    // Execute the program
    match wspace::interpret(&text, &input) {
        Ok(output) => {
            print!("{output}");
            Ok(true)
        }
        Err(err) => {
            eprintln!("error: {err}");
            Ok(false)
        }
    }
}

/// Print the decoded instruction listing of a given program file.
fn disassemble(args: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let filename = args.get_one::<String>("file").unwrap();
    // Read the program file
    let text = fs::read_to_string(filename)?;
    // Parse it into instructions
    let program = match Parser::new(&text).parse() {
        Ok(program) => program,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(false);
        }
    };
    // Print them all out.
    for (i, insn) in program.instructions().iter().enumerate() {
        println!("{i:04}: {insn}");
    }
    Ok(true)
}

/// Initialise logging using a suitable pattern.
pub fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    //
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(encoder))
        .build();
    //
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    //
    let _handle = log4rs::init_config(config).unwrap();
}
