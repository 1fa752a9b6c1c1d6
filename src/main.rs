//! procmem command-line entry point
//!
//! Commands:
//! - read:  print one typed value from another process
//! - write: store one typed value into another process
//! - demo:  read a double, then write a float at the same address
//! - types: list the supported data types
//! - regen: regenerate packed instruction-name tables

use std::io;
use std::process;

use procmem::{app, logging, ui};

fn main() {
    let args = app::cli::parse_args();
    logging::init(args.verbosity, args.quiet);

    if let Err(e) = app::run(args.command) {
        let _ = ui::error_line(&mut io::stderr(), &e);
        process::exit(1);
    }
}
