//! Atomic Style Compiler Binary

use atomc::cli::Cli;
use atomc::EngineError;
use std::process;

fn main() {
    let mut cli = Cli::new();

    match cli.run() {
        Ok(()) => {}
        Err(EngineError::Io(e)) => {
            eprintln!("IO Error: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{} failed: {}", atomc::NAME, e);
            process::exit(1);
        }
    }
}
