#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::{IsTerminal, Write};

use tkit_cli::args::{CliArgs, ColorMode};
use tkit_cli::driver::{self, EXIT_ERROR};

fn main() {
    // Only installs a subscriber when TKIT_LOG or RUST_LOG is set.
    // TKIT_LOG_FORMAT=tree|json|text picks the layout (see tracing_config.rs).
    tkit_cli::tracing_config::init_tracing();

    // clap exits with status 2 on usage errors
    let args = CliArgs::parse();

    let color = match args.color {
        ColorMode::Auto => std::io::stdout().is_terminal(),
        ColorMode::Always => {
            colored::control::set_override(true);
            true
        }
        ColorMode::Never => false,
    };

    let mut stdout = std::io::stdout().lock();
    let code = match driver::run(&args, color, &mut stdout) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_ERROR
        }
    };
    if let Err(err) = stdout.flush() {
        eprintln!("error: failed to flush output: {err}");
    }
    drop(stdout);
    std::process::exit(code);
}
