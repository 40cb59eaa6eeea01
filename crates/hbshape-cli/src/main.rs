//! hbshape CLI - shape text from the command line

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Shape(args) => commands::shape::run(args),
        Commands::Info(args) => commands::info::run(args),
    };

    if let Err(err) = result {
        log::debug!("Command failed: {err:?}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
