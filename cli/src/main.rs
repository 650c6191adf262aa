mod automation;
mod cli;
mod compare;
mod context;
mod dashboard;
mod download;
mod error;
mod health;
mod init;
mod process;
mod progress;
mod reports;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process as std_process;

fn main() {
    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Init { force } => init::execute(&global, force),
        Commands::Health => health::execute(&global),
        Commands::Dashboard => dashboard::execute(&global),
        Commands::Reports { view } => reports::execute(&global, view),
        Commands::Process { action } => process::execute(&global, action),
        Commands::Download { target } => download::execute(&global, target),
        Commands::Compare { target } => compare::execute(&global, target),
        Commands::Automation { flow } => automation::execute(&global, flow),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        std_process::exit(1);
    }
}
