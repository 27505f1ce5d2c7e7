pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shelf",
    about = "Shelf operator CLI",
    long_about = "Inspect configuration and run readiness checks for the shelf catalog service.",
    after_help = "Examples:\n  shelf doctor --json\n  shelf config\n  shelf smoke --base-url http://localhost:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate configuration and seed-data readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print the deterministic demo seed dataset")]
    Seed,
    #[command(about = "Run readiness checks with per-check timing details")]
    Smoke {
        #[arg(long, help = "Also probe a running catalog server at this base URL")]
        base_url: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Seed => commands::seed::run(),
        Command::Smoke { base_url } => commands::smoke::run(base_url.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
