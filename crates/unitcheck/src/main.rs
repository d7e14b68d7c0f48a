use clap::{Parser, Subcommand};

mod check;
mod partitions;
mod rules;

#[derive(Parser)]
#[command(name = "unitcheck")]
#[command(about = "Checks ingredient unit conversion rules for ambiguity and circles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rule file
    #[command(alias = "c")]
    Check(check::CheckArgs),

    /// Show how a rule file is partitioned and which rules chain
    #[command(alias = "p")]
    Partitions(partitions::PartitionsArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => check::execute(args),
        Commands::Partitions(args) => partitions::execute(args),
    }
}
