use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version = "0.1.0")]
#[command(about = "Run Solana wallet, transfer, staking and lookup operations")]
#[command(
    long_about = "Runs one Solana operation over a batch of input items. \
    Each item is a parameter object; one JSON output record is printed per item, in input order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an operation over the input items
    Run {
        /// Path to config.yaml file (credentials may also come from the environment)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Operation value, e.g. sendSol or getBalance
        #[arg(short, long)]
        operation: String,

        /// YAML or JSON file with a sequence of item parameter objects
        #[arg(short, long)]
        items: Option<PathBuf>,

        /// Emit an error record for failing items instead of aborting the run
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// List the supported operations
    Operations,

    /// Check that the configured key decodes and the RPC endpoint answers
    TestCredentials {
        /// Path to config.yaml file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate a sample config file
    GenerateConfig {
        /// Path to output config file
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
