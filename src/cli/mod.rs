// src/cli/mod.rs — CLI definition (clap derive)

pub mod run;
pub mod status;
pub mod test_email;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ralph", about = "Iterative quality-gated blog generator", version)]
pub struct Cli {
    /// Target slot, e.g. a publication date (defaults to today)
    #[arg(short, long)]
    pub slot: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute one generation run (the default when no subcommand is given)
    Run,
    /// Show recent runs
    Status {
        /// Number of runs to list
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Send a test alert through the configured email channel
    TestEmail,
}
