// src/main.rs — Ralph entry point

use clap::Parser;

use ralph::cli::{Cli, Commands};
use ralph::infra::config::Config;
use ralph::infra::logger;

#[tokio::main]
async fn main() {
    // Respects RUST_LOG
    logger::init_logging("info");

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    config.validate()?;

    match cli.command {
        Some(Commands::Status { limit }) => {
            ralph::cli::status::show_status(limit)?;
            Ok(0)
        }
        Some(Commands::TestEmail) => {
            ralph::cli::test_email::send_test_email(&config).await?;
            Ok(0)
        }
        Some(Commands::Run) | None => {
            let slot = cli
                .slot
                .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            ralph::cli::run::run_once(&config, &slot).await
        }
    }
}
