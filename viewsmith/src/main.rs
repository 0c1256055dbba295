// viewsmith/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug viewsmith deploy ... to see poll iterations
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { config } => commands::deploy::execute(config, cli.settings_dir).await,
        Commands::Batch { folder, start_at } => {
            commands::batch::execute(folder, start_at, cli.settings_dir).await
        }
        Commands::Plan { config, out } => commands::plan::execute(config, out),
    }
}
