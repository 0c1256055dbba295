// viewsmith/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "viewsmith")]
#[command(about = "Declarative Athena view deployment for customer groups", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding viewsmith.yaml
    #[arg(long, global = true, default_value = ".", env = "VIEWSMITH_SETTINGS_DIR")]
    pub settings_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Deploys the views described by one config file
    Deploy {
        /// Deployment config (JSON)
        config: PathBuf,
    },

    /// 📦 Deploys every config of a folder, in file-name order, stopping at the first failure
    Batch {
        /// Config folder (defaults to folder_path from viewsmith.yaml)
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Resume from this file name, skipping the ones before it
        #[arg(long)]
        start_at: Option<String>,
    },

    /// 📝 Validates a config and prints the DDL it would run, without contacting AWS
    Plan {
        /// Deployment config (JSON)
        config: PathBuf,

        /// Also write one <view>.sql file per view into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
