// viewsmith/src/commands/mod.rs

pub mod batch;
pub mod deploy;
pub mod plan;

use std::path::Path;

use anyhow::Context;
use viewsmith_core::ViewsmithError;
use viewsmith_core::domain::deployment::{DeploymentResult, RunSettings};
use viewsmith_core::infrastructure::adapters::PollPolicy;
use viewsmith_core::infrastructure::config::load_settings;

pub(crate) fn settings(settings_dir: &Path) -> anyhow::Result<RunSettings> {
    load_settings(settings_dir)
        .with_context(|| format!("Failed to load settings from {:?}", settings_dir))
}

pub(crate) fn poll_policy(settings: &RunSettings) -> PollPolicy {
    PollPolicy {
        interval: settings.poll_interval(),
        timeout: settings.timeout(),
    }
}

/// Prints why a deployment failed. Always the last thing written before exiting non-zero.
pub(crate) fn print_failure(result: &DeploymentResult) {
    eprintln!("\n❌ FAILURE in {}", result.file_name());
    if let Some(stage) = result.failed_stage {
        eprintln!("   Stage:  {}", stage);
    }
    match result.failed_table() {
        Some(table) => {
            eprintln!("   Table:  {}", table.table_name);
            if let Some(qid) = &table.query_execution_id {
                eprintln!("   Query:  {}", qid);
            }
            eprintln!(
                "   Engine: {}",
                table.error_detail.as_deref().unwrap_or("Unknown error")
            );
        }
        None => {
            if let Some(failure) = &result.failure {
                eprintln!("   Error:  {}", failure);
            }
        }
    }
}

/// Prints a core error with its diagnostic help, when it has one.
pub(crate) fn print_error(err: &ViewsmithError) {
    eprintln!("\n💥 {}", err);
    if let Some(help) = err.diagnostic().and_then(|d| d.help()) {
        eprintln!("👉 {}", help);
    }
}
