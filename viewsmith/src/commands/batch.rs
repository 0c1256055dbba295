// viewsmith/src/commands/batch.rs
//
// USE CASE: Deploy every config of a folder, fail-fast.

use std::path::PathBuf;
use std::time::Instant;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use viewsmith_core::application::{
    BatchCoordinator, BatchOptions, BatchReport, DeployOptions, Deployer,
};
use viewsmith_core::infrastructure::adapters::AwsConnectorFactory;

use super::{poll_policy, print_error, print_failure, settings};

pub async fn execute(
    folder: Option<PathBuf>,
    start_at: Option<String>,
    settings_dir: PathBuf,
) -> anyhow::Result<()> {
    let start = Instant::now();

    println!("⚙️  Loading settings...");
    let settings = settings(&settings_dir)?;

    // --folder wins over VIEWSMITH_FOLDER_PATH, which wins over viewsmith.yaml.
    let Some(folder_path) = folder.or_else(|| settings.folder_path.clone()) else {
        anyhow::bail!(
            "❌ No config folder given.\n👉 Pass --folder, set VIEWSMITH_FOLDER_PATH, or set folder_path in viewsmith.yaml."
        );
    };

    let deployer = Deployer::new(
        AwsConnectorFactory::new(poll_policy(&settings)),
        DeployOptions::from(&settings),
    );
    let coordinator = BatchCoordinator::new(
        deployer,
        BatchOptions {
            folder_path,
            start_at,
            report_path: settings.report_path.clone(),
        },
    );

    let report = match coordinator.run().await {
        Ok(report) => report,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };

    println!("\n{}", summary_table(&report));
    if let Some(path) = &settings.report_path {
        println!("📄 Report: {}", path.display());
    }

    match report.halting_result() {
        None => {
            println!(
                "\n✨ SUCCESS! {} config file(s) deployed in {:.2?}",
                report.results.len(),
                start.elapsed()
            );
            Ok(())
        }
        Some(failed) => {
            eprintln!(
                "\n🔁 Fix the config or the source tables, then resume with: --start-at {}",
                failed.file_name()
            );
            print_failure(failed);
            std::process::exit(1);
        }
    }
}

fn summary_table(report: &BatchReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Config", "Status", "Views", "Detail"]);

    for result in &report.results {
        let (status, detail) = if result.succeeded {
            ("✅ deployed", String::new())
        } else {
            let stage = result
                .failed_stage
                .map(|s| s.to_string())
                .unwrap_or_default();
            ("❌ failed", stage)
        };
        let views = result.per_table_status.iter().filter(|t| t.succeeded).count();
        table.add_row(vec![
            Cell::new(result.file_name()),
            Cell::new(status),
            Cell::new(views),
            Cell::new(detail),
        ]);
    }

    for name in report.not_attempted() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new("⏭️  not attempted"),
            Cell::new(""),
            Cell::new(""),
        ]);
    }

    table
}
