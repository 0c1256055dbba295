// viewsmith/src/commands/plan.rs
//
// USE CASE: Show the DDL a deployment would run, offline.

use std::path::PathBuf;

use viewsmith_core::application::{plan_deployment, write_plan};

use super::print_error;

pub fn execute(config: PathBuf, out: Option<PathBuf>) -> anyhow::Result<()> {
    let plan = match plan_deployment(&config) {
        Ok(plan) => plan,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };

    println!(
        "📝 Plan for '{}': {} view(s) in {}",
        plan.config.customer_group(),
        plan.views.len(),
        plan.config.target_schema_name
    );
    for statement in plan.statements() {
        println!("{};", statement);
    }

    if let Some(out_dir) = out {
        let written = write_plan(&plan, &out_dir)?;
        println!("✨ Wrote {} file(s) to {}", written.len(), out_dir.display());
    }

    Ok(())
}
