// viewsmith/src/commands/deploy.rs
//
// USE CASE: Deploy one config file.

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;
use viewsmith_core::application::{DeployOptions, Deployer};
use viewsmith_core::infrastructure::adapters::AwsConnectorFactory;

use super::{poll_policy, print_failure, settings};

pub async fn execute(config: PathBuf, settings_dir: PathBuf) -> anyhow::Result<()> {
    let start = Instant::now();

    println!("⚙️  Loading settings...");
    let settings = settings(&settings_dir)?;
    info!(?settings, "Run settings");

    let factory = AwsConnectorFactory::new(poll_policy(&settings));
    let deployer = Deployer::new(factory, DeployOptions::from(&settings));

    let result = deployer.deploy(&config).await;

    if result.succeeded {
        println!(
            "\n✨ SUCCESS! {} view(s) deployed into {} in {:.2?}",
            result.per_table_status.len(),
            result.target_schema.as_deref().unwrap_or("?"),
            start.elapsed()
        );
        Ok(())
    } else {
        print_failure(&result);
        std::process::exit(1);
    }
}
