// viewsmith-core/src/application/deploy.rs

use std::path::Path;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::application::engine::{execute_statement, failure_detail};
use crate::application::provision::{ProvisionOutcome, ensure_target_schema};
use crate::domain::compiler::ViewBuilder;
use crate::domain::deployment::{
    DeploymentConfig, DeploymentResult, DeploymentStage, RunSettings, TableStatus,
};
use crate::infrastructure::config::load_deployment_config;
use crate::ports::connector::ConnectorFactory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub provision_schema: bool,
    pub schema_settle_delay: Duration,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self::from(&RunSettings::default())
    }
}

impl From<&RunSettings> for DeployOptions {
    fn from(settings: &RunSettings) -> Self {
        Self {
            provision_schema: settings.provision_schema,
            schema_settle_delay: settings.schema_settle_delay(),
        }
    }
}

/// Deploys one configuration file end to end.
///
/// Never returns an error: every failure is folded into the [`DeploymentResult`] together
/// with the stage it happened in.
pub struct Deployer<F> {
    factory: F,
    options: DeployOptions,
}

impl<F: ConnectorFactory> Deployer<F> {
    pub fn new(factory: F, options: DeployOptions) -> Self {
        Self { factory, options }
    }

    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn deploy(&self, path: &Path) -> DeploymentResult {
        let result = DeploymentResult::started(path);

        let config = match load_deployment_config(path) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Config rejected");
                return result.fail(DeploymentStage::LoadConfig, e.to_string());
            }
        };

        self.deploy_config(result, &config).await
    }

    async fn deploy_config(
        &self,
        mut result: DeploymentResult,
        config: &DeploymentConfig,
    ) -> DeploymentResult {
        result.customer_group = Some(config.customer_group().to_string());
        result.target_schema = Some(config.target_schema_name.clone());

        let views = match ViewBuilder::build(config) {
            Ok(views) => views,
            Err(e) => {
                error!(error = %e, "Could not build view definitions");
                return result.fail(DeploymentStage::BuildViews, e.to_string());
            }
        };

        // Resolved before connecting so an unknown class never touches the network.
        let session = match config.connection.engine_class() {
            Ok(class) => match self.factory.connect(class, &config.connection).await {
                Ok(session) => session,
                Err(e) => return result.fail(DeploymentStage::ResolveEngine, e.to_string()),
            },
            Err(e) => {
                error!(error = %e, "Engine class rejected");
                return result.fail(DeploymentStage::ResolveEngine, e.to_string());
            }
        };

        println!(
            "🚀 Deploying {} view(s) for '{}' into {}",
            views.len(),
            config.customer_group(),
            config.target_schema_name
        );

        if self.options.provision_schema {
            match ensure_target_schema(&session, config, self.options.schema_settle_delay).await {
                Ok(ProvisionOutcome::Created) => {
                    println!("  🆕 Created schema {}", config.target_schema_name)
                }
                Ok(ProvisionOutcome::AlreadyPresent | ProvisionOutcome::SkippedExternalCatalog) => {}
                Err(e) => {
                    error!(error = %e, "Target schema provisioning failed");
                    return result.fail(DeploymentStage::ProvisionSchema, e.to_string());
                }
            }
        }

        for view in &views {
            let statement = view.ddl();
            match execute_statement(
                session.connector.as_ref(),
                &statement,
                Some(&view.target_schema),
            )
            .await
            {
                Ok(receipt) => {
                    info!(table = %view.target_view_name, query_execution_id = %receipt.query_execution_id, "View created");
                    println!("  ✅ {}", view.display_name());
                    result.record_table(TableStatus {
                        table_name: view.target_view_name.clone(),
                        succeeded: true,
                        error_detail: None,
                        query_execution_id: Some(receipt.query_execution_id),
                    });
                }
                Err(e) => {
                    let (detail, query_execution_id) = failure_detail(&e);
                    eprintln!("  ❌ {}: {}", view.display_name(), detail);
                    result.failure = Some(format!("table '{}': {}", view.target_view_name, detail));
                    result.record_table(TableStatus {
                        table_name: view.target_view_name.clone(),
                        succeeded: false,
                        error_detail: Some(detail),
                        query_execution_id,
                    });
                    // Remaining tables are left untouched.
                    break;
                }
            }
        }

        result.finish()
    }
}
