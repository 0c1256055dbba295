// viewsmith-core/src/application/provision.rs

use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::application::engine::execute_statement;
use crate::domain::compiler::IdentifierQuoter;
use crate::domain::deployment::DeploymentConfig;
use crate::domain::deployment::config::DEFAULT_DATA_CATALOG;
use crate::error::ViewsmithError;
use crate::ports::catalog::CreateOutcome;
use crate::ports::connector::EngineSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyPresent,
    Created,
    /// Glue only manages the account's default catalog; other catalogs are left alone.
    SkippedExternalCatalog,
}

/// Makes sure the target schema exists before any view is created in it.
///
/// Catalog lookups, creation and tagging can fail the deployment. An unresolvable ARN and
/// the engine refresh query degrade to warnings.
#[instrument(skip_all, fields(schema = %config.target_schema_name))]
pub async fn ensure_target_schema(
    session: &EngineSession,
    config: &DeploymentConfig,
    settle_delay: Duration,
) -> Result<ProvisionOutcome, ViewsmithError> {
    let schema = config.target_schema_name.as_str();

    let catalog = config.connection.data_catalog();
    if !catalog.eq_ignore_ascii_case(DEFAULT_DATA_CATALOG) {
        warn!(
            catalog,
            "Data catalog is not the default Glue catalog, skipping schema provisioning"
        );
        return Ok(ProvisionOutcome::SkippedExternalCatalog);
    }

    if session.catalog.schema_exists(schema).await? {
        info!("Target schema already exists, skipping creation and tagging");
        return Ok(ProvisionOutcome::AlreadyPresent);
    }

    match session
        .catalog
        .create_schema(schema, &config.schema_description())
        .await?
    {
        CreateOutcome::Created => info!("Created target schema"),
        CreateOutcome::AlreadyExists => {
            info!("Target schema was created concurrently, treating it as existing");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }
    }

    if !settle_delay.is_zero() {
        info!("Waiting {:?} for the catalog to settle", settle_delay);
        tokio::time::sleep(settle_delay).await;
    }

    if !config.tags.is_empty() {
        tag_schema(session, config).await?;
    }

    let refresh = format!("SHOW TABLES IN {}", IdentifierQuoter::quote(schema));
    if let Err(e) = execute_statement(session.connector.as_ref(), &refresh, Some(schema)).await {
        warn!(error = %e, "Engine did not pick up the new schema yet; view creation will tell");
    }

    Ok(ProvisionOutcome::Created)
}

async fn tag_schema(
    session: &EngineSession,
    config: &DeploymentConfig,
) -> Result<(), ViewsmithError> {
    let schema = config.target_schema_name.as_str();
    let arn = match session.catalog.schema_arn(schema).await {
        Ok(Some(arn)) => arn,
        Ok(None) => {
            warn!("Could not resolve the schema ARN, skipping tags");
            return Ok(());
        }
        Err(e) => {
            warn!(error = %e, "Could not resolve the schema ARN, skipping tags");
            return Ok(());
        }
    };

    session.catalog.tag_schema(&arn, &config.tags).await?;
    info!(arn = %arn, count = config.tags.len(), "Tagged target schema");
    Ok(())
}
