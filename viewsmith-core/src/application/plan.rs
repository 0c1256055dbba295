// viewsmith-core/src/application/plan.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::compiler::{ViewBuilder, ViewDefinition};
use crate::domain::deployment::DeploymentConfig;
use crate::error::ViewsmithError;
use crate::infrastructure::config::load_deployment_config;
use crate::infrastructure::fs::atomic_write;

/// What a deployment would do, computed without contacting the engine.
#[derive(Debug)]
pub struct DeploymentPlan {
    pub config: DeploymentConfig,
    pub views: Vec<ViewDefinition>,
}

impl DeploymentPlan {
    pub fn statements(&self) -> Vec<String> {
        self.views.iter().map(ViewDefinition::ddl).collect()
    }
}

/// Loads and validates a config, then builds its views. The engine class is checked too,
/// so a plan that succeeds would get past every pre-network stage of a real deploy.
#[instrument]
pub fn plan_deployment(path: &Path) -> Result<DeploymentPlan, ViewsmithError> {
    let config = load_deployment_config(path)?;
    let views = ViewBuilder::build(&config)?;
    config.connection.engine_class()?;
    Ok(DeploymentPlan { config, views })
}

/// Writes `<out_dir>/<view>.sql` for each view and returns the written paths.
#[instrument(skip(plan))]
pub fn write_plan(plan: &DeploymentPlan, out_dir: &Path) -> Result<Vec<PathBuf>, ViewsmithError> {
    let mut written = Vec::with_capacity(plan.views.len());
    for view in &plan.views {
        let path = out_dir.join(format!("{}.sql", view.target_view_name));
        atomic_write(&path, format!("{};\n", view.ddl()))?;
        written.push(path);
    }
    info!(count = written.len(), "Plan written");
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::test_support::{write_config, write_config_with_class};
    use crate::domain::error::DomainError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_plan_and_write() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "acme.json", &["orders", "customers"]);

        let plan = plan_deployment(&path).unwrap();
        assert_eq!(plan.statements().len(), 2);

        let out = dir.path().join("sql");
        let written = write_plan(&plan, &out).unwrap();
        assert_eq!(written, vec![out.join("orders.sql"), out.join("customers.sql")]);

        let sql = fs::read_to_string(out.join("orders.sql")).unwrap();
        assert!(sql.starts_with(r#"CREATE OR REPLACE VIEW "awsdatacatalog"."acme_views"."orders""#));
        assert!(sql.ends_with("WHERE tenant_id = 'acme';\n"));
    }

    #[test]
    fn test_plan_rejects_unsupported_engine() {
        let dir = tempdir().unwrap();
        let path = write_config_with_class(dir.path(), "acme.json", &["a"], "redshift");

        let err = plan_deployment(&path).unwrap_err();
        assert!(matches!(
            err,
            ViewsmithError::Domain(DomainError::UnsupportedEngine(ref class)) if class == "redshift"
        ));
    }
}
