// viewsmith-core/src/application/batch.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use crate::application::deploy::Deployer;
use crate::domain::deployment::DeploymentResult;
use crate::error::ViewsmithError;
use crate::infrastructure::config::discover_config_files;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::connector::ConnectorFactory;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub folder_path: PathBuf,
    /// File name to resume from; earlier files are skipped.
    pub start_at: Option<String>,
    pub report_path: Option<PathBuf>,
}

/// Outcome of a batch run, persisted as JSON when a report path is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub folder_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    /// File names selected for this run, in execution order.
    pub planned: Vec<String>,
    pub results: Vec<DeploymentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted_at: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn succeeded(&self) -> bool {
        self.halted_at.is_none()
    }

    pub fn halting_result(&self) -> Option<&DeploymentResult> {
        self.results.iter().find(|r| !r.succeeded)
    }

    /// Planned files that were never attempted because the batch stopped.
    pub fn not_attempted(&self) -> &[String] {
        &self.planned[self.results.len().min(self.planned.len())..]
    }
}

/// Deploys every config file of a folder in file-name order, stopping at the first failure.
pub struct BatchCoordinator<F> {
    deployer: Deployer<F>,
    options: BatchOptions,
}

impl<F: ConnectorFactory> BatchCoordinator<F> {
    pub fn new(deployer: Deployer<F>, options: BatchOptions) -> Self {
        Self { deployer, options }
    }

    /// The files this batch would run, after `start_at` is applied.
    pub fn planned_files(&self) -> Result<Vec<PathBuf>, ViewsmithError> {
        let files = discover_config_files(&self.options.folder_path)?;
        Ok(skip_to_start(files, &self.options)?)
    }

    #[instrument(skip(self), fields(folder = %self.options.folder_path.display()))]
    pub async fn run(&self) -> Result<BatchReport, ViewsmithError> {
        let files = self.planned_files()?;
        let mut report = BatchReport {
            folder_path: self.options.folder_path.clone(),
            start_at: self.options.start_at.clone(),
            planned: files.iter().map(|p| file_name(p)).collect(),
            results: Vec::with_capacity(files.len()),
            halted_at: None,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        println!(
            "📦 {} config file(s) to deploy from {:?}",
            files.len(),
            self.options.folder_path
        );

        for path in &files {
            println!("🔹 {}", file_name(path));
            let result = self.deployer.deploy(path).await;
            let failed = !result.succeeded;
            report.results.push(result);

            if failed {
                warn!(file = %file_name(path), "Deployment failed, halting batch");
                report.halted_at = Some(file_name(path));
                break;
            }
        }

        report.finished_at = Utc::now();
        info!(
            deployed = report.results.iter().filter(|r| r.succeeded).count(),
            planned = report.planned.len(),
            halted = report.halted_at.is_some(),
            "Batch finished"
        );

        if let Some(report_path) = &self.options.report_path {
            // The deployments already happened; a report that can't be written must not hide them.
            if let Err(e) = write_report(&report, report_path) {
                error!(path = ?report_path, error = %e, "Could not write batch report");
                eprintln!("⚠️  Could not write batch report {:?}: {}", report_path, e);
            }
        }

        Ok(report)
    }
}

fn skip_to_start(
    files: Vec<PathBuf>,
    options: &BatchOptions,
) -> Result<Vec<PathBuf>, InfrastructureError> {
    let Some(start_at) = options.start_at.as_deref() else {
        return Ok(files);
    };

    match files.iter().position(|p| file_name(p) == start_at) {
        Some(idx) => {
            if idx > 0 {
                info!(skipped = idx, start_at, "Resuming batch");
            }
            Ok(files.into_iter().skip(idx).collect())
        }
        None => Err(InfrastructureError::UnknownStartAt {
            start_at: start_at.to_string(),
            folder: options.folder_path.clone(),
            available: files.len(),
        }),
    }
}

#[instrument(skip(report))]
pub fn write_report(report: &BatchReport, path: &Path) -> Result<(), ViewsmithError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| ViewsmithError::InternalError(format!("Report serialization: {}", e)))?;
    atomic_write(path, json)?;
    info!("Batch report written");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::deploy::DeployOptions;
    use crate::application::test_support::{MockFactory, write_config};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn coordinator(factory: &MockFactory, options: BatchOptions) -> BatchCoordinator<MockFactory> {
        let deployer = Deployer::new(
            factory.clone(),
            DeployOptions {
                provision_schema: false,
                schema_settle_delay: Duration::ZERO,
            },
        );
        BatchCoordinator::new(deployer, options)
    }

    fn options(folder: &Path) -> BatchOptions {
        BatchOptions {
            folder_path: folder.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_halts_on_first_failed_file() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "f1.json", &["orders"]);
        write_config(dir.path(), "f2.json", &["broken"]);
        write_config(dir.path(), "f3.json", &["customers"]);
        let factory = MockFactory::failing_on(r#""broken""#);

        let report = coordinator(&factory, options(dir.path())).run().await.unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.planned, vec!["f1.json", "f2.json", "f3.json"]);
        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].succeeded);
        assert!(!report.results[1].succeeded);
        assert_eq!(report.halted_at.as_deref(), Some("f2.json"));
        assert_eq!(report.not_attempted(), ["f3.json".to_string()]);
        assert_eq!(report.halting_result().map(|r| r.file_name()), Some("f2.json".into()));
        // f3 never reached the engine.
        assert!(!factory.statements().iter().any(|s| s.contains("customers")));
    }

    #[tokio::test]
    async fn test_all_files_succeed() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "b.json", &["b"]);
        write_config(dir.path(), "a.json", &["a"]);

        let report = coordinator(&MockFactory::default(), options(dir.path()))
            .run()
            .await
            .unwrap();

        assert!(report.succeeded());
        let order: Vec<_> = report.results.iter().map(|r| r.file_name()).collect();
        assert_eq!(order, vec!["a.json", "b.json"]);
        assert!(report.not_attempted().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_halts_batch() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "a.json", &["a"]);
        fs::write(dir.path().join("b.json"), "{ not json").unwrap();
        write_config(dir.path(), "c.json", &["c"]);
        let factory = MockFactory::default();

        let report = coordinator(&factory, options(dir.path())).run().await.unwrap();

        assert_eq!(report.halted_at.as_deref(), Some("b.json"));
        assert_eq!(factory.connects(), 1);
    }

    #[tokio::test]
    async fn test_start_at_skips_earlier_files() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "f1.json", &["one"]);
        write_config(dir.path(), "f2.json", &["two"]);
        write_config(dir.path(), "f3.json", &["three"]);
        let factory = MockFactory::default();
        let opts = BatchOptions {
            start_at: Some("f2.json".into()),
            ..options(dir.path())
        };

        let report = coordinator(&factory, opts).run().await.unwrap();

        assert_eq!(report.planned, vec!["f2.json", "f3.json"]);
        assert!(report.succeeded());
        assert!(!factory.statements().iter().any(|s| s.contains("one")));
    }

    #[tokio::test]
    async fn test_unknown_start_at_is_an_error() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "f1.json", &["one"]);
        let opts = BatchOptions {
            start_at: Some("nope.json".into()),
            ..options(dir.path())
        };

        let result = coordinator(&MockFactory::default(), opts).run().await;

        assert!(matches!(
            result,
            Err(ViewsmithError::Infrastructure(InfrastructureError::UnknownStartAt { .. }))
        ));
    }

    #[tokio::test]
    async fn test_empty_folder_succeeds_with_nothing_to_do() {
        let dir = tempdir().unwrap();
        let report = coordinator(&MockFactory::default(), options(dir.path()))
            .run()
            .await
            .unwrap();
        assert!(report.succeeded());
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_report_is_persisted() {
        let dir = tempdir().unwrap();
        let configs = dir.path().join("configs");
        fs::create_dir(&configs).unwrap();
        write_config(&configs, "f1.json", &["orders"]);
        write_config(&configs, "f2.json", &["broken"]);
        let report_path = dir.path().join("reports").join("batch.json");
        let opts = BatchOptions {
            report_path: Some(report_path.clone()),
            ..options(&configs)
        };

        coordinator(&MockFactory::failing_on("broken"), opts)
            .run()
            .await
            .unwrap();

        let saved: BatchReport =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(saved.halted_at.as_deref(), Some("f2.json"));
        assert_eq!(saved.results.len(), 2);
        assert_eq!(
            saved.results[1].per_table_status[0].table_name,
            "broken"
        );
    }
}
