// viewsmith-core/src/domain/deployment/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Phase of a single deployment in which a file-level failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStage {
    LoadConfig,
    BuildViews,
    ResolveEngine,
    ProvisionSchema,
    ExecuteViews,
}

impl fmt::Display for DeploymentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LoadConfig => "load config",
            Self::BuildViews => "build views",
            Self::ResolveEngine => "resolve engine",
            Self::ProvisionSchema => "provision schema",
            Self::ExecuteViews => "execute views",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStatus {
    pub table_name: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_execution_id: Option<String>,
}

/// Outcome of deploying one configuration file.
///
/// `per_table_status` holds every table that was attempted, in order. Tables after a
/// failing one are absent: absence means "not reached".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub config_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<DeploymentStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub per_table_status: Vec<TableStatus>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeploymentResult {
    pub fn started(config_path: &Path) -> Self {
        let now = Utc::now();
        Self {
            config_path: config_path.to_path_buf(),
            customer_group: None,
            target_schema: None,
            succeeded: false,
            failed_stage: None,
            failure: None,
            per_table_status: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn record_table(&mut self, status: TableStatus) {
        self.per_table_status.push(status);
    }

    /// Closes the result as failed at `stage`.
    pub fn fail(mut self, stage: DeploymentStage, failure: impl Into<String>) -> Self {
        self.succeeded = false;
        self.failed_stage = Some(stage);
        self.failure = Some(failure.into());
        self.finished_at = Utc::now();
        self
    }

    /// Closes the result; it succeeds only if every attempted table succeeded.
    pub fn finish(mut self) -> Self {
        self.succeeded = self.per_table_status.iter().all(|t| t.succeeded);
        if !self.succeeded && self.failed_stage.is_none() {
            self.failed_stage = Some(DeploymentStage::ExecuteViews);
        }
        self.finished_at = Utc::now();
        self
    }

    pub fn failed_table(&self) -> Option<&TableStatus> {
        self.per_table_status.iter().find(|t| !t.succeeded)
    }

    pub fn file_name(&self) -> String {
        self.config_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.config_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(table: &str) -> TableStatus {
        TableStatus {
            table_name: table.into(),
            succeeded: true,
            error_detail: None,
            query_execution_id: Some(format!("qid-{}", table)),
        }
    }

    #[test]
    fn test_finish_all_tables_ok() {
        let mut result = DeploymentResult::started(Path::new("cfg/a.json"));
        result.record_table(ok("a"));
        result.record_table(ok("b"));
        let result = result.finish();

        assert!(result.succeeded);
        assert_eq!(result.failed_stage, None);
        assert_eq!(result.failed_table(), None);
        assert_eq!(result.file_name(), "a.json");
    }

    #[test]
    fn test_finish_with_failed_table() {
        let mut result = DeploymentResult::started(Path::new("a.json"));
        result.record_table(ok("a"));
        result.record_table(TableStatus {
            table_name: "b".into(),
            succeeded: false,
            error_detail: Some("COLUMN_NOT_FOUND".into()),
            query_execution_id: None,
        });
        let result = result.finish();

        assert!(!result.succeeded);
        assert_eq!(result.failed_stage, Some(DeploymentStage::ExecuteViews));
        assert_eq!(
            result.failed_table().map(|t| t.table_name.as_str()),
            Some("b")
        );
    }

    #[test]
    fn test_fail_keeps_stage_and_message() {
        let result = DeploymentResult::started(Path::new("a.json"))
            .fail(DeploymentStage::LoadConfig, "bad json");
        assert!(!result.succeeded);
        assert_eq!(result.failed_stage, Some(DeploymentStage::LoadConfig));
        assert_eq!(result.failure.as_deref(), Some("bad json"));
        assert!(result.per_table_status.is_empty());
    }
}
