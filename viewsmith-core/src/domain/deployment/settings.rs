// viewsmith-core/src/domain/deployment/settings.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Operator settings shared by every deployment of a run (`viewsmith.yaml`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RunSettings {
    /// Directory scanned by `batch` for `*.json` deployment documents.
    #[serde(default)]
    pub folder_path: Option<PathBuf>,

    /// Where the batch report is written. No report when unset.
    #[serde(default)]
    pub report_path: Option<PathBuf>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_provision_schema")]
    pub provision_schema: bool,

    /// Pause after creating a schema, for catalog eventual consistency.
    #[serde(default = "default_schema_settle_secs")]
    pub schema_settle_secs: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            folder_path: None,
            report_path: None,
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
            provision_schema: default_provision_schema(),
            schema_settle_secs: default_schema_settle_secs(),
        }
    }
}

impl RunSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn schema_settle_delay(&self) -> Duration {
        Duration::from_secs(self.schema_settle_secs)
    }
}

fn default_poll_interval_ms() -> u64 {
    5_000
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_provision_schema() -> bool {
    true
}
fn default_schema_settle_secs() -> u64 {
    10
}
