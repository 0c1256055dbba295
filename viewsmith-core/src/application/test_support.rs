// viewsmith-core/src/application/test_support.rs
//
// In-memory engine and catalog shared by the application tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::deployment::{ConnectionConfig, EngineClass};
use crate::error::ViewsmithError;
use crate::infrastructure::error::{EngineError, InfrastructureError};
use crate::ports::catalog::{CreateOutcome, SchemaCatalog};
use crate::ports::connector::{
    Connector, ConnectorFactory, EngineSession, ExecutionReceipt,
};

#[derive(Default)]
pub struct MockState {
    pub connects: usize,
    pub statements: Vec<String>,
    /// Statements containing one of these fragments fail with an engine error.
    pub failing: Vec<String>,
    /// Statements containing one of these fragments never finish in time.
    pub timing_out: Vec<String>,
    pub existing_schemas: Vec<String>,
    pub created_schemas: Vec<String>,
    pub tagged: Vec<(String, BTreeMap<String, String>)>,
    pub fail_catalog: bool,
    pub fail_tagging: bool,
}

#[derive(Clone, Default)]
pub struct MockFactory {
    pub state: Arc<Mutex<MockState>>,
}

impl MockFactory {
    pub fn failing_on(fragment: &str) -> Self {
        let factory = Self::default();
        factory.state.lock().unwrap().failing.push(fragment.to_string());
        factory
    }

    pub fn timing_out_on(fragment: &str) -> Self {
        let factory = Self::default();
        factory
            .state
            .lock()
            .unwrap()
            .timing_out
            .push(fragment.to_string());
        factory
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }
}

struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn execute(
        &self,
        statement: &str,
        _database: Option<&str>,
    ) -> Result<ExecutionReceipt, ViewsmithError> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(statement.to_string());
        let query_execution_id = format!("q-{}", state.statements.len());

        if state.failing.iter().any(|f| statement.contains(f.as_str())) {
            return Err(EngineError::Execution {
                query_execution_id,
                state: "FAILED".into(),
                message: "COLUMN_NOT_FOUND: Column 'tenant_id' cannot be resolved".into(),
            }
            .into());
        }
        if state.timing_out.iter().any(|f| statement.contains(f.as_str())) {
            return Err(EngineError::Timeout {
                query_execution_id,
                elapsed: Duration::from_secs(300),
            }
            .into());
        }
        Ok(ExecutionReceipt { query_execution_id })
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}

struct MockCatalog {
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl SchemaCatalog for MockCatalog {
    async fn schema_exists(&self, name: &str) -> Result<bool, ViewsmithError> {
        let state = self.state.lock().unwrap();
        if state.fail_catalog {
            return Err(InfrastructureError::Catalog("AccessDeniedException".into()).into());
        }
        Ok(state.existing_schemas.iter().any(|s| s == name))
    }

    async fn create_schema(
        &self,
        name: &str,
        _description: &str,
    ) -> Result<CreateOutcome, ViewsmithError> {
        let mut state = self.state.lock().unwrap();
        state.created_schemas.push(name.to_string());
        state.existing_schemas.push(name.to_string());
        Ok(CreateOutcome::Created)
    }

    async fn schema_arn(&self, name: &str) -> Result<Option<String>, ViewsmithError> {
        Ok(Some(format!("arn:aws:glue:us-east-1:000000000000:database/{}", name)))
    }

    async fn tag_schema(
        &self,
        arn: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ViewsmithError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_tagging {
            return Err(InfrastructureError::Catalog("TagResource denied".into()).into());
        }
        state.tagged.push((arn.to_string(), tags.clone()));
        Ok(())
    }
}

#[async_trait]
impl ConnectorFactory for MockFactory {
    async fn connect(
        &self,
        _class: EngineClass,
        _connection: &ConnectionConfig,
    ) -> Result<EngineSession, ViewsmithError> {
        self.state.lock().unwrap().connects += 1;
        Ok(EngineSession {
            connector: Box::new(MockConnector {
                state: self.state.clone(),
            }),
            catalog: Box::new(MockCatalog {
                state: self.state.clone(),
            }),
        })
    }
}

/// Writes a valid deployment document for `tables` and returns its path.
pub fn write_config(dir: &Path, file_name: &str, tables: &[&str]) -> PathBuf {
    write_config_with_class(dir, file_name, tables, "athena")
}

pub fn write_config_with_class(
    dir: &Path,
    file_name: &str,
    tables: &[&str],
    class: &str,
) -> PathBuf {
    let doc = serde_json::json!({
        "customer_group_identifier": "acme",
        "target_schema_name": "acme_views",
        "source_schema_name": "raw",
        "where_condition": "tenant_id = 'acme'",
        "base_tables": tables,
        "tags": { "owner": "data-platform" },
        "connection": {
            "class": class,
            "s3_output_location": "s3://athena-results/acme/",
            "aws_region": "us-east-1"
        }
    });
    let path = dir.join(file_name);
    fs::write(&path, doc.to_string()).unwrap();
    path
}
