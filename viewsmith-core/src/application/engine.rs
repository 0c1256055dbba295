// viewsmith-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::error::ViewsmithError;
use crate::infrastructure::error::{EngineError, InfrastructureError};
use crate::ports::connector::{Connector, ExecutionReceipt};

/// Runs one statement through the connector, logging its duration either way.
#[instrument(skip(connector, statement), fields(engine = connector.engine_name(), statement.len = statement.len()))]
pub async fn execute_statement(
    connector: &dyn Connector,
    statement: &str,
    database: Option<&str>,
) -> Result<ExecutionReceipt, ViewsmithError> {
    let start = Instant::now();
    let result = connector.execute(statement, database).await;
    let duration = start.elapsed();

    match &result {
        Ok(receipt) => debug!(
            query_execution_id = %receipt.query_execution_id,
            "✅ Statement finished in {:.2?}",
            duration
        ),
        Err(e) => error!("❌ Statement failed after {:.2?}: {}", duration, e),
    }
    result
}

/// What a failed statement leaves behind for the per-table report: the engine's own
/// message when it gave one, and the query id when the query got that far.
pub fn failure_detail(err: &ViewsmithError) -> (String, Option<String>) {
    match err {
        ViewsmithError::Infrastructure(InfrastructureError::Engine(engine)) => match engine {
            EngineError::Execution {
                query_execution_id,
                message,
                ..
            } => (message.clone(), Some(query_execution_id.clone())),
            EngineError::Timeout {
                query_execution_id, ..
            } => (engine.to_string(), Some(query_execution_id.clone())),
            EngineError::Sdk(_) => (engine.to_string(), None),
        },
        other => (other.to_string(), None),
    }
}
