// viewsmith-core/src/infrastructure/adapters/athena.rs

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_athena::Client;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use tracing::{debug, info};

use crate::domain::deployment::ConnectionConfig;
use crate::error::ViewsmithError;
use crate::infrastructure::adapters::polling::{
    PollPolicy, QueryState, StatusSnapshot, wait_for_completion,
};
use crate::infrastructure::error::EngineError;
use crate::ports::connector::{Connector, ExecutionReceipt};

const LOG_PREVIEW_CHARS: usize = 300;

pub struct AthenaConnector {
    client: Client,
    output_location: String,
    workgroup: String,
    catalog: String,
    poll: PollPolicy,
}

impl AthenaConnector {
    pub fn new(sdk_config: &SdkConfig, connection: &ConnectionConfig, poll: PollPolicy) -> Self {
        let mut builder = aws_sdk_athena::config::Builder::from(sdk_config);
        if let Some(endpoint) = connection.endpoint_url() {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            output_location: connection.s3_output_location.trim().to_string(),
            workgroup: connection.workgroup().to_string(),
            catalog: connection.data_catalog().to_string(),
            poll,
        }
    }

    async fn submit(&self, statement: &str, database: Option<&str>) -> Result<String, EngineError> {
        let mut context = QueryExecutionContext::builder().catalog(&self.catalog);
        if let Some(db) = database {
            context = context.database(db);
        }

        let output = self
            .client
            .start_query_execution()
            .query_string(statement)
            .query_execution_context(context.build())
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(&self.output_location)
                    .build(),
            )
            .work_group(&self.workgroup)
            .send()
            .await
            .map_err(|e| EngineError::Sdk(DisplayErrorContext(&e).to_string()))?;

        output
            .query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| EngineError::Sdk("StartQueryExecution returned no query id".into()))
    }

    async fn status(&self, query_execution_id: &str) -> Result<StatusSnapshot, EngineError> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(query_execution_id)
            .send()
            .await
            .map_err(|e| EngineError::Sdk(DisplayErrorContext(&e).to_string()))?;

        let status = output.query_execution().and_then(|q| q.status());
        let state = status
            .and_then(|s| s.state())
            .map(map_state)
            .unwrap_or(QueryState::Queued);
        let reason = status.and_then(|s| {
            s.state_change_reason()
                .map(str::to_string)
                .or_else(|| {
                    s.athena_error()
                        .and_then(|e| e.error_message())
                        .map(str::to_string)
                })
        });

        Ok(StatusSnapshot { state, reason })
    }
}

fn map_state(state: &QueryExecutionState) -> QueryState {
    match state {
        QueryExecutionState::Succeeded => QueryState::Succeeded,
        QueryExecutionState::Failed => QueryState::Failed,
        QueryExecutionState::Cancelled => QueryState::Cancelled,
        QueryExecutionState::Running => QueryState::Running,
        QueryExecutionState::Queued => QueryState::Queued,
        // States added by future API versions are treated as still in progress.
        _ => QueryState::Running,
    }
}

/// First `max` characters of a statement, for logs.
pub fn preview(statement: &str, max: usize) -> String {
    match statement.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &statement[..cut]),
        None => statement.to_string(),
    }
}

#[async_trait]
impl Connector for AthenaConnector {
    async fn execute(
        &self,
        statement: &str,
        database: Option<&str>,
    ) -> Result<ExecutionReceipt, ViewsmithError> {
        info!(
            workgroup = %self.workgroup,
            "Executing Athena query: {}",
            preview(statement, LOG_PREVIEW_CHARS)
        );

        let query_execution_id = self.submit(statement, database).await?;
        debug!(query_execution_id = %query_execution_id, "Query started");

        let this = self;
        let id = query_execution_id.as_str();
        wait_for_completion(id, &self.poll, move || this.status(id)).await?;

        info!(query_execution_id = %query_execution_id, "Query SUCCEEDED");
        Ok(ExecutionReceipt { query_execution_id })
    }

    fn engine_name(&self) -> &str {
        "athena"
    }
}
