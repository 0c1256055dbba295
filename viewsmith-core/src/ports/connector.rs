// viewsmith-core/src/ports/connector.rs

// What the deployment core needs from a query engine, without knowing which one.

use async_trait::async_trait;

use crate::domain::deployment::{ConnectionConfig, EngineClass};
use crate::error::ViewsmithError;
use crate::ports::catalog::SchemaCatalog;

/// Receipt of a statement that reached a successful terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReceipt {
    pub query_execution_id: String,
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs one statement to completion. `database` is the default schema for unqualified names.
    ///
    /// Each call is independent: no transaction spans two statements.
    async fn execute(
        &self,
        statement: &str,
        database: Option<&str>,
    ) -> Result<ExecutionReceipt, ViewsmithError>;

    fn engine_name(&self) -> &str;
}

/// Everything a deployment talks to for one connection.
pub struct EngineSession {
    pub connector: Box<dyn Connector>,
    pub catalog: Box<dyn SchemaCatalog>,
}

/// Opens sessions for a resolved engine class. Class resolution happens before this is called,
/// so an unsupported class never reaches the network.
#[async_trait]
pub trait ConnectorFactory: Send + Sync {
    async fn connect(
        &self,
        class: EngineClass,
        connection: &ConnectionConfig,
    ) -> Result<EngineSession, ViewsmithError>;
}
