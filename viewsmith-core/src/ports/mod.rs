pub mod catalog;
pub mod connector;

pub use catalog::{CreateOutcome, SchemaCatalog};
pub use connector::{Connector, ConnectorFactory, EngineSession, ExecutionReceipt};
