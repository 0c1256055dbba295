// viewsmith-core/src/domain/deployment/mod.rs

pub mod config;
pub mod result;
pub mod settings;

pub use config::{ConnectionConfig, DeploymentConfig, EngineClass, is_valid_identifier};
pub use result::{DeploymentResult, DeploymentStage, TableStatus};
pub use settings::RunSettings;
