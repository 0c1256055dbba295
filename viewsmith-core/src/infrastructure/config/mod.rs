pub mod deployment;
pub mod discovery;
pub mod settings;

pub use crate::domain::deployment::{DeploymentConfig, RunSettings};
pub use deployment::{load_deployment_config, parse_deployment_config};
pub use discovery::discover_config_files;
pub use settings::load_settings;
