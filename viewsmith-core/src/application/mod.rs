// viewsmith-core/src/application/mod.rs

pub mod batch;
pub mod deploy;
pub mod engine;
pub mod plan;
pub mod provision;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use viewsmith_core::application::{Deployer, BatchCoordinator};`

pub use batch::{BatchCoordinator, BatchOptions, BatchReport};
pub use deploy::{DeployOptions, Deployer};
pub use engine::execute_statement;
pub use plan::{DeploymentPlan, plan_deployment, write_plan};
pub use provision::{ProvisionOutcome, ensure_target_schema};
