// viewsmith-core/src/ports/catalog.rs

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::ViewsmithError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// Lost a race: someone created it between our existence check and the create call.
    AlreadyExists,
}

/// Schema (database) management in the engine's metadata catalog.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    async fn schema_exists(&self, name: &str) -> Result<bool, ViewsmithError>;

    async fn create_schema(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreateOutcome, ViewsmithError>;

    /// Resource identifier used for tagging. `None` when the catalog can't tell yet.
    async fn schema_arn(&self, name: &str) -> Result<Option<String>, ViewsmithError>;

    async fn tag_schema(
        &self,
        arn: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ViewsmithError>;
}
