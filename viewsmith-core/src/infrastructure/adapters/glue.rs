// viewsmith-core/src/infrastructure/adapters/glue.rs

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_glue::Client;
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::types::DatabaseInput;
use std::collections::{BTreeMap, HashMap};

use crate::domain::deployment::ConnectionConfig;
use crate::error::ViewsmithError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::catalog::{CreateOutcome, SchemaCatalog};

/// Athena schemas live in the Glue Data Catalog as databases.
pub struct GlueCatalog {
    client: Client,
    region: String,
}

impl GlueCatalog {
    pub fn new(sdk_config: &SdkConfig, connection: &ConnectionConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            region: connection.aws_region.clone(),
        }
    }
}

fn catalog_error(context: &str, err: impl std::error::Error) -> ViewsmithError {
    InfrastructureError::Catalog(format!("{}: {}", context, DisplayErrorContext(&err))).into()
}

pub fn database_arn(region: &str, catalog_id: &str, name: &str) -> String {
    format!("arn:aws:glue:{}:{}:database/{}", region, catalog_id, name)
}

#[async_trait]
impl SchemaCatalog for GlueCatalog {
    async fn schema_exists(&self, name: &str) -> Result<bool, ViewsmithError> {
        match self.client.get_database().name(name).send().await {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_entity_not_found_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(catalog_error(&format!("GetDatabase '{}'", name), err)),
        }
    }

    async fn create_schema(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreateOutcome, ViewsmithError> {
        let input = DatabaseInput::builder()
            .name(name)
            .description(description)
            .build()
            .map_err(|e| catalog_error("DatabaseInput", e))?;

        match self.client.create_database().database_input(input).send().await {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_already_exists_exception()) =>
            {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => Err(catalog_error(&format!("CreateDatabase '{}'", name), err)),
        }
    }

    async fn schema_arn(&self, name: &str) -> Result<Option<String>, ViewsmithError> {
        let output = self
            .client
            .get_database()
            .name(name)
            .send()
            .await
            .map_err(|e| catalog_error(&format!("GetDatabase '{}'", name), e))?;

        Ok(output
            .database()
            .and_then(|db| db.catalog_id())
            .map(|catalog_id| database_arn(&self.region, catalog_id, name)))
    }

    async fn tag_schema(
        &self,
        arn: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ViewsmithError> {
        let tags: HashMap<String, String> = tags.clone().into_iter().collect();
        self.client
            .tag_resource()
            .resource_arn(arn)
            .set_tags_to_add(Some(tags))
            .send()
            .await
            .map_err(|e| catalog_error(&format!("TagResource '{}'", arn), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_arn_format() {
        assert_eq!(
            database_arn("us-east-1", "123456789012", "acme_views"),
            "arn:aws:glue:us-east-1:123456789012:database/acme_views"
        );
    }
}
