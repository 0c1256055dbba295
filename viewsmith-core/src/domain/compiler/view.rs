// viewsmith-core/src/domain/compiler/view.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::compiler::quoter::IdentifierQuoter;
use crate::domain::deployment::DeploymentConfig;
use crate::domain::error::DomainError;

/// A filtered view mirroring one source table into the target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDefinition {
    pub catalog: String,
    pub target_schema: String,
    pub target_view_name: String,
    pub source_schema: String,
    pub source_table_name: String,
    pub filter_predicate: Option<String>,
}

impl ViewDefinition {
    /// `CREATE OR REPLACE` keeps redeployments idempotent.
    pub fn ddl(&self) -> String {
        let target =
            IdentifierQuoter::qualified(&self.catalog, &self.target_schema, &self.target_view_name);
        let source =
            IdentifierQuoter::qualified(&self.catalog, &self.source_schema, &self.source_table_name);

        match &self.filter_predicate {
            Some(predicate) => format!(
                "CREATE OR REPLACE VIEW {} AS SELECT * FROM {} WHERE {}",
                target, source, predicate
            ),
            None => format!(
                "CREATE OR REPLACE VIEW {} AS SELECT * FROM {}",
                target, source
            ),
        }
    }

    /// Human-readable `catalog.schema.view`, for logs.
    pub fn display_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.catalog, self.target_schema, self.target_view_name
        )
    }
}

pub struct ViewBuilder;

impl ViewBuilder {
    /// One definition per base table, in `base_tables` order.
    ///
    /// Duplicates are compared case-insensitively because the engine folds identifiers
    /// to lower case: `Orders` and `orders` would replace the same view.
    pub fn build(config: &DeploymentConfig) -> Result<Vec<ViewDefinition>, DomainError> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (idx, table) in config.base_tables.iter().enumerate() {
            if let Some(first) = seen.insert(table.to_lowercase(), idx + 1) {
                return Err(DomainError::DuplicateTable {
                    table: table.clone(),
                    first,
                    second: idx + 1,
                });
            }
        }

        let catalog = config.connection.data_catalog().to_string();
        let predicate = config.filter_predicate().map(str::to_string);

        if config.target_schema_name.eq_ignore_ascii_case(&config.source_schema_name) {
            tracing::warn!(
                schema = %config.target_schema_name,
                "Target and source schema are the same: views will shadow their own base tables"
            );
        }

        Ok(config
            .base_tables
            .iter()
            .map(|table| ViewDefinition {
                catalog: catalog.clone(),
                target_schema: config.target_schema_name.clone(),
                target_view_name: table.clone(),
                source_schema: config.source_schema_name.clone(),
                source_table_name: table.clone(),
                filter_predicate: predicate.clone(),
            })
            .collect())
    }
}
