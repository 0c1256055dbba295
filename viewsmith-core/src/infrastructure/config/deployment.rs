// viewsmith-core/src/infrastructure/config/deployment.rs

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::domain::deployment::{ConnectionConfig, DeploymentConfig};
use crate::domain::error::{DomainError, FieldViolation};
use crate::error::ViewsmithError;
use crate::infrastructure::error::InfrastructureError;

/// Reads, parses and validates one deployment document.
///
/// Malformed JSON fails immediately. Otherwise every violation (missing fields, wrong
/// types, invalid identifiers, ...) is collected into a single `ConfigValidation` error.
#[instrument]
pub fn load_deployment_config(path: &Path) -> Result<DeploymentConfig, ViewsmithError> {
    let content = fs::read_to_string(path).map_err(|source| InfrastructureError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_deployment_config(path, &content)?;
    info!(
        customer_group = config.customer_group(),
        target = %config.target_schema_name,
        tables = config.base_tables.len(),
        "Deployment config loaded"
    );
    Ok(config)
}

/// Same as [`load_deployment_config`] on an in-memory document. `path` is only used for messages.
pub fn parse_deployment_config(
    path: &Path,
    content: &str,
) -> Result<DeploymentConfig, ViewsmithError> {
    let document: Value =
        serde_json::from_str(content).map_err(|source| InfrastructureError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(root) = document.as_object() else {
        return Err(DomainError::ConfigValidation {
            path: path.to_path_buf(),
            violations: vec![FieldViolation::new(
                "<document>",
                format!("expected a JSON object, found {}", json_kind(&document)),
            )],
        }
        .into());
    };

    let (config, mut violations) = read_document(root);

    // Semantic rules only report on fields that were structurally sound.
    let broken: BTreeSet<String> = violations.iter().map(|v| v.field.clone()).collect();
    if let Err(errors) = config.validate() {
        let mut semantic = Vec::new();
        flatten_errors("", &errors, &mut semantic);
        semantic.sort();
        violations.extend(
            semantic
                .into_iter()
                .filter(|v| !broken.iter().any(|b| is_same_or_parent(b, &v.field))),
        );
    }

    if violations.is_empty() {
        Ok(config)
    } else {
        Err(DomainError::ConfigValidation {
            path: path.to_path_buf(),
            violations,
        }
        .into())
    }
}

fn is_same_or_parent(broken: &str, field: &str) -> bool {
    field == broken || field.starts_with(&format!("{}.", broken))
}

// --- STRUCTURAL PASS ---

/// Pulls typed fields out of a JSON object, recording a violation per bad field instead of
/// stopping at the first one like a derived `Deserialize` would.
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    prefix: &'static str,
    violations: &'a mut Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name).filter(|v| !v.is_null())
    }

    fn required<T: DeserializeOwned + Default>(&mut self, name: &str) -> T {
        match self.lookup(name) {
            Some(value) => self.decode(name, value),
            None => {
                let path = self.path(name);
                self.violations
                    .push(FieldViolation::new(path, "missing required field"));
                T::default()
            }
        }
    }

    fn optional<T: DeserializeOwned + Default>(&mut self, name: &str) -> T {
        match self.lookup(name) {
            Some(value) => self.decode(name, value),
            None => T::default(),
        }
    }

    fn decode<T: DeserializeOwned + Default>(&mut self, name: &str, value: &Value) -> T {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(v) => v,
            Err(e) => {
                let path = self.path(name);
                self.violations.push(FieldViolation::new(path, e.to_string()));
                T::default()
            }
        }
    }
}

fn read_document(root: &Map<String, Value>) -> (DeploymentConfig, Vec<FieldViolation>) {
    let mut violations = Vec::new();

    let connection_value = root.get("connection").filter(|v| !v.is_null());
    let connection_object = match connection_value {
        None => {
            violations.push(FieldViolation::new("connection", "missing required field"));
            None
        }
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            violations.push(FieldViolation::new(
                "connection",
                format!("expected an object, found {}", json_kind(other)),
            ));
            None
        }
    };

    let mut doc = FieldReader {
        object: root,
        prefix: "",
        violations: &mut violations,
    };
    let customer_group_identifier: Option<String> = doc.optional("customer_group_identifier");
    let target_schema_name: String = doc.required("target_schema_name");
    let source_schema_name: String = doc.required("source_schema_name");
    let where_condition: String = doc.optional("where_condition");
    let base_tables: Vec<String> = doc.required("base_tables");
    let tags: BTreeMap<String, String> = doc.optional("tags");
    let schema_description: Option<String> = doc.optional("schema_description");

    // Only read connection fields when the object itself exists, otherwise every
    // sub-field would repeat the same "missing" complaint.
    let connection = match connection_object {
        Some(map) => {
            let mut conn = FieldReader {
                object: map,
                prefix: "connection",
                violations: &mut violations,
            };
            ConnectionConfig {
                class: conn.required("class"),
                server_endpoint_url: conn.optional("server_endpoint_url"),
                s3_output_location: conn.required("s3_output_location"),
                access_key: conn.optional("access_key"),
                secret_key: conn.optional("secret_key"),
                aws_region: conn.required("aws_region"),
                workgroup: conn.optional("workgroup"),
                data_catalog: conn.optional("data_catalog"),
            }
        }
        None => ConnectionConfig::default(),
    };

    let config = DeploymentConfig {
        customer_group_identifier,
        target_schema_name,
        source_schema_name,
        where_condition,
        base_tables,
        tags,
        schema_description,
        connection,
    };
    (config, violations)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// --- SEMANTIC PASS (validator) ---

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let path = match (prefix.is_empty(), field == "__all__") {
            (true, true) => "<document>".to_string(),
            (false, true) => prefix.to_string(),
            (true, false) => field,
            (false, false) => format!("{}.{}", prefix, field),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", e.code));
                    out.push(FieldViolation::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten_errors(&format!("{}[{}]", path, idx), inner, out);
                }
            }
        }
    }
}
