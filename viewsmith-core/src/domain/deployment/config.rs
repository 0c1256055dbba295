// viewsmith-core/src/domain/deployment/config.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;

pub const DEFAULT_WORKGROUP: &str = "primary";
pub const DEFAULT_DATA_CATALOG: &str = "awsdatacatalog";
const MAX_IDENTIFIER_LEN: usize = 255;

fn re_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+$").unwrap_or_else(|_| {
            // Hardcoded pattern, cannot fail to compile.
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

/// True when `name` is usable as a schema or table name in the engine.
pub fn is_valid_identifier(name: &str) -> bool {
    name.len() <= MAX_IDENTIFIER_LEN && re_identifier().is_match(name)
}

/// Query engine backends a deployment can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineClass {
    Athena,
}

impl EngineClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Athena => "athena",
        }
    }
}

impl fmt::Display for EngineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EngineClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "athena" => Ok(Self::Athena),
            _ => Err(DomainError::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Engine connection parameters carried by every deployment document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_credential_pair", skip_on_field_errors = false))]
pub struct ConnectionConfig {
    /// Raw backend selector. Resolved to an [`EngineClass`] only when connecting.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub class: String,

    #[serde(default)]
    pub server_endpoint_url: Option<String>,

    #[validate(custom(function = "validate_s3_uri"))]
    pub s3_output_location: String,

    /// Empty or absent means "use ambient AWS credentials".
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub aws_region: String,

    #[serde(default)]
    pub workgroup: Option<String>,

    #[serde(default)]
    pub data_catalog: Option<String>,
}

impl ConnectionConfig {
    pub fn engine_class(&self) -> Result<EngineClass, DomainError> {
        self.class.parse()
    }

    /// Static credentials, when both halves are present.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (non_blank(&self.access_key), non_blank(&self.secret_key)) {
            (Some(access), Some(secret)) => Some((access, secret)),
            _ => None,
        }
    }

    pub fn workgroup(&self) -> &str {
        non_blank(&self.workgroup).unwrap_or(DEFAULT_WORKGROUP)
    }

    pub fn data_catalog(&self) -> &str {
        non_blank(&self.data_catalog).unwrap_or(DEFAULT_DATA_CATALOG)
    }

    /// Endpoint override as a full URL. Bare hosts (the Tableau/JDBC style) get `https://`.
    pub fn endpoint_url(&self) -> Option<String> {
        non_blank(&self.server_endpoint_url).map(|raw| {
            if raw.contains("://") {
                raw.to_string()
            } else {
                format!("https://{}", raw)
            }
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// One JSON deployment document, after structural and semantic validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub customer_group_identifier: Option<String>,

    #[validate(custom(function = "validate_identifier"))]
    pub target_schema_name: String,

    #[validate(custom(function = "validate_identifier"))]
    pub source_schema_name: String,

    /// Raw engine-native predicate. Empty means no filter.
    #[serde(default)]
    pub where_condition: String,

    #[validate(
        length(min = 1, message = "must list at least one table"),
        custom(function = "validate_table_names")
    )]
    pub base_tables: Vec<String>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub schema_description: Option<String>,

    #[validate(nested)]
    pub connection: ConnectionConfig,
}

impl DeploymentConfig {
    /// Label used in logs and reports.
    pub fn customer_group(&self) -> &str {
        non_blank(&self.customer_group_identifier).unwrap_or("N/A")
    }

    pub fn filter_predicate(&self) -> Option<&str> {
        let trimmed = self.where_condition.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn schema_description(&self) -> String {
        match non_blank(&self.schema_description) {
            Some(d) => d.to_string(),
            None => format!("Schema for {}", self.customer_group()),
        }
    }
}

// --- VALIDATION RULES ---

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(rule_error(
            "identifier",
            format!(
                "'{}' is not a valid identifier (1-{} characters of A-Z, a-z, 0-9, _)",
                value, MAX_IDENTIFIER_LEN
            ),
        ))
    }
}

fn validate_table_names(tables: &[String]) -> Result<(), ValidationError> {
    let invalid: Vec<String> = tables
        .iter()
        .enumerate()
        .filter(|(_, t)| !is_valid_identifier(t))
        .map(|(i, t)| format!("#{} '{}'", i + 1, t))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(rule_error(
            "identifier",
            format!("invalid table name(s): {}", invalid.join(", ")),
        ))
    }
}

fn validate_s3_uri(value: &str) -> Result<(), ValidationError> {
    let rest = value.trim().strip_prefix("s3://").unwrap_or_default();
    if rest.is_empty() || rest.starts_with('/') {
        return Err(rule_error(
            "s3_uri",
            format!("'{}' is not an s3://bucket/prefix location", value),
        ));
    }
    Ok(())
}

fn validate_credential_pair(conn: &ConnectionConfig) -> Result<(), ValidationError> {
    let has_access = non_blank(&conn.access_key).is_some();
    let has_secret = non_blank(&conn.secret_key).is_some();
    if has_access != has_secret {
        return Err(rule_error(
            "credentials",
            "access_key and secret_key must be set together (leave both empty for ambient credentials)"
                .to_string(),
        ));
    }
    Ok(())
}
