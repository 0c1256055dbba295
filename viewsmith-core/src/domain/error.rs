// viewsmith-core/src/domain/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// One problem found while validating a deployment document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn render_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("\n  - {}", v))
        .collect::<String>()
}

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid deployment config {path:?} ({} problem(s)):{}", .violations.len(), render_violations(.violations))]
    #[diagnostic(
        code(viewsmith::domain::config_validation),
        help("Fix every listed field, then re-run. Unknown fields are ignored.")
    )]
    ConfigValidation {
        path: PathBuf,
        violations: Vec<FieldViolation>,
    },

    #[error("Base table '{table}' is listed twice (positions {first} and {second})")]
    #[diagnostic(
        code(viewsmith::domain::duplicate_table),
        help("Each base table maps to exactly one view. Remove the duplicate entry from 'base_tables'.")
    )]
    DuplicateTable {
        table: String,
        first: usize,
        second: usize,
    },

    #[error("Unsupported engine class '{0}'")]
    #[diagnostic(
        code(viewsmith::domain::unsupported_engine),
        help("Set connection.class to \"athena\".")
    )]
    UnsupportedEngine(String),
}
