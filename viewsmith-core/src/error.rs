// viewsmith-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewsmithError {
    // --- DOMAIN ERRORS (validation, duplicates, engine selection) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, Athena, Glue) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for ViewsmithError {
    fn from(err: std::io::Error) -> Self {
        ViewsmithError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl ViewsmithError {
    /// Returns the miette diagnostic behind this error, when there is one.
    pub fn diagnostic(&self) -> Option<&dyn miette::Diagnostic> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Infrastructure(e) => Some(e),
            Self::InternalError(_) => None,
        }
    }
}
