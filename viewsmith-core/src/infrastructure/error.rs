// viewsmith-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    #[error("Athena query {query_execution_id} {state}: {message}")]
    #[diagnostic(
        code(viewsmith::infra::engine::execution),
        help("The message above is reported verbatim by the engine.")
    )]
    Execution {
        query_execution_id: String,
        state: String,
        message: String,
    },

    #[error("Athena query {query_execution_id} did not finish within {elapsed:.0?}; its outcome is unknown")]
    #[diagnostic(
        code(viewsmith::infra::engine::timeout),
        help("Check the query in the Athena console before re-running the deployment.")
    )]
    Timeout {
        query_execution_id: String,
        elapsed: Duration,
    },

    #[error("Athena request failed: {0}")]
    #[diagnostic(
        code(viewsmith::infra::engine::sdk),
        help("Check credentials, region, workgroup and network access.")
    )]
    Sdk(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- ENGINE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    // --- SCHEMA CATALOG (Glue) ---
    #[error("Schema catalog error: {0}")]
    #[diagnostic(code(viewsmith::infra::catalog))]
    Catalog(String),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(viewsmith::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Could not read {path:?}: {source}")]
    #[diagnostic(code(viewsmith::infra::config_read))]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    // --- CONFIG / JSON ---
    #[error("Malformed JSON in {path:?}: {source}")]
    #[diagnostic(
        code(viewsmith::infra::json),
        help("Check your JSON syntax (commas, quotes, brackets).")
    )]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // --- SETTINGS / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(viewsmith::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    // --- BATCH FOLDER ---
    #[error("Config folder {0:?} does not exist or is not a directory")]
    #[diagnostic(
        code(viewsmith::infra::config_folder),
        help("Set folder_path in viewsmith.yaml, VIEWSMITH_FOLDER_PATH, or pass --folder.")
    )]
    ConfigFolderNotFound(PathBuf),

    #[error("Start file '{start_at}' is not one of the {available} config file(s) in {folder:?}")]
    #[diagnostic(
        code(viewsmith::infra::unknown_start_at),
        help("Pass a bare file name such as 'customer_b.json', as listed by the batch summary.")
    )]
    UnknownStartAt {
        start_at: String,
        folder: PathBuf,
        available: usize,
    },
}

impl From<EngineError> for crate::error::ViewsmithError {
    fn from(err: EngineError) -> Self {
        crate::error::ViewsmithError::Infrastructure(InfrastructureError::Engine(err))
    }
}
