// viewsmith-core/src/infrastructure/config/discovery.rs

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

/// Lists the `*.json` regular files directly inside `folder`, sorted by file name.
///
/// Subdirectories are not descended into and their contents are never deployed.
#[instrument]
pub fn discover_config_files(folder: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    if !folder.is_dir() {
        return Err(InfrastructureError::ConfigFolderNotFound(folder.to_path_buf()));
    }

    let walker = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            InfrastructureError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;

        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        } else {
            debug!(path = ?path, "Skipping non-config entry");
        }
    }

    Ok(files)
}
