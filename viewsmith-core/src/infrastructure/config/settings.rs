// viewsmith-core/src/infrastructure/config/settings.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::deployment::RunSettings;
use crate::infrastructure::error::InfrastructureError;

const SETTINGS_FILES: [&str; 2] = ["viewsmith.yaml", "viewsmith.yml"];

/// Loads `viewsmith.yaml` from `settings_dir`, then applies `VIEWSMITH_*` environment overrides.
///
/// A missing file is not an error: every setting has a default. A present but broken file is.
#[instrument]
pub fn load_settings(settings_dir: &Path) -> Result<RunSettings, InfrastructureError> {
    let mut settings = match find_settings_file(settings_dir) {
        Some(path) => {
            info!(path = ?path, "Loading run settings");
            let content = fs::read_to_string(&path)?;
            let mut loaded: RunSettings = serde_yaml::from_str(&content)?;
            resolve_relative_paths(&mut loaded, settings_dir);
            loaded
        }
        None => {
            info!(dir = ?settings_dir, "No viewsmith.yaml found, using default settings");
            RunSettings::default()
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    SETTINGS_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

// Paths in the file are relative to the file, not to wherever the CLI was started.
fn resolve_relative_paths(settings: &mut RunSettings, base: &Path) {
    for path in [&mut settings.folder_path, &mut settings.report_path]
        .into_iter()
        .flatten()
    {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
}

/// Layering: file < environment < CLI flags (the CLI applies its own on top).
fn apply_env_overrides<F>(settings: &mut RunSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("VIEWSMITH_FOLDER_PATH") {
        info!(old = ?settings.folder_path, new = %val, "Overriding folder path via ENV");
        settings.folder_path = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("VIEWSMITH_REPORT_PATH") {
        info!(old = ?settings.report_path, new = %val, "Overriding report path via ENV");
        settings.report_path = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("VIEWSMITH_TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(secs) => {
                info!(old = settings.timeout_secs, new = secs, "Overriding timeout via ENV");
                settings.timeout_secs = secs;
            }
            Err(_) => warn!(value = %val, "Ignoring non-numeric VIEWSMITH_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(find_settings_file(dir.path()), None);

        let settings = RunSettings::default();
        assert_eq!(settings.poll_interval_ms, 5_000);
        assert_eq!(settings.timeout_secs, 300);
        assert!(settings.provision_schema);
        Ok(())
    }

    #[test]
    fn test_file_values_and_relative_paths() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("viewsmith.yaml"),
            "folder_path: US_PROD_Schema/temp\npoll_interval_ms: 250\nprovision_schema: false\n",
        )?;

        let settings = load_settings(dir.path())?;
        assert_eq!(
            settings.folder_path,
            Some(dir.path().join("US_PROD_Schema/temp"))
        );
        assert_eq!(settings.poll_interval_ms, 250);
        assert!(!settings.provision_schema);
        assert_eq!(settings.schema_settle_secs, 10);
        Ok(())
    }

    #[test]
    fn test_broken_yaml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("viewsmith.yml"), "timeout_secs: [not, a, number]\n")?;
        assert!(matches!(
            load_settings(dir.path()),
            Err(InfrastructureError::YamlError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("VIEWSMITH_FOLDER_PATH", "/srv/configs"),
            ("VIEWSMITH_TIMEOUT_SECS", "42"),
        ]);
        let mut settings = RunSettings::default();
        apply_env_overrides(&mut settings, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.folder_path, Some(PathBuf::from("/srv/configs")));
        assert_eq!(settings.timeout_secs, 42);
        assert_eq!(settings.report_path, None);
    }

    #[test]
    fn test_bad_env_timeout_ignored() {
        let mut settings = RunSettings::default();
        apply_env_overrides(&mut settings, |k| {
            (k == "VIEWSMITH_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(settings.timeout_secs, 300);
    }
}
