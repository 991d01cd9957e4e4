//! File-backed configuration source
//!
//! Resolves a camera resource name to `<root>/<name>.toml` (or `.json`) and
//! loads it through the regular parse + validate path. Used as the
//! authoritative source during camera reinitialization.

use std::path::PathBuf;

use contracts::{CameraConfig, CameraError, ConfigSource, Result};

use crate::{ConfigFormat, ConfigLoader};

/// Configuration source reading one file per camera resource.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    root: PathBuf,
}

impl FileConfigSource {
    /// Source rooted at a configuration directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configuration directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ConfigSource for FileConfigSource {
    fn fetch_config(&self, resource_name: &str) -> Result<CameraConfig> {
        // TOML first, JSON as the fallback format
        for format in [ConfigFormat::Toml, ConfigFormat::Json] {
            let ext = match format {
                ConfigFormat::Toml => "toml",
                ConfigFormat::Json => "json",
            };
            let path = self.root.join(format!("{resource_name}.{ext}"));
            if path.is_file() {
                return ConfigLoader::load_from_path(&path);
            }
        }

        Err(CameraError::configuration_missing(
            resource_name,
            format!(
                "no configuration file under '{}'",
                self.root.display()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
[identifier.gen_i_cam]
device_id = "dev0"
"#;

    #[test]
    fn test_fetch_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cam0.toml"), MINIMAL_TOML).unwrap();

        let source = FileConfigSource::new(dir.path());
        let config = source.fetch_config("cam0").unwrap();
        assert_eq!(config.identifier.as_str(), "dev0");
    }

    #[test]
    fn test_toml_preferred_over_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cam0.toml"), MINIMAL_TOML).unwrap();
        std::fs::write(
            dir.path().join("cam0.json"),
            r#"{ "identifier": { "gen_i_cam": { "device_id": "json-dev" } } }"#,
        )
        .unwrap();

        let source = FileConfigSource::new(dir.path());
        let config = source.fetch_config("cam0").unwrap();
        assert_eq!(config.identifier.as_str(), "dev0");
    }

    #[test]
    fn test_missing_file_is_configuration_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileConfigSource::new(dir.path());

        let err = source.fetch_config("cam0").unwrap_err();
        assert!(matches!(err, CameraError::ConfigurationMissing { .. }));
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cam0.toml"),
            r#"
[identifier.gen_i_cam]
device_id = ""
"#,
        )
        .unwrap();

        let source = FileConfigSource::new(dir.path());
        let err = source.fetch_config("cam0").unwrap_err();
        assert!(matches!(err, CameraError::ConfigValidation { .. }));
    }
}
