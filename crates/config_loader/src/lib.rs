//! # Config Loader
//!
//! Camera configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON camera configuration files
//! - Validate configuration legality
//! - Resolve camera resource names to files (`FileConfigSource`)
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("cam0.toml")).unwrap();
//! println!("Camera: {}", config.identifier.as_str());
//! ```

mod parser;
mod source;
mod validator;

pub use contracts::CameraConfig;
pub use parser::ConfigFormat;
pub use source::FileConfigSource;

use contracts::CameraError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<CameraConfig, CameraError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CameraConfig, CameraError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize CameraConfig to TOML string
    pub fn to_toml(config: &CameraConfig) -> Result<String, CameraError> {
        toml::to_string_pretty(config)
            .map_err(|e| CameraError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize CameraConfig to JSON string
    pub fn to_json(config: &CameraConfig) -> Result<String, CameraError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| CameraError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, CameraError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            CameraError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            CameraError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, CameraError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CameraConfig, CameraError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
[identifier.gen_i_cam]
device_id = "dev0"

[[sensor_configs]]
sensor_id = 1

[sensor_configs.camera_params]
intrinsic_matrix = [500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0]
distortion_params = [0.1, -0.05, 0.0, 0.0, 0.01]
width = 640
height = 480

[sensor_configs.camera_t_sensor]
translation = [0.0, 0.1, 0.0]
rotation = [0.0, 0.0, 0.0, 1.0]
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.identifier.as_str(), "dev0");
        assert!(config.sensor_config(1).is_some());
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // duplicate sensor_id should fail validation
        let content = r#"
[identifier.gen_i_cam]
device_id = "dev0"

[[sensor_configs]]
sensor_id = 1

[[sensor_configs]]
sensor_id = 1
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }
}
