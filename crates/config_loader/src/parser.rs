//! Configuration parsing
//!
//! TOML is the primary format, JSON the optional one.

use contracts::{CameraConfig, CameraError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a TOML camera configuration
pub fn parse_toml(content: &str) -> Result<CameraConfig, CameraError> {
    toml::from_str(content).map_err(|e| CameraError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a JSON camera configuration
pub fn parse_json(content: &str) -> Result<CameraConfig, CameraError> {
    serde_json::from_str(content).map_err(|e| CameraError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse according to the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<CameraConfig, CameraError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CameraIdentifier;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[identifier.gen_i_cam]
device_id = "dev0"

[[sensor_configs]]
sensor_id = 1

[sensor_configs.camera_params]
intrinsic_matrix = [500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0]
distortion_params = [0.1, -0.05, 0.0, 0.0, 0.01]
width = 640
height = 480
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.identifier.as_str(), "dev0");
        assert_eq!(config.sensor_configs.len(), 1);
        assert_eq!(
            config.sensor_configs[0]
                .camera_params
                .as_ref()
                .unwrap()
                .dimensions(),
            (640, 480)
        );
    }

    #[test]
    fn test_parse_toml_without_overrides() {
        let content = r#"
[identifier.simulation]
scene_camera = "workcell_camera"
"#;
        let config = parse_toml(content).unwrap();
        assert!(matches!(
            config.identifier,
            CameraIdentifier::Simulation { .. }
        ));
        assert!(config.sensor_configs.is_empty());
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "identifier": { "simulation": { "scene_camera": "workcell_camera" } },
            "sensor_configs": [{
                "sensor_id": 1,
                "camera_params": {
                    "intrinsic_matrix": [500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0],
                    "distortion_params": [0.1, -0.05, 0.0, 0.0, 0.01],
                    "width": 640,
                    "height": 480
                }
            }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, CameraError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
