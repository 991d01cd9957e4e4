//! Configuration validation
//!
//! Rules:
//! - identifier value non-empty
//! - sensor_id unique across sensor_configs
//! - camera_params width/height > 0
//! - distortion_params length is 0, 4, 5 or 8

use std::collections::HashSet;

use contracts::{CameraConfig, CameraError};

/// Accepted distortion model lengths: none, (k1 k2 p1 p2), plus k3,
/// plus (k4 k5 k6).
const DISTORTION_LENGTHS: [usize; 4] = [0, 4, 5, 8];

/// Validate a camera configuration
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &CameraConfig) -> Result<(), CameraError> {
    validate_identifier(config)?;
    validate_sensor_ids(config)?;
    validate_camera_params(config)?;
    Ok(())
}

/// The identifier string addresses a device; an empty one addresses nothing
fn validate_identifier(config: &CameraConfig) -> Result<(), CameraError> {
    if config.identifier.as_str().is_empty() {
        return Err(CameraError::config_validation(
            "identifier",
            "identifier value cannot be empty",
        ));
    }
    Ok(())
}

/// sensor_id uniqueness across the override list
fn validate_sensor_ids(config: &CameraConfig) -> Result<(), CameraError> {
    let mut seen = HashSet::new();
    for sensor_config in &config.sensor_configs {
        if !seen.insert(sensor_config.sensor_id) {
            return Err(CameraError::config_validation(
                format!("sensor_configs[sensor_id={}]", sensor_config.sensor_id),
                "duplicate sensor_id",
            ));
        }
    }
    Ok(())
}

/// Calibration override sanity
fn validate_camera_params(config: &CameraConfig) -> Result<(), CameraError> {
    for sensor_config in &config.sensor_configs {
        let Some(params) = &sensor_config.camera_params else {
            continue;
        };
        let field = format!("sensor_configs[{}].camera_params", sensor_config.sensor_id);

        if params.width == 0 || params.height == 0 {
            return Err(CameraError::config_validation(
                field,
                format!(
                    "image dimensions must be > 0, got {}x{}",
                    params.width, params.height
                ),
            ));
        }

        if !DISTORTION_LENGTHS.contains(&params.distortion_params.len()) {
            return Err(CameraError::config_validation(
                field,
                format!(
                    "distortion_params length must be one of {:?}, got {}",
                    DISTORTION_LENGTHS,
                    params.distortion_params.len()
                ),
            ));
        }
    }
    Ok(())
}
