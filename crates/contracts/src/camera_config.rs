//! CameraConfig - caller-supplied camera identity and per-sensor overrides
//!
//! The configuration handed to the remote service when creating a handle.
//! Per-sensor calibration here takes precedence over factory values.

use serde::{Deserialize, Serialize};

use crate::{Pose, SensorId};

/// Complete camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera identity: which driver family and device to open
    pub identifier: CameraIdentifier,

    /// Per-sensor override configuration
    #[serde(default)]
    pub sensor_configs: Vec<SensorConfig>,
}

impl CameraConfig {
    /// Look up the override configuration for a sensor id.
    pub fn sensor_config(&self, sensor_id: SensorId) -> Option<&SensorConfig> {
        self.sensor_configs
            .iter()
            .find(|c| c.sensor_id == sensor_id)
    }
}

/// Camera identity across supported driver families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraIdentifier {
    /// GenICam-compliant device addressed by device id
    GenICam { device_id: String },

    /// Simulated camera addressed by scene camera name
    Simulation { scene_camera: String },

    /// Replay driver reading recorded captures from a directory
    Replay { recording_dir: String },
}

impl CameraIdentifier {
    /// Stable string form, used in logs and error context.
    pub fn as_str(&self) -> &str {
        match self {
            Self::GenICam { device_id } => device_id,
            Self::Simulation { scene_camera } => scene_camera,
            Self::Replay { recording_dir } => recording_dir,
        }
    }
}

/// Per-sensor override: user-supplied calibration that shadows factory values.
///
/// Absent fields fall back to the factory descriptor reported by describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Remote-assigned numeric sensor id this override applies to
    pub sensor_id: SensorId,

    /// Calibration override (intrinsics + distortion + dimensions)
    #[serde(default)]
    pub camera_params: Option<CameraParams>,

    /// Extrinsic pose override (sensor relative to camera body)
    #[serde(default)]
    pub camera_t_sensor: Option<Pose>,
}

/// Sensor calibration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// Row-major 3x3 intrinsic matrix
    pub intrinsic_matrix: [f64; 9],

    /// Distortion coefficients (k1, k2, p1, p2, k3, [k4, k5, k6])
    pub distortion_params: Vec<f64>,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,
}

impl CameraParams {
    /// Image dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
