//! Sensor data: descriptors from describe, images from capture
//!
//! `RawCaptureResult` is wire-shaped (id-keyed); `CaptureResult` is what
//! callers receive (name-keyed, with the camera world pose attached).

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{CameraParams, Pose, SensorName};

/// Remote-assigned numeric sensor id.
pub type SensorId = u32;

/// Per-sensor factory data reported by the describe call.
///
/// Immutable once fetched; refreshed only by recreating the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    /// Remote-assigned numeric id
    pub sensor_id: SensorId,

    /// Human-readable display name
    pub display_name: SensorName,

    /// Factory calibration, if the camera reports one
    #[serde(default)]
    pub factory_camera_params: Option<CameraParams>,

    /// Factory extrinsic pose (sensor relative to camera body)
    #[serde(default)]
    pub camera_t_sensor: Option<Pose>,
}

/// One sensor's image from a capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorImage {
    /// Which sensor produced this image
    pub sensor_id: SensorId,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixel format
    pub format: PixelFormat,

    /// Raw pixel data (zero-copy)
    pub data: Bytes,
}

/// Pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    Mono8,
    Rgb8,
    Rgba8,
    Depth32F,
}

/// Capture response as returned by the transport: entries keyed by numeric id.
#[derive(Debug, Clone, Default)]
pub struct RawCaptureResult {
    /// Per-sensor images, in the order the service reported them
    pub sensor_images: Vec<SensorImage>,
}

/// The outcome of one capture, re-keyed by sensor display name.
///
/// Built fresh on every capture; never partial.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Sensor display name -> image
    pub sensor_images: HashMap<SensorName, SensorImage>,

    /// Camera world pose at capture time
    pub world_t_camera: Pose,
}

impl CaptureResult {
    /// Names of all sensors present in this result.
    pub fn sensor_names(&self) -> Vec<SensorName> {
        self.sensor_images.keys().cloned().collect()
    }
}
