//! # Camera
//!
//! Resilient convenience layer over the remote camera service.
//!
//! Responsibilities:
//! - Sensor registry: id <-> display-name mapping built from describe
//! - Capture orchestration: name resolution, transmit masks, name-keyed
//!   results with the camera world pose attached
//! - One-shot handle recovery when the service reports the handle gone
//! - Calibration fallback: configuration override, then factory, then none
//! - Typed setting access with local read-modify-write validation
//!
//! Deadline arithmetic and transient-unavailable retry live one layer down,
//! in the `camera_client` crate.

pub mod camera;
pub mod metrics;
pub mod registry;

pub use camera::{Camera, CameraBuilder, CaptureOptions, MissingPosePolicy};
pub use camera_client::{CameraClient, CameraTransport, Deadline};
pub use contracts::{
    CameraConfig, CameraError, CaptureResult, Result, SensorId, SensorImage, SensorName,
};
pub use registry::SensorRegistry;
