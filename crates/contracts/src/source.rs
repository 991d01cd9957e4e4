//! Collaborator traits - configuration and pose lookup seams
//!
//! Both are read-only from this core's point of view. They stay synchronous:
//! suspension happens only at the camera transport boundary.

use crate::{CameraConfig, Pose, Result};

/// Authoritative configuration source, consulted only during reinitialization.
///
/// The service restart that invalidates a handle may also change the sensor
/// layout, so the configuration is re-fetched rather than reused blindly.
pub trait ConfigSource: Send + Sync {
    /// Fetch the current configuration for a named camera resource.
    ///
    /// # Errors
    /// `ConfigurationMissing` when no configuration exists for the name.
    fn fetch_config(&self, resource_name: &str) -> Result<CameraConfig>;
}

/// Supplies the camera world pose attached to capture results.
///
/// A provider always yields a pose; "no pose available" is expressed by not
/// attaching a provider at all, and the orchestration layer decides whether
/// that falls back to identity or fails.
pub trait PoseProvider: Send + Sync {
    /// Current world pose of the camera body.
    fn world_t_camera(&self) -> Pose;
}
