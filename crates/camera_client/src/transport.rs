//! Camera transport abstraction
//!
//! Defines the narrow interface to the remote camera service, supporting real
//! implementation and mock testing.

use std::future::Future;
use std::time::Duration;

use contracts::{
    CameraConfig, CameraSetting, RawCaptureResult, Result, SensorDescriptor, SensorId,
    SettingProperties,
};

/// Remote camera service trait
///
/// Abstracts the request/response operations of the camera service.
/// Implementations return errors already categorized as `CameraError`
/// (unavailable / handle-not-found / deadline-exceeded / other), never raw
/// transport failures.
pub trait CameraTransport: Send + Sync {
    /// Create a server-side camera handle for the given configuration
    ///
    /// # Arguments
    /// * `config` - Camera identity and per-sensor overrides
    /// * `timeout` - Remaining budget of the enclosing operation, if bounded
    ///
    /// # Returns
    /// The opaque handle id. An empty string means the service accepted the
    /// call but created nothing; callers treat that as a creation failure.
    fn create_camera(
        &self,
        config: &CameraConfig,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Enumerate the camera's sensors and their factory data
    fn describe_camera(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Vec<SensorDescriptor>>> + Send;

    /// Capture from the requested sensors
    ///
    /// # Arguments
    /// * `handle` - Live camera handle
    /// * `sensor_ids` - Transmit mask; empty requests all sensors
    /// * `timeout` - Remaining budget of the enclosing operation, if bounded
    /// * `skip_undistortion` - Whether the service should skip undistortion
    fn capture(
        &self,
        handle: &str,
        sensor_ids: &[SensorId],
        timeout: Option<Duration>,
        skip_undistortion: bool,
    ) -> impl Future<Output = Result<RawCaptureResult>> + Send;

    /// Read the current value of a named setting
    fn read_setting(
        &self,
        handle: &str,
        name: &str,
    ) -> impl Future<Output = Result<CameraSetting>> + Send;

    /// Read the properties of a named setting
    fn read_setting_properties(
        &self,
        handle: &str,
        name: &str,
    ) -> impl Future<Output = Result<SettingProperties>> + Send;

    /// Update a setting. Affects every client of the same physical camera.
    fn update_setting(
        &self,
        handle: &str,
        setting: &CameraSetting,
    ) -> impl Future<Output = Result<()>> + Send;
}
