//! CameraClient - handle lifecycle over a CameraTransport
//!
//! Owns the server-side handle id. The handle is created lazily on the first
//! operation that needs it, cleared by `reset`, and re-created by the layer
//! above when the service reports it gone.

use std::time::Duration;

use contracts::{
    CameraConfig, CameraError, CameraSetting, RawCaptureResult, Result, SensorDescriptor,
    SensorId, SettingProperties,
};
use tracing::{debug, info, instrument};

use crate::deadline::{remaining_timeout, Deadline};
use crate::retry::retry_on_unavailable;
use crate::transport::CameraTransport;

/// Camera handle lifecycle manager.
///
/// State machine: uninitialized -> (ensure succeeds) -> live -> (reset) ->
/// uninitialized. There is no partial state visible to callers: `ensure`
/// either leaves a live handle or fails.
///
/// Not designed for concurrent use; one instance per logical user.
pub struct CameraClient<T: CameraTransport> {
    transport: T,
    config: CameraConfig,
    handle: Option<String>,
}

impl<T: CameraTransport> CameraClient<T> {
    /// Create a new client. No network call; the handle stays uninitialized
    /// until the first operation needs it.
    pub fn new(transport: T, config: CameraConfig) -> Self {
        Self {
            transport,
            config,
            handle: None,
        }
    }

    /// Whether a server-side handle is currently live.
    pub fn created(&self) -> bool {
        self.handle.is_some()
    }

    /// The pending configuration the next handle will be created with.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// The live handle id, if any.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// Discard the current handle and adopt `config` for the next creation.
    ///
    /// Local state only; never fails, issues no network call.
    pub fn reset(&mut self, config: CameraConfig) {
        debug!(identifier = %config.identifier.as_str(), "camera client reset");
        self.config = config;
        self.handle = None;
    }

    /// Recreate the handle with a new configuration, bounded by
    /// `deadline` (which takes priority over `timeout`).
    #[instrument(
        name = "camera_client_create",
        skip(self, config),
        fields(identifier = %config.identifier.as_str())
    )]
    pub async fn create_camera(
        &mut self,
        config: CameraConfig,
        timeout: Option<Duration>,
        deadline: Option<Deadline>,
    ) -> Result<String> {
        let deadline = Deadline::resolve(timeout, deadline);
        self.reset(config);
        self.create(deadline.as_ref()).await?;
        self.live_handle().map(str::to_owned)
    }

    /// Ensure a handle is live: no-op when one exists, otherwise create one
    /// under the retry policy.
    pub async fn ensure_created(&mut self, deadline: Option<&Deadline>) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        self.create(deadline).await
    }

    /// Issue the create-handle call, retrying transient unavailability.
    ///
    /// An empty handle id in the response is a creation failure: the service
    /// accepted the call but opened nothing.
    async fn create(&mut self, deadline: Option<&Deadline>) -> Result<()> {
        let transport = &self.transport;
        let config = &self.config;

        let handle = retry_on_unavailable(deadline, "create_camera", || async move {
            let timeout = remaining_timeout(deadline, "create_camera")?;
            transport.create_camera(config, timeout).await
        })
        .await?;

        if handle.is_empty() {
            return Err(CameraError::handle_creation_failed(
                "service returned an empty camera handle",
            ));
        }

        info!(handle = %handle, "camera handle created");
        self.handle = Some(handle);
        Ok(())
    }

    /// Describe the camera and its sensors. Enumerates connected sensors.
    ///
    /// Creates the handle first if none is live.
    #[instrument(name = "camera_client_describe", skip(self))]
    pub async fn describe_camera(&mut self) -> Result<Vec<SensorDescriptor>> {
        self.ensure_created(None).await?;
        let handle = self.live_handle()?;
        self.transport.describe_camera(handle).await
    }

    /// Capture image data from the requested sensors.
    ///
    /// The effective deadline (explicit deadline wins over timeout) bounds
    /// handle creation and the capture call together; every attempt recomputes
    /// its remaining budget. `HandleNotFound` is surfaced unchanged for the
    /// orchestration layer to interpret.
    #[instrument(
        name = "camera_client_capture",
        skip(self, sensor_ids),
        fields(sensor_count = sensor_ids.len(), skip_undistortion)
    )]
    pub async fn capture(
        &mut self,
        timeout: Option<Duration>,
        deadline: Option<Deadline>,
        sensor_ids: &[SensorId],
        skip_undistortion: bool,
    ) -> Result<RawCaptureResult> {
        let deadline = Deadline::resolve(timeout, deadline);
        self.ensure_created(deadline.as_ref()).await?;

        let transport = &self.transport;
        let handle = self.handle.as_deref().ok_or_else(Self::handle_gone)?;
        let deadline = deadline.as_ref();

        retry_on_unavailable(deadline, "capture", || async move {
            let timeout = remaining_timeout(deadline, "capture")?;
            transport
                .capture(handle, sensor_ids, timeout, skip_undistortion)
                .await
        })
        .await
    }

    /// Read the current value of a setting. Errors if the setting is not
    /// supported by the camera.
    pub async fn read_setting(&mut self, name: &str) -> Result<CameraSetting> {
        self.ensure_created(None).await?;
        let handle = self.live_handle()?;
        self.transport.read_setting(handle, name).await
    }

    /// Read the properties of a setting. Only existing properties are
    /// returned; vendors implement them optionally.
    pub async fn read_setting_properties(&mut self, name: &str) -> Result<SettingProperties> {
        self.ensure_created(None).await?;
        let handle = self.live_handle()?;
        self.transport.read_setting_properties(handle, name).await
    }

    /// Update the value of a setting.
    ///
    /// Modifications apply to the physical camera and therefore to every
    /// client using it.
    pub async fn update_setting(&mut self, setting: &CameraSetting) -> Result<()> {
        self.ensure_created(None).await?;
        let handle = self.live_handle()?;
        self.transport.update_setting(handle, setting).await
    }

    fn live_handle(&self) -> Result<&str> {
        self.handle.as_deref().ok_or_else(Self::handle_gone)
    }

    fn handle_gone() -> CameraError {
        CameraError::handle_creation_failed("camera handle is not initialized")
    }
}
