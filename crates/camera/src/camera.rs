//! Camera - capture orchestration over a CameraClient
//!
//! Resolves sensor names, keeps handle and registry in lockstep, recovers a
//! stale handle exactly once per capture, and assembles name-keyed results.

use std::collections::HashMap;
use std::time::Duration;

use camera_client::{CameraClient, CameraTransport, Deadline};
use contracts::{
    CameraConfig, CameraError, CameraIdentifier, CaptureResult, ConfigSource, PoseProvider,
    Pose, RawCaptureResult, Result, SensorDescriptor, SensorId, SensorImage, SensorName,
    SettingProperties, SettingValue,
};
use tracing::{info, instrument, warn};

use crate::metrics;
use crate::registry::SensorRegistry;

/// Options for a capture call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureOptions {
    /// Budget for the whole logical capture, including handle creation,
    /// retries and one reinitialization cycle. `None` means unbounded.
    pub timeout: Option<Duration>,

    /// Absolute bound for the capture; takes priority over `timeout`
    pub deadline: Option<Deadline>,

    /// Whether the service should skip undistortion
    pub skip_undistortion: bool,
}

impl CaptureOptions {
    /// Options with a timeout and undistortion enabled.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// What to attach as the camera world pose when no provider is configured.
///
/// The fallback is an explicit choice made at construction time, not an
/// implicit default buried in the capture path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPosePolicy {
    /// Attach the identity pose and log a warning per capture
    #[default]
    IdentityWithWarning,

    /// Fail the capture with `ConfigurationMissing`
    Fail,
}

/// Builder for [`Camera`].
pub struct CameraBuilder<T: CameraTransport> {
    transport: T,
    resource_name: String,
    config: CameraConfig,
    config_source: Option<Box<dyn ConfigSource>>,
    pose_provider: Option<Box<dyn PoseProvider>>,
    missing_pose_policy: MissingPosePolicy,
}

impl<T: CameraTransport> CameraBuilder<T> {
    /// Attach the authoritative configuration source consulted during
    /// reinitialization. Without one, reinitialization reuses the current
    /// configuration.
    pub fn config_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.config_source = Some(Box::new(source));
        self
    }

    /// Attach the pose provider supplying `world_t_camera`.
    pub fn pose_provider(mut self, provider: impl PoseProvider + 'static) -> Self {
        self.pose_provider = Some(Box::new(provider));
        self
    }

    /// Choose what happens when no pose provider is attached.
    pub fn missing_pose_policy(mut self, policy: MissingPosePolicy) -> Self {
        self.missing_pose_policy = policy;
        self
    }

    /// Build the camera. No network call; the handle and registry are
    /// established lazily or via [`Camera::open`].
    pub fn build(self) -> Camera<T> {
        Camera {
            client: CameraClient::new(self.transport, self.config.clone()),
            resource_name: self.resource_name,
            config: self.config,
            registry: SensorRegistry::empty(),
            config_source: self.config_source,
            pose_provider: self.pose_provider,
            missing_pose_policy: self.missing_pose_policy,
        }
    }
}

/// Convenience camera over the remote camera service.
///
/// Wraps a [`CameraClient`] and adds sensor-name resolution, calibration
/// fallback, pose attachment, and one-shot handle recovery.
///
/// Operations mutate the handle and registry in place; concurrent calls on
/// one instance must be serialized by the caller (one instance per logical
/// user). Multiple instances against the same physical camera are arbitrated
/// by the remote service, not by this layer.
pub struct Camera<T: CameraTransport> {
    client: CameraClient<T>,
    resource_name: String,
    /// Current user configuration; overrides factory calibration
    config: CameraConfig,
    /// Rebuilt together with the handle, never reused across generations
    registry: SensorRegistry,
    config_source: Option<Box<dyn ConfigSource>>,
    pose_provider: Option<Box<dyn PoseProvider>>,
    missing_pose_policy: MissingPosePolicy,
}

impl<T: CameraTransport> Camera<T> {
    /// Start building a camera for a named resource.
    pub fn builder(transport: T, resource_name: impl Into<String>, config: CameraConfig) -> CameraBuilder<T> {
        CameraBuilder {
            transport,
            resource_name: resource_name.into(),
            config,
            config_source: None,
            pose_provider: None,
            missing_pose_policy: MissingPosePolicy::default(),
        }
    }

    /// Camera with no collaborators attached.
    pub fn new(transport: T, resource_name: impl Into<String>, config: CameraConfig) -> Self {
        Self::builder(transport, resource_name, config).build()
    }

    // ===== Lifecycle =====

    /// Whether a server-side handle is currently live.
    pub fn created(&self) -> bool {
        self.client.created()
    }

    /// Explicitly create the handle and build the sensor registry.
    ///
    /// Optional: every operation that needs a handle performs the same steps
    /// lazily. Tests and eager callers get clearer failure points this way.
    pub async fn open(&mut self, timeout: Option<Duration>) -> Result<()> {
        let deadline = Deadline::resolve(timeout, None);
        self.ensure_open(deadline.as_ref()).await
    }

    /// Discard the handle and registry and adopt a new configuration.
    ///
    /// Local state only; never fails.
    pub fn reset(&mut self, config: CameraConfig) {
        self.config = config.clone();
        self.client.reset(config);
        self.registry = SensorRegistry::empty();
    }

    /// Recreate the camera with a new configuration.
    pub async fn create_camera(
        &mut self,
        config: CameraConfig,
        timeout: Option<Duration>,
    ) -> Result<()> {
        self.reset(config);
        self.open(timeout).await
    }

    /// Describe the camera's sensors (factory calibration included).
    pub async fn describe_camera(&mut self) -> Result<Vec<SensorDescriptor>> {
        self.ensure_open(None).await?;
        Ok(self
            .registry
            .names()
            .iter()
            .filter_map(|n| self.registry.descriptor(n).cloned())
            .collect())
    }

    /// Ensure handle and registry exist for the current generation.
    ///
    /// On a fresh (or reset) camera this is the implicit create + describe
    /// sequence; afterwards it is a no-op.
    async fn ensure_open(&mut self, deadline: Option<&Deadline>) -> Result<()> {
        if self.client.created() && !self.registry.is_empty() {
            return Ok(());
        }

        self.client.ensure_created(deadline).await?;
        let descriptors = self.client.describe_camera().await?;
        self.registry = SensorRegistry::from_descriptors(descriptors);
        info!(
            resource = %self.resource_name,
            sensors = self.registry.len(),
            "sensor registry built"
        );
        Ok(())
    }

    /// Rebuild handle and registry after the service reported the handle gone.
    ///
    /// Re-fetches the authoritative configuration when a source is attached
    /// (the restart may have changed the sensor layout), then recreates the
    /// handle and registry before any retried call is issued.
    #[instrument(name = "camera_reinitialize", skip(self, cause), fields(resource = %self.resource_name))]
    async fn reinitialize(&mut self, cause: &CameraError, deadline: Option<&Deadline>) -> Result<()> {
        warn!(error = %cause, "camera handle lost, reinitializing");
        metrics::record_reinitialize();

        if let Some(source) = &self.config_source {
            let config = source.fetch_config(&self.resource_name).map_err(|e| {
                CameraError::configuration_missing(self.resource_name.clone(), e.to_string())
            })?;
            self.config = config;
        }

        self.client.reset(self.config.clone());
        self.registry = SensorRegistry::empty();
        self.ensure_open(deadline).await
    }

    // ===== Capture =====

    /// Capture a single sensor image.
    ///
    /// `None` selects the camera's primary sensor (the first reported by
    /// describe). A named sensor must exist in the registry.
    pub async fn capture(
        &mut self,
        sensor_name: Option<&str>,
        options: CaptureOptions,
    ) -> Result<SensorImage> {
        let mut result = match sensor_name {
            Some(name) => self.multi_capture(Some(&[name]), options).await?,
            None => self.multi_capture(None, options).await?,
        };

        let first = match sensor_name {
            Some(name) => result.sensor_images.remove(name),
            None => self
                .registry
                .names()
                .iter()
                .find_map(|n| result.sensor_images.remove(n.as_str())),
        };

        first.ok_or_else(|| {
            CameraError::Other(format!(
                "capture returned no image for camera '{}'",
                self.resource_name
            ))
        })
    }

    /// Capture from the requested sensors (all sensors when `None`).
    ///
    /// The returned result is keyed by display name and carries the camera
    /// world pose; it is all-or-nothing, never partial.
    #[instrument(
        name = "camera_multi_capture",
        skip(self, sensor_names, options),
        fields(resource = %self.resource_name)
    )]
    pub async fn multi_capture(
        &mut self,
        sensor_names: Option<&[&str]>,
        options: CaptureOptions,
    ) -> Result<CaptureResult> {
        let deadline = Deadline::resolve(options.timeout, options.deadline);
        let started = tokio::time::Instant::now();

        self.ensure_open(deadline.as_ref()).await?;

        // Name resolution is local and precedes the capture call: a bad
        // name never reaches the service with a guessed id set.
        let sensor_ids = match sensor_names {
            Some(names) => self.registry.resolve(names)?,
            None => Vec::new(),
        };

        let outcome = self
            .capture_with_recovery(deadline.as_ref(), &sensor_ids, options.skip_undistortion)
            .await;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                metrics::record_capture(sensor_ids.len(), false);
                return Err(e);
            }
        };

        let result = self.assemble_result(raw)?;
        metrics::record_capture(result.sensor_images.len(), true);
        metrics::record_capture_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
        Ok(result)
    }

    /// Issue the capture, absorbing `HandleNotFound` exactly once.
    ///
    /// Explicit two-iteration construct, not a loop: try, reinitialize on
    /// NOT_FOUND, try once more, propagate. A second NOT_FOUND after a fresh
    /// handle means something beyond a stale session and is surfaced.
    async fn capture_with_recovery(
        &mut self,
        deadline: Option<&Deadline>,
        sensor_ids: &[SensorId],
        skip_undistortion: bool,
    ) -> Result<RawCaptureResult> {
        self.ensure_open(deadline).await?;

        match self
            .client
            .capture(None, deadline.copied(), sensor_ids, skip_undistortion)
            .await
        {
            Ok(raw) => Ok(raw),
            Err(e) if e.is_handle_not_found() => {
                // Handle went stale mid-operation (service restart or
                // sim/real switchover); recover once.
                self.reinitialize(&e, deadline).await?;
                self.client
                    .capture(None, deadline.copied(), sensor_ids, skip_undistortion)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Re-key a raw response by display name and attach the world pose.
    fn assemble_result(&self, raw: RawCaptureResult) -> Result<CaptureResult> {
        let mut sensor_images: HashMap<SensorName, SensorImage> = HashMap::new();
        for image in raw.sensor_images {
            let name = self.registry.name_of(image.sensor_id).ok_or_else(|| {
                CameraError::Other(format!(
                    "capture response contains sensor id {} not present in the registry",
                    image.sensor_id
                ))
            })?;
            metrics::record_sensor_image(name.as_str(), image.data.len());
            sensor_images.insert(name.clone(), image);
        }

        Ok(CaptureResult {
            sensor_images,
            world_t_camera: self.world_t_camera()?,
        })
    }

    // ===== Pose =====

    /// Camera world pose from the provider, or the configured fallback.
    pub fn world_t_camera(&self) -> Result<Pose> {
        if let Some(provider) = &self.pose_provider {
            return Ok(provider.world_t_camera());
        }
        match self.missing_pose_policy {
            MissingPosePolicy::IdentityWithWarning => {
                warn!(
                    resource = %self.resource_name,
                    "no pose provider attached, using identity world_t_camera"
                );
                Ok(Pose::identity())
            }
            MissingPosePolicy::Fail => Err(CameraError::configuration_missing(
                self.resource_name.clone(),
                "no pose provider attached",
            )),
        }
    }

    /// Sensor world pose: `world_t_camera * camera_t_sensor`.
    pub fn world_t_sensor(&self, sensor_name: &str) -> Result<Option<Pose>> {
        let Some(camera_t_sensor) = self.camera_t_sensor(sensor_name) else {
            return Ok(None);
        };
        Ok(Some(self.world_t_camera()?.multiply(&camera_t_sensor)))
    }

    // ===== Calibration fallback chain =====

    /// Intrinsic matrix for a sensor: configuration override, then factory
    /// value, then `None` (unknown, not an error).
    pub fn intrinsic_matrix(&self, sensor_name: &str) -> Option<[f64; 9]> {
        let descriptor = self.registry.descriptor(sensor_name)?;
        if let Some(params) = self.override_params(descriptor.sensor_id) {
            return Some(params.intrinsic_matrix);
        }
        descriptor
            .factory_camera_params
            .as_ref()
            .map(|p| p.intrinsic_matrix)
    }

    /// Distortion parameters with the same fallback chain as
    /// [`Self::intrinsic_matrix`].
    pub fn distortion_params(&self, sensor_name: &str) -> Option<Vec<f64>> {
        let descriptor = self.registry.descriptor(sensor_name)?;
        if let Some(params) = self.override_params(descriptor.sensor_id) {
            return Some(params.distortion_params.clone());
        }
        descriptor
            .factory_camera_params
            .as_ref()
            .map(|p| p.distortion_params.clone())
    }

    /// Sensor extrinsic pose: override, then factory, then `None`.
    pub fn camera_t_sensor(&self, sensor_name: &str) -> Option<Pose> {
        let descriptor = self.registry.descriptor(sensor_name)?;
        self.config
            .sensor_config(descriptor.sensor_id)
            .and_then(|c| c.camera_t_sensor)
            .or(descriptor.camera_t_sensor)
    }

    fn override_params(&self, sensor_id: SensorId) -> Option<&contracts::CameraParams> {
        self.config
            .sensor_config(sensor_id)?
            .camera_params
            .as_ref()
    }

    // ===== Settings =====

    /// Read the current value of a setting (SFNC name).
    pub async fn read_setting(&mut self, name: &str) -> Result<SettingValue> {
        Ok(self.client.read_setting(name).await?.value)
    }

    /// Read the properties of a setting.
    pub async fn read_setting_properties(&mut self, name: &str) -> Result<SettingProperties> {
        self.client.read_setting_properties(name).await
    }

    /// Update a setting, validating the value against the current type.
    ///
    /// The current value is read first to learn the setting's type; integers
    /// are accepted where floats are expected, nothing else is coerced.
    /// Updates apply to the physical camera, so they affect every client.
    pub async fn update_setting(&mut self, name: &str, value: SettingValue) -> Result<()> {
        let mut setting = self.client.read_setting(name).await?;

        setting.value = match (&setting.value, value) {
            (SettingValue::Integer(_), SettingValue::Integer(v)) => SettingValue::Integer(v),
            (SettingValue::Float(_), SettingValue::Float(v)) => SettingValue::Float(v),
            // int widens to float, never the reverse
            (SettingValue::Float(_), SettingValue::Integer(v)) => SettingValue::Float(v as f64),
            (SettingValue::Bool(_), SettingValue::Bool(v)) => SettingValue::Bool(v),
            (SettingValue::String(_), SettingValue::String(v)) => SettingValue::String(v),
            (SettingValue::Enumeration(_), SettingValue::Enumeration(v))
            | (SettingValue::Enumeration(_), SettingValue::String(v)) => {
                SettingValue::Enumeration(v)
            }
            // command settings carry no value to validate
            (SettingValue::Command, _) => SettingValue::Command,
            (current, supplied) => {
                return Err(CameraError::invalid_setting(
                    name,
                    format!("expected {}, got {}", current.kind(), supplied.kind()),
                ));
            }
        };

        self.client.update_setting(&setting).await
    }

    // ===== Read-only accessors =====

    /// Camera resource name.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Camera identity from the current configuration.
    pub fn identifier(&self) -> &CameraIdentifier {
        &self.config.identifier
    }

    /// Current user configuration.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Sensor display names in describe order (empty before open).
    pub fn sensor_names(&self) -> &[SensorName] {
        self.registry.names()
    }

    /// Numeric sensor ids in describe order.
    pub fn sensor_ids(&self) -> Vec<SensorId> {
        self.registry.ids()
    }

    /// Mapping of numeric id to display name.
    pub fn sensor_id_to_name(&self) -> &HashMap<SensorId, SensorName> {
        self.registry.id_to_name()
    }

    /// Factory image dimensions (width, height) per sensor.
    pub fn sensor_dimensions(&self) -> HashMap<SensorName, (u32, u32)> {
        self.registry
            .names()
            .iter()
            .filter_map(|n| {
                let params = self.registry.descriptor(n)?.factory_camera_params.as_ref()?;
                Some((n.clone(), params.dimensions()))
            })
            .collect()
    }
}
