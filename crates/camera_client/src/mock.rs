//! Mock camera transport
//!
//! In-memory implementation for unit tests, with injectable failure scenarios
//! and call counters so tests can assert exactly how many remote calls were
//! issued.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use contracts::{
    CameraConfig, CameraError, CameraParams, CameraSetting, PixelFormat, RawCaptureResult,
    Result, SensorDescriptor, SensorId, SensorImage, SettingProperties, SettingValue,
};
use tracing::instrument;

use crate::transport::CameraTransport;

/// Mock transport configuration (injectable failure scenarios).
#[derive(Debug, Default, Clone)]
pub struct MockTransportConfig {
    /// Sensors the mock camera reports from describe
    pub descriptors: Vec<SensorDescriptor>,

    /// Number of leading create calls that fail with `Unavailable`
    pub create_unavailable: u32,

    /// Whether create returns an empty handle id
    pub create_empty_handle: bool,

    /// Number of leading capture calls that fail with `Unavailable`
    pub capture_unavailable: u32,

    /// Number of leading capture calls that fail with `HandleNotFound`
    pub capture_not_found: u32,

    /// Simulated driver time per capture; a delay longer than the passed
    /// timeout yields `DeadlineExceeded` after the timeout elapses
    pub capture_delay: Option<Duration>,

    /// Seeded settings, readable and updatable by name
    pub settings: HashMap<String, SettingValue>,

    /// Seeded setting properties
    pub properties: HashMap<String, SettingProperties>,
}

impl MockTransportConfig {
    /// Config reporting the given (id, display name) sensors with small
    /// default factory calibration.
    pub fn with_sensors(sensors: &[(SensorId, &str)]) -> Self {
        Self {
            descriptors: sensors
                .iter()
                .map(|(id, name)| default_descriptor(*id, name))
                .collect(),
            ..Self::default()
        }
    }
}

/// Default factory descriptor used by `with_sensors`.
fn default_descriptor(sensor_id: SensorId, name: &str) -> SensorDescriptor {
    SensorDescriptor {
        sensor_id,
        display_name: name.into(),
        factory_camera_params: Some(CameraParams {
            intrinsic_matrix: [4.0, 0.0, 4.0, 0.0, 4.0, 3.0, 0.0, 0.0, 1.0],
            distortion_params: vec![0.0, 0.0, 0.0, 0.0, 0.0],
            width: 8,
            height: 6,
        }),
        camera_t_sensor: None,
    }
}

/// Shared call counters, cloneable out of the transport before it is moved
/// into a client.
#[derive(Clone, Default)]
pub struct CallCounters {
    inner: Arc<CountersInner>,
}

#[derive(Default)]
struct CountersInner {
    create: AtomicU32,
    describe: AtomicU32,
    capture: AtomicU32,
    read_setting: AtomicU32,
    read_properties: AtomicU32,
    update_setting: AtomicU32,
}

impl CallCounters {
    pub fn create_calls(&self) -> u32 {
        self.inner.create.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> u32 {
        self.inner.describe.load(Ordering::SeqCst)
    }

    pub fn capture_calls(&self) -> u32 {
        self.inner.capture.load(Ordering::SeqCst)
    }

    pub fn read_setting_calls(&self) -> u32 {
        self.inner.read_setting.load(Ordering::SeqCst)
    }

    pub fn read_properties_calls(&self) -> u32 {
        self.inner.read_properties.load(Ordering::SeqCst)
    }

    pub fn update_setting_calls(&self) -> u32 {
        self.inner.update_setting.load(Ordering::SeqCst)
    }

    /// Total remote calls of any kind.
    pub fn total(&self) -> u32 {
        self.create_calls()
            + self.describe_calls()
            + self.capture_calls()
            + self.read_setting_calls()
            + self.read_properties_calls()
            + self.update_setting_calls()
    }
}

/// Mock camera transport
pub struct MockCameraTransport {
    /// Configuration (failure counts decrement as they fire)
    config: Mutex<MockTransportConfig>,
    /// Call counters, shared with tests
    counters: CallCounters,
    /// Handle id allocator
    next_handle: AtomicU32,
    /// Handles the mock service currently considers live
    live_handles: Mutex<HashSet<String>>,
    /// Current setting values (read-modify-write through the trait)
    settings: Mutex<HashMap<String, SettingValue>>,
    /// Last capture request, for request-shape assertions
    last_capture: Mutex<Option<(Vec<SensorId>, bool)>>,
}

impl MockCameraTransport {
    /// Mock camera with no sensors and no failure injection.
    pub fn new() -> Self {
        Self::with_config(MockTransportConfig::default())
    }

    /// Mock camera reporting the given sensors.
    pub fn with_sensors(sensors: &[(SensorId, &str)]) -> Self {
        Self::with_config(MockTransportConfig::with_sensors(sensors))
    }

    /// Mock camera with full failure-injection config.
    pub fn with_config(config: MockTransportConfig) -> Self {
        let settings = config.settings.clone();
        Self {
            config: Mutex::new(config),
            counters: CallCounters::default(),
            next_handle: AtomicU32::new(1), // handle ids start at mock-handle-1
            live_handles: Mutex::new(HashSet::new()),
            settings: Mutex::new(settings),
            last_capture: Mutex::new(None),
        }
    }

    /// Handle to the call counters; survives moving the transport.
    pub fn counters(&self) -> CallCounters {
        self.counters.clone()
    }

    /// Drop all live handles, as a service restart would.
    ///
    /// Subsequent calls with an old handle fail with `HandleNotFound`.
    pub fn invalidate_handles(&self) {
        self.live_handles.lock().unwrap().clear();
    }

    /// Sensor ids and undistortion flag of the most recent capture request.
    pub fn last_capture_request(&self) -> Option<(Vec<SensorId>, bool)> {
        self.last_capture.lock().unwrap().clone()
    }

    /// Current value of a seeded setting.
    pub fn setting(&self, name: &str) -> Option<SettingValue> {
        self.settings.lock().unwrap().get(name).cloned()
    }

    fn check_handle(&self, handle: &str) -> Result<()> {
        if self.live_handles.lock().unwrap().contains(handle) {
            Ok(())
        } else {
            Err(CameraError::handle_not_found(format!(
                "handle '{handle}' does not exist"
            )))
        }
    }

    fn image_for(descriptor: &SensorDescriptor) -> SensorImage {
        let (width, height) = descriptor
            .factory_camera_params
            .as_ref()
            .map(|p| p.dimensions())
            .unwrap_or((8, 6));
        SensorImage {
            sensor_id: descriptor.sensor_id,
            width,
            height,
            format: PixelFormat::Rgb8,
            data: Bytes::from(vec![0u8; (width * height * 3) as usize]),
        }
    }
}

impl Default for MockCameraTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraTransport for MockCameraTransport {
    #[instrument(name = "mock_camera_create", skip(self, _config, _timeout))]
    async fn create_camera(
        &self,
        _config: &CameraConfig,
        _timeout: Option<Duration>,
    ) -> Result<String> {
        self.counters.inner.create.fetch_add(1, Ordering::SeqCst);

        {
            let mut config = self.config.lock().unwrap();
            if config.create_unavailable > 0 {
                config.create_unavailable -= 1;
                return Err(CameraError::unavailable("mock service unavailable"));
            }
            if config.create_empty_handle {
                return Ok(String::new());
            }
        }

        let handle = format!(
            "mock-handle-{}",
            self.next_handle.fetch_add(1, Ordering::SeqCst)
        );
        self.live_handles.lock().unwrap().insert(handle.clone());
        Ok(handle)
    }

    #[instrument(name = "mock_camera_describe", skip(self))]
    async fn describe_camera(&self, handle: &str) -> Result<Vec<SensorDescriptor>> {
        self.counters.inner.describe.fetch_add(1, Ordering::SeqCst);
        self.check_handle(handle)?;
        Ok(self.config.lock().unwrap().descriptors.clone())
    }

    #[instrument(
        name = "mock_camera_capture",
        skip(self, sensor_ids, timeout),
        fields(sensor_count = sensor_ids.len())
    )]
    async fn capture(
        &self,
        handle: &str,
        sensor_ids: &[SensorId],
        timeout: Option<Duration>,
        skip_undistortion: bool,
    ) -> Result<RawCaptureResult> {
        self.counters.inner.capture.fetch_add(1, Ordering::SeqCst);
        *self.last_capture.lock().unwrap() = Some((sensor_ids.to_vec(), skip_undistortion));

        let (delay, descriptors) = {
            let mut config = self.config.lock().unwrap();
            if config.capture_unavailable > 0 {
                config.capture_unavailable -= 1;
                return Err(CameraError::unavailable("mock service unavailable"));
            }
            if config.capture_not_found > 0 {
                config.capture_not_found -= 1;
                return Err(CameraError::handle_not_found(format!(
                    "handle '{handle}' does not exist"
                )));
            }
            (config.capture_delay, config.descriptors.clone())
        };

        self.check_handle(handle)?;

        // Simulated driver time: a timeout shorter than the delay fires first.
        if let Some(delay) = delay {
            match timeout {
                Some(timeout) if timeout < delay => {
                    tokio::time::sleep(timeout).await;
                    return Err(CameraError::deadline_exceeded("capture"));
                }
                _ => tokio::time::sleep(delay).await,
            }
        }

        let sensor_images = descriptors
            .iter()
            .filter(|d| sensor_ids.is_empty() || sensor_ids.contains(&d.sensor_id))
            .map(Self::image_for)
            .collect();

        Ok(RawCaptureResult { sensor_images })
    }

    #[instrument(name = "mock_camera_read_setting", skip(self))]
    async fn read_setting(&self, handle: &str, name: &str) -> Result<CameraSetting> {
        self.counters
            .inner
            .read_setting
            .fetch_add(1, Ordering::SeqCst);
        self.check_handle(handle)?;

        let value = self
            .settings
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| CameraError::invalid_setting(name, "unsupported setting"))?;

        Ok(CameraSetting {
            name: name.to_string(),
            value,
        })
    }

    #[instrument(name = "mock_camera_read_setting_properties", skip(self))]
    async fn read_setting_properties(&self, handle: &str, name: &str) -> Result<SettingProperties> {
        self.counters
            .inner
            .read_properties
            .fetch_add(1, Ordering::SeqCst);
        self.check_handle(handle)?;

        self.config
            .lock()
            .unwrap()
            .properties
            .get(name)
            .cloned()
            .ok_or_else(|| CameraError::invalid_setting(name, "unsupported setting"))
    }

    #[instrument(name = "mock_camera_update_setting", skip(self, setting), fields(name = %setting.name))]
    async fn update_setting(&self, handle: &str, setting: &CameraSetting) -> Result<()> {
        self.counters
            .inner
            .update_setting
            .fetch_add(1, Ordering::SeqCst);
        self.check_handle(handle)?;

        let mut settings = self.settings.lock().unwrap();
        let current = settings
            .get(&setting.name)
            .ok_or_else(|| CameraError::invalid_setting(&setting.name, "unsupported setting"))?;

        if current.kind() != setting.value.kind() {
            return Err(CameraError::invalid_setting(
                &setting.name,
                format!("expected {}, got {}", current.kind(), setting.value.kind()),
            ));
        }

        settings.insert(setting.name.clone(), setting.value.clone());
        Ok(())
    }
}
