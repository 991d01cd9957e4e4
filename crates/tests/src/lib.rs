//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Contract snapshot tests
//! - Mock end-to-end capture flows (no camera service required)
//! - Failure recovery and deadline behavior

#[cfg(test)]
mod contract_tests {
    use contracts::{CameraConfig, CameraIdentifier};

    #[test]
    fn test_config_serde_snapshot() {
        let config = CameraConfig {
            identifier: CameraIdentifier::GenICam {
                device_id: "dev0".to_string(),
            },
            sensor_configs: vec![],
        };

        let json = config_loader::ConfigLoader::to_json(&config).unwrap();
        assert!(json.contains("\"gen_i_cam\""));
        assert!(json.contains("\"device_id\": \"dev0\""));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use camera::{Camera, CaptureOptions};
    use camera_client::{MockCameraTransport, MockTransportConfig};
    use config_loader::FileConfigSource;
    use contracts::{CameraConfig, CameraError, CameraIdentifier};

    fn sim_config(scene_camera: &str) -> CameraConfig {
        CameraConfig {
            identifier: CameraIdentifier::Simulation {
                scene_camera: scene_camera.to_string(),
            },
            sensor_configs: vec![],
        }
    }

    /// End-to-end: lazy open issues exactly one create and one describe,
    /// then captures re-keyed by display name.
    #[tokio::test]
    async fn test_e2e_capture_flow() {
        let transport = MockCameraTransport::with_sensors(&[(1, "left"), (2, "right")]);
        let counters = transport.counters();
        let mut camera = Camera::new(transport, "cam0", sim_config("workcell_camera"));

        let result = camera
            .multi_capture(None, CaptureOptions::default())
            .await
            .unwrap();

        assert_eq!(result.sensor_images.len(), 2);
        assert!(result.sensor_images.contains_key("left"));
        assert!(result.sensor_images.contains_key("right"));
        assert_eq!(counters.create_calls(), 1);
        assert_eq!(counters.describe_calls(), 1);

        // Second capture reuses the handle and registry
        camera
            .multi_capture(Some(&["right"]), CaptureOptions::default())
            .await
            .unwrap();
        assert_eq!(counters.create_calls(), 1);
        assert_eq!(counters.describe_calls(), 1);
        assert_eq!(counters.capture_calls(), 2);
    }

    /// End-to-end recovery: a stale handle triggers one full
    /// reinitialization cycle backed by a file configuration source, and
    /// the retried capture succeeds.
    #[tokio::test]
    async fn test_e2e_handle_recovery_with_file_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cam0.toml"),
            r#"
[identifier.simulation]
scene_camera = "workcell_camera"
"#,
        )
        .unwrap();

        let transport = MockCameraTransport::with_config(MockTransportConfig {
            capture_not_found: 1,
            ..MockTransportConfig::with_sensors(&[(1, "left")])
        });
        let counters = transport.counters();
        let mut camera = Camera::builder(transport, "cam0", sim_config("stale"))
            .config_source(FileConfigSource::new(dir.path()))
            .build();

        let result = camera
            .multi_capture(None, CaptureOptions::default())
            .await
            .unwrap();

        assert_eq!(result.sensor_images.len(), 1);
        // fresh configuration adopted from the file source
        assert_eq!(camera.config().identifier.as_str(), "workcell_camera");
        // reinitialization is create + describe + one retried capture
        assert_eq!(counters.create_calls(), 2);
        assert_eq!(counters.describe_calls(), 2);
        assert_eq!(counters.capture_calls(), 2);
    }

    /// A second stale-handle report after a fresh handle propagates.
    #[tokio::test]
    async fn test_e2e_persistent_not_found_propagates() {
        let transport = MockCameraTransport::with_config(MockTransportConfig {
            capture_not_found: 2,
            ..MockTransportConfig::with_sensors(&[(1, "left")])
        });
        let counters = transport.counters();
        let mut camera = Camera::new(transport, "cam0", sim_config("workcell_camera"));

        let err = camera
            .multi_capture(None, CaptureOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_handle_not_found());
        assert_eq!(counters.capture_calls(), 2);
    }

    /// Transient unavailability is absorbed by the retry policy.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_transient_unavailable_retried() {
        let transport = MockCameraTransport::with_config(MockTransportConfig {
            create_unavailable: 1,
            capture_unavailable: 2,
            ..MockTransportConfig::with_sensors(&[(1, "left")])
        });
        let counters = transport.counters();
        let mut camera = Camera::new(transport, "cam0", sim_config("workcell_camera"));

        let result = camera
            .multi_capture(None, CaptureOptions::default())
            .await
            .unwrap();

        assert_eq!(result.sensor_images.len(), 1);
        assert_eq!(counters.create_calls(), 2);
        assert_eq!(counters.capture_calls(), 3);
    }

    /// Unknown sensor names fail locally, after open, without a capture call.
    #[tokio::test]
    async fn test_e2e_unknown_sensor_no_capture_call() {
        let transport = MockCameraTransport::with_sensors(&[(1, "left")]);
        let counters = transport.counters();
        let mut camera = Camera::new(transport, "cam0", sim_config("workcell_camera"));
        camera.open(None).await.unwrap();

        let err = camera
            .multi_capture(Some(&["missing"]), CaptureOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CameraError::UnknownSensor { .. }));
        assert_eq!(counters.capture_calls(), 0);
    }

    /// A timeout shorter than the service-side capture time yields
    /// DeadlineExceeded.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_capture_timeout() {
        let transport = MockCameraTransport::with_config(MockTransportConfig {
            capture_delay: Some(Duration::from_millis(600)),
            ..MockTransportConfig::with_sensors(&[(1, "left")])
        });
        let mut camera = Camera::new(transport, "cam0", sim_config("workcell_camera"));

        let err = camera
            .multi_capture(
                None,
                CaptureOptions::with_timeout(Duration::from_millis(500)),
            )
            .await
            .unwrap_err();

        assert!(err.is_deadline_exceeded());
    }

    /// Calibration fallback over a configuration loaded from TOML:
    /// override beats factory, factory fills the rest.
    #[tokio::test]
    async fn test_e2e_calibration_fallback_from_toml() {
        let config = config_loader::ConfigLoader::load_from_str(
            r#"
[identifier.gen_i_cam]
device_id = "dev0"

[[sensor_configs]]
sensor_id = 1

[sensor_configs.camera_params]
intrinsic_matrix = [900.0, 0.0, 4.0, 0.0, 900.0, 3.0, 0.0, 0.0, 1.0]
distortion_params = [0.1, 0.2, 0.3, 0.4]
width = 8
height = 6
"#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let transport = MockCameraTransport::with_sensors(&[(1, "left"), (2, "right")]);
        let mut camera = Camera::new(transport, "cam0", config);
        camera.open(None).await.unwrap();

        // override wins for sensor 1
        assert_eq!(camera.intrinsic_matrix("left").unwrap()[0], 900.0);
        assert_eq!(camera.distortion_params("left").unwrap().len(), 4);
        // factory calibration applies for sensor 2 (mock default)
        assert_eq!(camera.intrinsic_matrix("right").unwrap()[0], 4.0);
        // absent sensor resolves to None
        assert_eq!(camera.intrinsic_matrix("depth"), None);
    }
}

#[cfg(test)]
mod stats_tests {
    use observability::{CaptureOutcome, CaptureStatsAggregator};

    #[test]
    fn test_stats_aggregation_over_session() {
        let mut stats = CaptureStatsAggregator::new();

        for _ in 0..9 {
            stats.update(&CaptureOutcome::success(&["left", "right"], 40.0));
        }
        stats.update(&CaptureOutcome {
            reinitialized: true,
            ..CaptureOutcome::failure(1000.0)
        });

        let summary = stats.summary();
        assert_eq!(summary.total_captures, 10);
        assert_eq!(summary.total_failures, 1);
        assert_eq!(summary.total_reinitializations, 1);
        assert!((summary.failure_rate - 10.0).abs() < 1e-10);
        assert_eq!(summary.sensor_image_counts["left"], 9);
    }
}
