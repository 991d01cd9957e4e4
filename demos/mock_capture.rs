//! Mock Capture Demo
//!
//! Demonstrates the capture flow against MockCameraTransport, including a
//! mid-session handle loss and recovery. Runs without a camera service.
//!
//! Run with: cargo run --bin mock_capture [config.toml]

use std::time::{Duration, Instant};

use camera::{Camera, CaptureOptions};
use camera_client::{MockCameraTransport, MockTransportConfig};
use config_loader::ConfigLoader;
use contracts::{CameraConfig, CameraIdentifier, SettingValue};
use observability::{CaptureOutcome, CaptureStatsAggregator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Mock Capture Demo");

    // ==== Stage 1: Use default config or load from file ====
    let config = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading camera config");
        ConfigLoader::load_from_path(std::path::Path::new(&path))?
    } else {
        create_test_config()
    };

    // ==== Stage 2: Build the mock camera ====
    let mut mock_config = MockTransportConfig::with_sensors(&[(1, "left"), (2, "right")]);
    mock_config
        .settings
        .insert("ExposureTime".to_string(), SettingValue::Float(8000.0));
    // Second capture hits a stale handle to demonstrate recovery
    mock_config.capture_not_found = 1;

    let transport = MockCameraTransport::with_config(mock_config);
    let counters = transport.counters();
    let mut camera = Camera::new(transport, "demo_camera", config);

    camera.open(Some(Duration::from_secs(5))).await?;
    tracing::info!(
        sensors = ?camera.sensor_names(),
        "Camera opened"
    );

    // ==== Stage 3: Settings round trip ====
    let exposure = camera.read_setting("ExposureTime").await?;
    tracing::info!(?exposure, "Current exposure");
    camera
        .update_setting("ExposureTime", SettingValue::Integer(12000))
        .await?;
    tracing::info!(
        exposure = ?camera.read_setting("ExposureTime").await?,
        "Exposure updated"
    );

    // ==== Stage 4: Capture loop ====
    let mut stats = CaptureStatsAggregator::new();
    let target_captures = 20u32;

    tracing::info!(target = target_captures, "Running capture loop");

    for i in 0..target_captures {
        let started = Instant::now();
        let options = CaptureOptions::with_timeout(Duration::from_millis(500));

        match camera.multi_capture(None, options).await {
            Ok(result) => {
                let names: Vec<&str> = result
                    .sensor_images
                    .keys()
                    .map(|n| n.as_str())
                    .collect();
                stats.update(&CaptureOutcome::success(
                    &names,
                    started.elapsed().as_secs_f64() * 1000.0,
                ));
                tracing::info!(
                    capture = i,
                    sensors = names.len(),
                    "Capture succeeded"
                );
            }
            Err(e) => {
                stats.update(&CaptureOutcome::failure(
                    started.elapsed().as_secs_f64() * 1000.0,
                ));
                tracing::warn!(capture = i, error = %e, "Capture failed");
            }
        }
    }

    // ==== Stage 5: Summary ====
    tracing::info!(
        create_calls = counters.create_calls(),
        capture_calls = counters.capture_calls(),
        "Remote call totals"
    );
    println!("{}", stats.summary());

    Ok(())
}

fn create_test_config() -> CameraConfig {
    CameraConfig {
        identifier: CameraIdentifier::Simulation {
            scene_camera: "workcell_camera".to_string(),
        },
        sensor_configs: vec![],
    }
}
