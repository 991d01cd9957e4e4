//! Capture metrics recording
//!
//! Records capture outcomes through the `metrics` facade. The Prometheus
//! exporter is installed by the observability crate.

use metrics::{counter, gauge, histogram};

/// Record one finished capture call (after retries/reinitialization).
pub fn record_capture(sensor_count: usize, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("camera_captures_total", "status" => status).increment(1);
    gauge!("camera_capture_sensor_count").set(sensor_count as f64);
}

/// Record end-to-end capture latency (including retries).
pub fn record_capture_latency_ms(latency_ms: f64) {
    histogram!("camera_capture_latency_ms").record(latency_ms);
}

/// Record one handle reinitialization cycle.
pub fn record_reinitialize() {
    counter!("camera_reinitializations_total").increment(1);
}

/// Record one returned sensor image.
pub fn record_sensor_image(sensor_name: &str, bytes: usize) {
    counter!(
        "camera_sensor_images_total",
        "sensor" => sensor_name.to_string()
    )
    .increment(1);
    gauge!(
        "camera_sensor_image_bytes",
        "sensor" => sensor_name.to_string()
    )
    .set(bytes as f64);
}
