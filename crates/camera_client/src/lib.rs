//! # Camera Client
//!
//! Remote camera protocol core.
//!
//! Responsibilities:
//! - Define the narrow `CameraTransport` interface to the remote service
//! - Deadline arithmetic: one absolute deadline per logical operation
//! - Bounded retry of transient-unavailable errors
//! - Handle lifecycle: lazy create, reset, empty-handle detection
//! - Provide `MockCameraTransport` with failure injection for tests
//!
//! Handle recovery after NOT_FOUND lives one layer up, in the `camera` crate:
//! this crate surfaces `HandleNotFound` unchanged.

pub mod client;
pub mod deadline;
pub mod mock;
pub mod retry;
pub mod transport;

pub use client::CameraClient;
pub use contracts::{CameraConfig, CameraError, RawCaptureResult, Result, SensorId};
pub use deadline::Deadline;
pub use mock::{MockCameraTransport, MockTransportConfig};
pub use retry::retry_on_unavailable;
pub use transport::CameraTransport;
