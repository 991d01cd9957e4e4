//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Handle Model
//! - The remote camera service issues an opaque string handle per session
//! - Sensors are identified by a remote-assigned numeric id and a human display name

mod camera_config;
mod error;
mod pose;
mod sensor;
mod sensor_name;
mod settings;
mod source;

pub use camera_config::*;
pub use error::*;
pub use pose::Pose;
pub use sensor::*;
pub use sensor_name::SensorName;
pub use settings::*;
pub use source::{ConfigSource, PoseProvider};
