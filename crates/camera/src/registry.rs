//! SensorRegistry - id <-> name mapping and factory descriptors
//!
//! Built exactly once per handle generation from the describe response. A
//! registry from an older generation must never interpret a capture response
//! obtained under a newer handle; reinitialization rebuilds both together.

use std::collections::HashMap;

use contracts::{CameraError, Result, SensorDescriptor, SensorId, SensorName};
use tracing::warn;

/// Per-handle-generation sensor registry.
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    sensors: HashMap<SensorName, SensorDescriptor>,
    id_to_name: HashMap<SensorId, SensorName>,
    /// Display names in describe order; the first is the primary sensor
    names: Vec<SensorName>,
}

impl SensorRegistry {
    /// Registry of a client whose describe has not succeeded yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a describe response.
    ///
    /// Duplicate display names violate the id <-> name bijection; later
    /// duplicates are dropped with a warning rather than silently shadowing
    /// the sensor that was reported first.
    pub fn from_descriptors(descriptors: Vec<SensorDescriptor>) -> Self {
        let mut registry = Self::empty();
        for descriptor in descriptors {
            if registry.sensors.contains_key(descriptor.display_name.as_str()) {
                warn!(
                    sensor = %descriptor.display_name,
                    sensor_id = descriptor.sensor_id,
                    "duplicate sensor display name in describe response, ignoring"
                );
                continue;
            }
            let name = descriptor.display_name.clone();
            registry.id_to_name.insert(descriptor.sensor_id, name.clone());
            registry.names.push(name.clone());
            registry.sensors.insert(name, descriptor);
        }
        registry
    }

    /// Whether describe has ever succeeded for this generation.
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Number of sensors.
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Display names in describe order.
    pub fn names(&self) -> &[SensorName] {
        &self.names
    }

    /// Numeric ids in describe order.
    pub fn ids(&self) -> Vec<SensorId> {
        self.names
            .iter()
            .filter_map(|n| self.sensors.get(n.as_str()).map(|d| d.sensor_id))
            .collect()
    }

    /// Mapping of numeric id to display name.
    pub fn id_to_name(&self) -> &HashMap<SensorId, SensorName> {
        &self.id_to_name
    }

    /// Factory descriptor for a display name.
    pub fn descriptor(&self, name: &str) -> Option<&SensorDescriptor> {
        self.sensors.get(name)
    }

    /// Display name for a numeric id.
    pub fn name_of(&self, sensor_id: SensorId) -> Option<&SensorName> {
        self.id_to_name.get(&sensor_id)
    }

    /// Resolve display names to numeric ids, order and duplicates preserved.
    ///
    /// # Errors
    /// `UnknownSensor` when the registry is empty (describe never succeeded)
    /// or when any requested name is absent. No partial resolution.
    pub fn resolve(&self, names: &[&str]) -> Result<Vec<SensorId>> {
        names
            .iter()
            .map(|&name| {
                self.sensors
                    .get(name)
                    .map(|d| d.sensor_id)
                    .ok_or_else(|| CameraError::unknown_sensor(name))
            })
            .collect()
    }
}
