//! Capture statistics aggregation
//!
//! In-memory aggregation of capture outcomes for summaries at shutdown or on
//! demand. Live Prometheus metrics are recorded at the call sites through
//! the `metrics` facade; this module only aggregates.

use std::collections::HashMap;

/// Outcome of one logical capture call, after retries and recovery.
#[derive(Debug, Clone, Default)]
pub struct CaptureOutcome {
    /// Display names of the sensors that returned an image
    pub sensor_names: Vec<String>,

    /// End-to-end latency in milliseconds
    pub latency_ms: f64,

    /// Whether the handle was reinitialized during this capture
    pub reinitialized: bool,

    /// Whether the capture succeeded
    pub success: bool,
}

impl CaptureOutcome {
    /// A successful capture outcome.
    pub fn success(sensor_names: &[&str], latency_ms: f64) -> Self {
        Self {
            sensor_names: sensor_names.iter().map(|s| s.to_string()).collect(),
            latency_ms,
            reinitialized: false,
            success: true,
        }
    }

    /// A failed capture outcome.
    pub fn failure(latency_ms: f64) -> Self {
        Self {
            latency_ms,
            ..Self::default()
        }
    }
}

/// Capture statistics aggregator
///
/// Aggregates outcomes in memory for summary reporting.
#[derive(Debug, Clone, Default)]
pub struct CaptureStatsAggregator {
    /// Total capture calls
    pub total_captures: u64,

    /// Failed capture calls
    pub total_failures: u64,

    /// Handle reinitialization cycles
    pub total_reinitializations: u64,

    /// Latency statistics (ms), successful captures only
    pub latency_stats: RunningStats,

    /// Images returned per sensor
    pub sensor_image_counts: HashMap<String, u64>,
}

impl CaptureStatsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Update aggregate statistics from one capture outcome
    pub fn update(&mut self, outcome: &CaptureOutcome) {
        self.total_captures += 1;

        if outcome.reinitialized {
            self.total_reinitializations += 1;
        }

        if !outcome.success {
            self.total_failures += 1;
            return;
        }

        self.latency_stats.push(outcome.latency_ms);
        for name in &outcome.sensor_names {
            *self.sensor_image_counts.entry(name.clone()).or_insert(0) += 1;
        }
    }

    /// Produce a summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_captures: self.total_captures,
            total_failures: self.total_failures,
            total_reinitializations: self.total_reinitializations,
            failure_rate: if self.total_captures > 0 {
                self.total_failures as f64 / self.total_captures as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_stats),
            sensor_image_counts: self.sensor_image_counts.clone(),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_captures: u64,
    pub total_failures: u64,
    pub total_reinitializations: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
    pub sensor_image_counts: HashMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Capture Metrics Summary ===")?;
        writeln!(f, "Total captures: {}", self.total_captures)?;
        writeln!(
            f,
            "Failed captures: {} ({:.2}%)",
            self.total_failures, self.failure_rate
        )?;
        writeln!(f, "Reinitializations: {}", self.total_reinitializations)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.sensor_image_counts.is_empty() {
            writeln!(f, "Images per sensor:")?;
            for (sensor, count) in &self.sensor_image_counts {
                writeln!(f, "  {}: {}", sensor, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
