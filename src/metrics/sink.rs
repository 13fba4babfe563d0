use super::{Measurement, MetricKind};
use crate::dimensions::Dimensions;
use chrono::{DateTime, Utc};

/// Receives the measurements produced by the mapping engine
///
/// A sink is owned by the caller and handed to every push call, so the engine never
/// buffers or flushes anything itself.
pub trait MetricSink {
    /// Record a point-in-time value
    fn record_gauge(&mut self, name: &str, value: f64, dimensions: &Dimensions, timestamp: Option<DateTime<Utc>>);

    /// Record a counter whose rate of change is reported
    fn record_rate(&mut self, name: &str, value: f64, dimensions: &Dimensions, timestamp: Option<DateTime<Utc>>);
}

/// A sink that keeps every measurement in memory, in emission order
#[derive(Debug, Clone, Default)]
pub struct MeasurementBuffer {
    measurements: Vec<Measurement>,
}

impl MeasurementBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self { measurements: Vec::new() }
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    #[must_use]
    pub fn into_measurements(self) -> Vec<Measurement> {
        self.measurements
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.measurements.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn clear(&mut self) {
        self.measurements.clear();
    }

    fn record(&mut self, kind: MetricKind, name: &str, value: f64, dimensions: &Dimensions, timestamp: Option<DateTime<Utc>>) {
        self.measurements.push(Measurement {
            kind,
            name: name.to_string(),
            value,
            dimensions: dimensions.clone(),
            timestamp,
        });
    }
}

impl MetricSink for MeasurementBuffer {
    fn record_gauge(&mut self, name: &str, value: f64, dimensions: &Dimensions, timestamp: Option<DateTime<Utc>>) {
        self.record(MetricKind::Gauge, name, value, dimensions, timestamp);
    }

    fn record_rate(&mut self, name: &str, value: f64, dimensions: &Dimensions, timestamp: Option<DateTime<Utc>>) {
        self.record(MetricKind::Rate, name, value, dimensions, timestamp);
    }
}
