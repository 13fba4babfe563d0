//! The metric model shared by the engine and its callers
//!
//! - [`MetricKind`] and [`MetricSpec`] describe how a raw metric name was classified.
//! - [`MetricTree`] is the nested input document walked by the tree entry point.
//! - [`MetricSink`] receives output measurements; [`MeasurementBuffer`] collects them in memory.

mod measurement;
mod metric_kind;
mod metric_spec;
mod metric_tree;
mod sink;

pub use measurement::Measurement;
pub use metric_kind::MetricKind;
pub use metric_spec::MetricSpec;
pub use metric_tree::MetricTree;
pub use sink::{MeasurementBuffer, MetricSink};
