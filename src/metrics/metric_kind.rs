use serde::{Deserialize, Serialize};
use strum::Display;

/// How an output metric is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    /// A point-in-time value
    Gauge,

    /// A monotonically increasing counter, reported as its rate of change
    Rate,

    /// Not configured for reporting
    Skip,
}
