use super::MetricKind;
use crate::dimensions::Dimensions;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One emitted output measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub kind: MetricKind,
    pub name: String,
    pub value: f64,
    pub dimensions: Dimensions,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
