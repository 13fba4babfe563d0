use super::MetricKind;
use std::sync::Arc;

/// The classification of one raw metric name: its kind and its normalized output name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub kind: MetricKind,
    pub output_name: Arc<str>,
}

impl MetricSpec {
    #[must_use]
    pub fn new(kind: MetricKind, output_name: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            output_name: output_name.into(),
        }
    }

    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self.kind, MetricKind::Skip)
    }
}
