use crate::dimensions::Dimensions;
use chrono::{DateTime, Utc};

/// Optional parameters of a push
///
/// ```
/// use metric_mapper::dimensions::Dimensions;
/// use metric_mapper::engine::PushOptions;
///
/// let fixed = Dimensions::from([("service".to_string(), "dns".to_string())]);
/// let options = PushOptions::new().with_group("bind").with_fixed_dimensions(&fixed);
/// assert_eq!(options.group, Some("bind"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PushOptions<'a> {
    /// Group to evaluate the metric in; resolved from the metric name when `None`
    pub group: Option<&'a str>,

    /// Time of the measurement, handed to the sink unchanged
    pub timestamp: Option<DateTime<Utc>>,

    /// Dimensions that override whatever the mapping produced
    pub fixed_dimensions: Option<&'a Dimensions>,

    /// Dimensions that mapped labels may not overwrite
    pub default_dimensions: Option<&'a Dimensions>,

    /// Recursion limit for tree pushes, overriding the instance's configured `max_depth`
    pub max_depth: Option<usize>,
}

impl<'a> PushOptions<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group: None,
            timestamp: None,
            fixed_dimensions: None,
            default_dimensions: None,
            max_depth: None,
        }
    }

    #[must_use]
    pub const fn with_group(mut self, group: &'a str) -> Self {
        self.group = Some(group);
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub const fn with_fixed_dimensions(mut self, dimensions: &'a Dimensions) -> Self {
        self.fixed_dimensions = Some(dimensions);
        self
    }

    #[must_use]
    pub const fn with_default_dimensions(mut self, dimensions: &'a Dimensions) -> Self {
        self.default_dimensions = Some(dimensions);
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
