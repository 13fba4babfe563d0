//! Label-to-dimension mapping
//!
//! Input measurements carry labels (`kubernetes_pod_name="web-0"`); output metrics carry
//! dimensions. A [`DimensionRule`] decides whether a label value is acceptable and how it is
//! rewritten, and [`sanitize_dimension_value`] removes characters the metrics backend rejects.

mod dimension_rule;
mod sanitize;

use std::collections::BTreeMap;

pub use dimension_rule::{DEFAULT_SEPARATOR, DimensionRule};
pub use sanitize::{MAX_DIMENSION_VALUE_LEN, sanitize_dimension_value};

/// Labels attached to an input measurement
pub type Labels = BTreeMap<String, String>;

/// Dimensions attached to an output measurement
pub type Dimensions = BTreeMap<String, String>;

/// Label name holding the position of an element in an input array
pub const INDEX_LABEL: &str = "index";
