//! Operator-facing configuration
//!
//! A check configuration holds engine-wide settings (`init_config`) and one entry per monitored
//! instance. Each instance carries a `mapping` block declaring which input metrics are of
//! interest, how they are classified, and how input labels become output dimensions:
//!
//! ```yaml
//! init_config:
//!   prefix: kubernetes
//! instances:
//!   - name: cadvisor
//!     max_depth: 10
//!     mapping:
//!       gauges: ['.*_avg', '.*_max']
//!       rates: ['io.*']
//!       dimensions:
//!         pod_name: io.kubernetes.pod.name
//!         pod_basename:
//!           source_key: label_name
//!           regex: 'k8s_.*_.*\._(.*)_[0-9a-z\-]*'
//!           separator: '-'
//!       groups:
//!         engine:
//!           gauges: ['engine_(.*)']
//!           dimensions:
//!             zone: zone
//! ```
//!
//! Regular expressions are compiled while the configuration is deserialized. Mapping keys keep
//! the order in which they were written, because dimension rules and groups are evaluated in
//! declaration order.

#[expect(clippy::module_inception, reason = "The check configuration type lives in config::config")]
mod config;
mod mapping;
mod ordered_map;
mod pattern;

pub use config::{CheckConfig, InitConfig};
pub use mapping::{DEFAULT_MAX_DEPTH, DimensionRuleSpec, DimensionSpec, GroupConfig, InstanceConfig, MappingConfig};
pub use ordered_map::OrderedMap;
pub use pattern::{MATCH_ALL_PATTERN, Pattern};
