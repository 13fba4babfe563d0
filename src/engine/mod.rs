//! The mapping engine
//!
//! [`MetricMapper`] compiles instance configurations into [`InstanceMapping`] values and drives
//! measurements through them:
//!
//! 1. the group of a metric is taken from [`PushOptions`] or resolved from its name,
//! 2. the name is classified as gauge, rate or skipped (cached per scope),
//! 3. labels are mapped to dimensions, which may filter the measurement,
//! 4. the result is handed to a [`MetricSink`](crate::metrics::MetricSink).
//!
//! Nested documents are flattened by [`MetricMapper::push_metric_tree`].

mod instance;
mod mapper;
mod push_options;
mod push_outcome;
mod scope;
mod tree_walker;

pub use instance::{CacheStats, InstanceMapping};
pub use mapper::MetricMapper;
pub use push_options::PushOptions;
pub use push_outcome::PushOutcome;
pub use scope::Scope;
