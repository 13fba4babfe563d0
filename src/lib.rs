//! Configuration-driven metric mapping
//!
//! This crate converts heterogeneous third-party measurements (scraped endpoint samples,
//! nested JSON documents, label sets) into a normalized metric model: a dotted metric name,
//! a numeric value, a classification (gauge or rate) and a flat set of dimensions.
//!
//! # Module Organization
//!
//! - [`config`]: Operator-facing configuration model and loading
//! - [`names`]: Canonical metric name normalization
//! - [`dimensions`]: Label-to-dimension rules and value sanitizing
//! - [`metrics`]: Classification results, input trees, measurements and sinks
//! - [`engine`]: Per-instance mapping state and the push entry points
//!
//! # Example
//!
//! ```
//! use metric_mapper::config::CheckConfig;
//! use metric_mapper::dimensions::Labels;
//! use metric_mapper::engine::{MetricMapper, PushOptions};
//! use metric_mapper::metrics::MeasurementBuffer;
//!
//! let config: CheckConfig = serde_yaml::from_str(
//!     r"
//! instances:
//!   - name: local
//!     mapping:
//!       gauges: ['(.*Usage)\.stats\.(total)']
//!       dimensions:
//!         hostname: host
//! ",
//! )
//! .unwrap();
//!
//! let mapper = MetricMapper::new(&config.init_config);
//! let mut states = mapper.configure_all(&config).unwrap();
//! let mut sink = MeasurementBuffer::new();
//!
//! let labels = Labels::from([("host".to_string(), "node-1".to_string())]);
//! let outcome = mapper.push_metric(&mut states[0], &mut sink, "DiskUsage.stats.total", 42.0, &labels, &PushOptions::default());
//!
//! assert!(outcome.is_accepted());
//! assert_eq!(sink.measurements()[0].name, "disk_usage_total");
//! ```

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod config;
pub mod dimensions;
pub mod engine;
pub mod metrics;
pub mod names;
