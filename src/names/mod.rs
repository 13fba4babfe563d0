//! Canonical metric names
//!
//! Every mapped metric name produced by the engine goes through [`normalize_metric_name`],
//! which turns arbitrary third-party names (`DiskUsage`, `io.kubernetes/cpu`, ...) into
//! lower-case, underscore-separated identifiers.

mod normalize;

pub use normalize::normalize_metric_name;
