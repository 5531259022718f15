//! Observability module
//!
//! In-process counters and latency histograms for the traversal engine.

pub mod metrics;

pub use metrics::{names, Counter, Histogram, Metrics, MetricsCollector, MetricsSnapshot};
