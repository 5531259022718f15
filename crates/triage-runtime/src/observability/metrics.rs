//! Metrics collection and reporting

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Metric names recorded by the engine
pub mod names {
    pub const SESSIONS_STARTED: &str = "sessions_started";
    pub const ANSWERS_ACCEPTED: &str = "answers_accepted";
    pub const ANSWERS_REJECTED: &str = "answers_rejected";
    pub const SESSIONS_COMPLETED: &str = "sessions_completed";
    pub const EMERGENCIES: &str = "emergencies";
    pub const BATCH_EVALUATIONS: &str = "batch_evaluations";
    pub const SUBMIT_ANSWER: &str = "submit_answer";
}

// A poisoned lock only means another thread panicked mid-update; the data is
// still usable.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Counter metric
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Increment the counter
    pub fn inc(&self) {
        self.add(1);
    }

    /// Add a value to the counter
    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Reset the counter
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// Samples kept by a histogram for percentiles
pub const HISTOGRAM_WINDOW: usize = 1024;

#[derive(Debug, Default)]
struct HistogramState {
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    /// Most recent observations, oldest first
    recent: VecDeque<f64>,
}

/// Histogram metric for tracking distributions
///
/// Count, sum, min and max cover every observation; percentiles are computed
/// over the last [`HISTOGRAM_WINDOW`] observations only.
#[derive(Debug)]
pub struct Histogram {
    name: String,
    state: RwLock<HistogramState>,
}

impl Histogram {
    /// Create a new histogram
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(HistogramState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observe a value
    pub fn observe(&self, value: f64) {
        let mut guard = write(&self.state);
        let state = &mut *guard;
        state.count += 1;
        state.sum += value;
        state.min = Some(state.min.map_or(value, |min| min.min(value)));
        state.max = Some(state.max.map_or(value, |max| max.max(value)));

        if state.recent.len() == HISTOGRAM_WINDOW {
            state.recent.pop_front();
        }
        state.recent.push_back(value);
    }

    /// Observe a duration in seconds
    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    /// Get count of observations
    pub fn count(&self) -> usize {
        read(&self.state).count as usize
    }

    /// Get sum of all values
    pub fn sum(&self) -> f64 {
        read(&self.state).sum
    }

    /// Get average value
    pub fn avg(&self) -> f64 {
        let state = read(&self.state);
        if state.count == 0 {
            0.0
        } else {
            state.sum / state.count as f64
        }
    }

    pub fn min(&self) -> Option<f64> {
        read(&self.state).min
    }

    pub fn max(&self) -> Option<f64> {
        read(&self.state).max
    }

    /// Number of observations retained for percentiles
    pub fn window_len(&self) -> usize {
        read(&self.state).recent.len()
    }

    /// Get percentile (0-100) of the recent window
    pub fn percentile(&self, p: f64) -> f64 {
        let mut values: Vec<f64> = read(&self.state).recent.iter().copied().collect();
        if values.is_empty() {
            return 0.0;
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let index = ((p.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64).round() as usize;
        values[index]
    }

    /// Reset the histogram
    pub fn reset(&self) {
        *write(&self.state) = HistogramState::default();
    }
}

/// Metrics trait
pub trait Metrics: Send + Sync {
    /// Get (or create) a counter
    fn counter(&self, name: &str) -> Arc<Counter>;

    /// Get (or create) a histogram
    fn histogram(&self, name: &str) -> Arc<Histogram>;

    /// Record execution time of an operation
    fn record_execution_time(&self, operation: &str, duration: Duration);

    /// Record an error by kind
    fn record_error(&self, error_type: &str);
}

/// Point-in-time copy of the engine counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub sessions_started: u64,
    pub answers_accepted: u64,
    pub answers_rejected: u64,
    pub sessions_completed: u64,
    pub emergencies: u64,
    pub batch_evaluations: u64,
    /// Number of timed `submit_answer` calls
    pub submit_count: usize,
    /// Mean `submit_answer` latency in seconds
    pub submit_avg_seconds: f64,
    /// Error counts by kind
    pub errors: HashMap<String, u64>,
}

/// Metrics collector
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: RwLock<HashMap<String, Arc<Counter>>>,
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all counter names
    pub fn counter_names(&self) -> Vec<String> {
        read(&self.counters).keys().cloned().collect()
    }

    /// Get all histogram names
    pub fn histogram_names(&self) -> Vec<String> {
        read(&self.histograms).keys().cloned().collect()
    }

    /// Copy the engine counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let submit = self.histogram(&format!("{}_duration", names::SUBMIT_ANSWER));
        let errors = read(&self.counters)
            .iter()
            .filter_map(|(name, counter)| {
                name.strip_prefix("errors_")
                    .map(|kind| (kind.to_string(), counter.get()))
            })
            .collect();

        MetricsSnapshot {
            sessions_started: self.counter(names::SESSIONS_STARTED).get(),
            answers_accepted: self.counter(names::ANSWERS_ACCEPTED).get(),
            answers_rejected: self.counter(names::ANSWERS_REJECTED).get(),
            sessions_completed: self.counter(names::SESSIONS_COMPLETED).get(),
            emergencies: self.counter(names::EMERGENCIES).get(),
            batch_evaluations: self.counter(names::BATCH_EVALUATIONS).get(),
            submit_count: submit.count(),
            submit_avg_seconds: submit.avg(),
            errors,
        }
    }

    /// Reset all metrics
    pub fn reset_all(&self) {
        for counter in read(&self.counters).values() {
            counter.reset();
        }
        for histogram in read(&self.histograms).values() {
            histogram.reset();
        }
    }
}

impl Metrics for MetricsCollector {
    fn counter(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = read(&self.counters).get(name) {
            return counter.clone();
        }
        write(&self.counters)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Counter::new(name)))
            .clone()
    }

    fn histogram(&self, name: &str) -> Arc<Histogram> {
        if let Some(histogram) = read(&self.histograms).get(name) {
            return histogram.clone();
        }
        write(&self.histograms)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Histogram::new(name)))
            .clone()
    }

    fn record_execution_time(&self, operation: &str, duration: Duration) {
        self.histogram(&format!("{}_duration", operation))
            .observe_duration(duration);
    }

    fn record_error(&self, error_type: &str) {
        self.counter(&format!("errors_{}", error_type)).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new("answers");

        assert_eq!(counter.get(), 0);

        counter.inc();
        assert_eq!(counter.get(), 1);

        counter.add(5);
        assert_eq!(counter.get(), 6);

        counter.reset();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_histogram() {
        let histogram = Histogram::new("latency");

        histogram.observe(10.0);
        histogram.observe(20.0);
        histogram.observe(30.0);

        assert_eq!(histogram.count(), 3);
        assert_eq!(histogram.sum(), 60.0);
        assert_eq!(histogram.avg(), 20.0);
    }

    #[test]
    fn test_histogram_memory_is_bounded() {
        let collector = MetricsCollector::new();
        for i in 0..(HISTOGRAM_WINDOW * 10) {
            collector.record_execution_time(names::SUBMIT_ANSWER, Duration::from_micros(i as u64));
        }

        let histogram = collector.histogram("submit_answer_duration");
        assert_eq!(histogram.count(), HISTOGRAM_WINDOW * 10);
        assert_eq!(histogram.window_len(), HISTOGRAM_WINDOW);
        assert_eq!(histogram.min(), Some(0.0));
        assert!(histogram.max().unwrap() > histogram.percentile(0.0));

        histogram.reset();
        assert_eq!(histogram.count(), 0);
        assert_eq!(histogram.window_len(), 0);
        assert_eq!(histogram.min(), None);
    }

    #[test]
    fn test_histogram_percentile() {
        let histogram = Histogram::new("latency");
        assert_eq!(histogram.percentile(50.0), 0.0);

        for i in 1..=100 {
            histogram.observe(i as f64);
        }

        assert!((histogram.percentile(50.0) - 50.5).abs() < 2.0);
        assert!((histogram.percentile(95.0) - 95.0).abs() < 2.0);
    }

    #[test]
    fn test_collector_reuses_metrics() {
        let collector = MetricsCollector::new();

        collector.counter(names::EMERGENCIES).inc();
        collector.counter(names::EMERGENCIES).inc();
        assert_eq!(collector.counter(names::EMERGENCIES).get(), 2);
        assert_eq!(collector.counter_names(), vec![names::EMERGENCIES.to_string()]);
    }

    #[test]
    fn test_snapshot() {
        let collector = MetricsCollector::new();

        collector.counter(names::SESSIONS_STARTED).inc();
        collector.counter(names::ANSWERS_ACCEPTED).add(3);
        collector.record_error("invalid_answer");
        collector.record_execution_time(names::SUBMIT_ANSWER, Duration::from_millis(4));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.answers_accepted, 3);
        assert_eq!(snapshot.submit_count, 1);
        assert_eq!(snapshot.errors.get("invalid_answer"), Some(&1));
    }

    #[test]
    fn test_reset_all() {
        let collector = MetricsCollector::new();

        collector.counter("c1").inc();
        collector.histogram("h1").observe(10.0);

        collector.reset_all();

        assert_eq!(collector.counter("c1").get(), 0);
        assert_eq!(collector.histogram("h1").count(), 0);
    }
}
