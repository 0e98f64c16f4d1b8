//! Online stability detectors for scalar statistics.
//!
//! A monitor is fed one observation at a time and answers whether the series has settled. Nothing
//! in the collector tree consults a monitor on its own; wrap a collector in a
//! [`MonitoredCollector`] to make its [`StatCollector::is_satisfied`] follow one of its fields.

use std::collections::VecDeque;

use bamstats_core::models::{AlignmentRecord, ReferenceTable};
use serde_json::Value;

use crate::snapshot::Snapshot;
use crate::tree::StatCollector;

pub trait ConvergenceMonitor {
    fn add_value(&mut self, value: f64);

    fn is_satisfied(&self) -> bool;
}

///
/// Satisfied once the last `window` observations have a standard deviation below `threshold`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct StandardDeviationMonitor {
    values: VecDeque<f64>,
    window: usize,
    threshold: f64,
}

impl StandardDeviationMonitor {
    pub fn new(window: usize, threshold: f64) -> Self {
        let window = window.max(1);
        StandardDeviationMonitor {
            values: VecDeque::with_capacity(window),
            window,
            threshold,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    ///
    /// Standard deviation of the full window, or `None` until the window has filled.
    ///
    pub fn std_dev(&self) -> Option<f64> {
        if self.values.len() < self.window {
            return None;
        }

        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        let squares = self
            .values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>();

        Some((squares / n).sqrt())
    }
}

impl ConvergenceMonitor for StandardDeviationMonitor {
    fn add_value(&mut self, value: f64) {
        if self.values.len() == self.window {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    fn is_satisfied(&self) -> bool {
        self.std_dev()
            .is_some_and(|std_dev| std_dev < self.threshold)
    }
}

///
/// Satisfied when the latest change, relative to the running average, falls below `threshold`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaAverageRatioMonitor {
    total: f64,
    last: f64,
    delta: f64,
    count: u64,
    threshold: f64,
}

impl DeltaAverageRatioMonitor {
    pub fn new(threshold: f64) -> Self {
        DeltaAverageRatioMonitor {
            total: 0.0,
            last: 0.0,
            delta: 0.0,
            count: 0,
            threshold,
        }
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }

    ///
    /// `delta / average`, when both are defined and the ratio is finite.
    ///
    pub fn ratio(&self) -> Option<f64> {
        self.average()
            .map(|average| self.delta / average)
            .filter(|ratio| ratio.is_finite())
    }
}

impl ConvergenceMonitor for DeltaAverageRatioMonitor {
    fn add_value(&mut self, value: f64) {
        self.total += value;
        self.delta = value - self.last;
        self.last = value;
        self.count += 1;
    }

    fn is_satisfied(&self) -> bool {
        self.ratio().is_some_and(|ratio| ratio < self.threshold)
    }
}

///
/// The available monitoring strategies.
///
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeMonitor {
    StandardDeviation(StandardDeviationMonitor),
    DeltaAverageRatio(DeltaAverageRatioMonitor),
}

impl ConvergenceMonitor for ChangeMonitor {
    fn add_value(&mut self, value: f64) {
        match self {
            ChangeMonitor::StandardDeviation(monitor) => monitor.add_value(value),
            ChangeMonitor::DeltaAverageRatio(monitor) => monitor.add_value(value),
        }
    }

    fn is_satisfied(&self) -> bool {
        match self {
            ChangeMonitor::StandardDeviation(monitor) => monitor.is_satisfied(),
            ChangeMonitor::DeltaAverageRatio(monitor) => monitor.is_satisfied(),
        }
    }
}

impl From<StandardDeviationMonitor> for ChangeMonitor {
    fn from(monitor: StandardDeviationMonitor) -> Self {
        ChangeMonitor::StandardDeviation(monitor)
    }
}

impl From<DeltaAverageRatioMonitor> for ChangeMonitor {
    fn from(monitor: DeltaAverageRatioMonitor) -> Self {
        ChangeMonitor::DeltaAverageRatio(monitor)
    }
}

///
/// Wraps a collector and reports it satisfied once `key` in its snapshot output has stabilized.
///
/// The monitored value is sampled once per snapshot, right after the inner collector writes it.
///
pub struct MonitoredCollector<C> {
    inner: C,
    key: String,
    monitor: ChangeMonitor,
}

impl<C: StatCollector> MonitoredCollector<C> {
    pub fn new(inner: C, key: impl Into<String>, monitor: impl Into<ChangeMonitor>) -> Self {
        MonitoredCollector {
            inner,
            key: key.into(),
            monitor: monitor.into(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn monitor(&self) -> &ChangeMonitor {
        &self.monitor
    }
}

impl<C: StatCollector> StatCollector for MonitoredCollector<C> {
    fn process_alignment(&mut self, record: &AlignmentRecord, refs: &ReferenceTable) {
        self.inner.process_alignment(record, refs);
    }

    fn append_snapshot(&mut self, snapshot: &mut Snapshot) {
        self.inner.append_snapshot(snapshot);
        if let Some(value) = snapshot.get(&self.key).and_then(Value::as_f64) {
            self.monitor.add_value(value);
        }
    }

    fn is_satisfied(&self) -> bool {
        self.monitor.is_satisfied()
    }
}
