/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::{Duration, Instant};

use crate::{Histogram, HistogramSnapshot, Meter, MeterSnapshot, Sample, SampleKind};

/// A histogram of durations in nanoseconds, plus a meter of their rate.
#[derive(Clone, Debug)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    pub fn new(sample: Sample) -> Self {
        Timer {
            histogram: Histogram::new(sample),
            meter: Meter::new(),
        }
    }

    pub fn update(&self, d: Duration) {
        let nanos = i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark(1);
    }

    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed());
    }

    /// Runs `f` and records how long it took.
    pub fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let r = f();
        self.update_since(start);
        r
    }

    pub fn count(&self) -> i64 {
        self.histogram.count()
    }

    pub fn sample_kind(&self) -> SampleKind {
        self.histogram.sample_kind()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            histogram: self.histogram.snapshot(),
            meter: self.meter.snapshot(),
        }
    }

    pub fn stop(&self) {
        self.meter.stop();
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        self.histogram.same_as(&other.histogram)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimerSnapshot {
    histogram: HistogramSnapshot,
    meter: MeterSnapshot,
}

impl TimerSnapshot {
    /// Durations in nanoseconds.
    pub fn histogram(&self) -> &HistogramSnapshot {
        &self.histogram
    }

    pub fn meter(&self) -> &MeterSnapshot {
        &self.meter
    }

    pub fn count(&self) -> i64 {
        self.histogram.count()
    }

    pub fn min(&self) -> i64 {
        self.histogram.min()
    }

    pub fn max(&self) -> i64 {
        self.histogram.max()
    }

    pub fn sum(&self) -> i64 {
        self.histogram.sum()
    }

    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    pub fn percentile(&self, p: f64) -> f64 {
        self.histogram.percentile(p)
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        self.histogram.percentiles(ps)
    }

    pub fn rate1(&self) -> f64 {
        self.meter.rate1()
    }

    pub fn rate5(&self) -> f64 {
        self.meter.rate5()
    }

    pub fn rate15(&self) -> f64 {
        self.meter.rate15()
    }

    pub fn rate_mean(&self) -> f64 {
        self.meter.rate_mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update() {
        let t = Timer::new(Sample::uniform(100));
        for ms in [0, 2, 4, 6, 8] {
            t.update(Duration::from_millis(ms));
        }
        let s = t.snapshot();
        assert_eq!(s.count(), 5);
        assert_eq!(s.meter().count(), 5);
        assert_eq!(s.min(), 0);
        assert_eq!(s.max(), 8_000_000);
        assert_eq!(s.sum(), 20_000_000);
        assert_eq!(s.percentile(0.5), 4_000_000.0);
    }

    #[test]
    fn time() {
        let t = Timer::new(Sample::exp_decay(1028, 0.015));
        let v = t.time(|| 42);
        assert_eq!(v, 42);
        assert_eq!(t.count(), 1);
        assert!(t.snapshot().max() >= 0);
    }

    #[test]
    fn stop() {
        let t = Timer::new(Sample::uniform(10));
        t.update(Duration::from_millis(1));
        t.stop();
        t.update(Duration::from_millis(1));
        let s = t.snapshot();
        assert_eq!(s.count(), 2);
        assert_eq!(s.meter().count(), 1);
    }
}
