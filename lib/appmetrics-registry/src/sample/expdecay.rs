/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

const RESCALE_THRESHOLD: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct WeightedValue {
    k: f64,
    v: i64,
}

impl PartialEq for WeightedValue {
    fn eq(&self, other: &Self) -> bool {
        self.k.total_cmp(&other.k).is_eq()
    }
}

impl Eq for WeightedValue {}

impl PartialOrd for WeightedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeightedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k.total_cmp(&other.k)
    }
}

/// Forward-decaying priority reservoir, biased towards recent values.
///
/// See Cormode et al. "Forward Decay: A Practical Time Decay Model for
/// Streaming Systems".
#[derive(Debug)]
pub struct ExpDecaySample {
    alpha: f64,
    reservoir_size: usize,
    count: i64,
    t0: Instant,
    t1: Instant,
    // min-heap on priority
    values: BinaryHeap<Reverse<WeightedValue>>,
}

impl ExpDecaySample {
    pub fn new(reservoir_size: usize, alpha: f64) -> Self {
        let now = Instant::now();
        ExpDecaySample {
            alpha,
            reservoir_size,
            count: 0,
            t0: now,
            t1: now + RESCALE_THRESHOLD,
            values: BinaryHeap::with_capacity(reservoir_size.min(1024)),
        }
    }

    pub fn reservoir_size(&self) -> usize {
        self.reservoir_size
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn update_at(&mut self, t: Instant, v: i64) {
        self.count += 1;
        if self.reservoir_size == 0 {
            return;
        }

        if self.values.len() >= self.reservoir_size {
            self.values.pop();
        }
        let elapsed = t.saturating_duration_since(self.t0).as_secs_f64();
        // fastrand::f64 is in [0, 1), keep the divisor away from zero
        let k = (elapsed * self.alpha).exp() / (1.0 - fastrand::f64());
        self.values.push(Reverse(WeightedValue { k, v }));

        if t > self.t1 {
            self.rescale(t);
        }
    }

    fn rescale(&mut self, now: Instant) {
        let old_t0 = self.t0;
        self.t0 = now;
        self.t1 = now + RESCALE_THRESHOLD;
        let factor = (-self.alpha * now.saturating_duration_since(old_t0).as_secs_f64()).exp();
        let values = std::mem::take(&mut self.values);
        self.values = values
            .into_iter()
            .map(|Reverse(w)| {
                Reverse(WeightedValue {
                    k: w.k * factor,
                    v: w.v,
                })
            })
            .collect();
    }

    pub fn clear(&mut self) {
        let now = Instant::now();
        self.count = 0;
        self.t0 = now;
        self.t1 = now + RESCALE_THRESHOLD;
        self.values.clear();
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn values(&self) -> Vec<i64> {
        self.values.iter().map(|Reverse(w)| w.v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_capacity() {
        let mut s = ExpDecaySample::new(100, 0.99);
        let now = Instant::now();
        for i in 0..10 {
            s.update_at(now, i);
        }
        assert_eq!(s.count(), 10);
        let mut values = s.values();
        values.sort_unstable();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn over_capacity() {
        let mut s = ExpDecaySample::new(100, 0.99);
        let now = Instant::now();
        for i in 0..1000 {
            s.update_at(now, i);
        }
        assert_eq!(s.count(), 1000);
        let values = s.values();
        assert_eq!(values.len(), 100);
        assert!(values.iter().all(|v| (0..1000).contains(v)));
    }

    #[test]
    fn rescale_keeps_values() {
        let mut s = ExpDecaySample::new(10, 0.015);
        let start = Instant::now();
        s.update_at(start, 1);
        s.update_at(start + RESCALE_THRESHOLD + Duration::from_secs(1), 2);
        assert_eq!(s.t0, start + RESCALE_THRESHOLD + Duration::from_secs(1));
        let mut values = s.values();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
        assert!(s.values.iter().all(|Reverse(w)| w.k.is_finite()));
    }

    #[test]
    fn recent_values_win() {
        let mut s = ExpDecaySample::new(10, 0.5);
        let start = Instant::now();
        for _ in 0..10 {
            s.update_at(start, 1);
        }
        // priorities grow with exp(0.5 * 60) so later values push out older ones
        let later = start + Duration::from_secs(60);
        for _ in 0..10 {
            s.update_at(later, 2);
        }
        assert!(s.values().iter().all(|v| *v == 2));
    }

    #[test]
    fn zero_capacity() {
        let mut s = ExpDecaySample::new(0, 0.015);
        s.update_at(Instant::now(), 1);
        assert_eq!(s.count(), 1);
        assert!(s.values().is_empty());
    }
}
