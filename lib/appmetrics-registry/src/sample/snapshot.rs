/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// A read-only copy of a sample, with the kept values sorted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSnapshot {
    count: i64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    pub fn new(count: i64, mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        SampleSnapshot { count, values }
    }

    /// The number of updates the sample has seen.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// The number of values kept in the reservoir.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn min(&self) -> i64 {
        self.values.first().copied().unwrap_or_default()
    }

    pub fn max(&self) -> i64 {
        self.values.last().copied().unwrap_or_default()
    }

    pub fn sum(&self) -> i64 {
        self.values.iter().fold(0i64, |acc, v| acc.wrapping_add(*v))
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum() as f64 / self.values.len() as f64
    }

    pub fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let sum = self
            .values
            .iter()
            .map(|v| {
                let d = *v as f64 - mean;
                d * d
            })
            .sum::<f64>();
        sum / self.values.len() as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn percentile(&self, p: f64) -> f64 {
        percentile_of_sorted(&self.values, p)
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        ps.iter()
            .map(|p| percentile_of_sorted(&self.values, *p))
            .collect()
    }
}

fn percentile_of_sorted(values: &[i64], p: f64) -> f64 {
    let size = values.len();
    if size == 0 {
        return 0.0;
    }

    let pos = p * (size + 1) as f64;
    if pos < 1.0 {
        values[0] as f64
    } else if pos >= size as f64 {
        values[size - 1] as f64
    } else {
        let lower = values[pos as usize - 1] as f64;
        let upper = values[pos as usize] as f64;
        lower + (pos - pos.floor()) * (upper - lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_float_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn empty() {
        let s = SampleSnapshot::default();
        assert_eq!(s.count(), 0);
        assert_eq!(s.min(), 0);
        assert_eq!(s.max(), 0);
        assert_eq!(s.sum(), 0);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.std_dev(), 0.0);
        assert_eq!(s.percentile(0.5), 0.0);
    }

    #[test]
    fn statistics() {
        let data = vec![
            10, 9, 15, 12, 20, 28, 8, 12, 20, 16, 17, 27, 11, 10, 20, 21, 19, 18, 10, 26,
        ];
        let s = SampleSnapshot::new(20, data);
        assert_eq!(s.count(), 20);
        assert_eq!(s.size(), 20);
        assert_eq!(s.min(), 8);
        assert_eq!(s.max(), 28);
        assert_eq!(s.sum(), 329);
        assert_float_eq(s.mean(), 16.45);
        assert_float_eq(s.percentile(0.5), 16.5);
        assert_float_eq(s.percentile(0.95), 27.95);
    }

    #[test]
    fn percentile() {
        let s = SampleSnapshot::new(5, vec![40, 0, 20, 30, 10]);
        // pos = p * 6
        assert_float_eq(s.percentile(0.1), 0.0);
        assert_float_eq(s.percentile(0.25), 5.0);
        assert_float_eq(s.percentile(0.5), 20.0);
        assert_float_eq(s.percentile(0.75), 35.0);
        assert_float_eq(s.percentile(0.99), 40.0);
        assert_eq!(s.percentiles(&[0.5, 1.0]), vec![20.0, 40.0]);
    }

    #[test]
    fn variance() {
        let s = SampleSnapshot::new(4, vec![2, 4, 4, 6]);
        assert_float_eq(s.mean(), 4.0);
        assert_float_eq(s.variance(), 2.0);
        assert_float_eq(s.std_dev(), 2.0f64.sqrt());
    }
}
