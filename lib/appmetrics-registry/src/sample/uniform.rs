/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Vitter's Algorithm R: every value seen has the same chance of being kept.
#[derive(Debug)]
pub struct UniformSample {
    reservoir_size: usize,
    count: i64,
    values: Vec<i64>,
}

impl UniformSample {
    pub fn new(reservoir_size: usize) -> Self {
        UniformSample {
            reservoir_size,
            count: 0,
            values: Vec::with_capacity(reservoir_size.min(1024)),
        }
    }

    pub fn reservoir_size(&self) -> usize {
        self.reservoir_size
    }

    pub fn update(&mut self, v: i64) {
        self.count += 1;
        if self.values.len() < self.reservoir_size {
            self.values.push(v);
        } else {
            let r = fastrand::u64(0..self.count as u64) as usize;
            if r < self.values.len() {
                self.values[r] = v;
            }
        }
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.values.clear();
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_capacity() {
        let mut s = UniformSample::new(100);
        for i in 0..10 {
            s.update(i);
        }
        assert_eq!(s.count(), 10);
        assert_eq!(s.values(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn over_capacity() {
        let mut s = UniformSample::new(100);
        for i in 0..1000 {
            s.update(i);
        }
        assert_eq!(s.count(), 1000);
        assert_eq!(s.values().len(), 100);
        assert!(s.values().iter().all(|v| (0..1000).contains(v)));
    }

    #[test]
    fn clear() {
        let mut s = UniformSample::new(10);
        s.update(1);
        s.clear();
        assert_eq!(s.count(), 0);
        assert!(s.values().is_empty());
    }

    #[test]
    fn zero_capacity() {
        let mut s = UniformSample::new(0);
        s.update(1);
        s.update(2);
        assert_eq!(s.count(), 2);
        assert!(s.values().is_empty());
    }
}
