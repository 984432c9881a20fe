/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::time::Instant;

mod uniform;
pub use uniform::UniformSample;

mod expdecay;
pub use expdecay::ExpDecaySample;

mod snapshot;
pub use snapshot::SampleSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Uniform,
    ExpDecay,
}

impl SampleKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SampleKind::Uniform => "uniform",
            SampleKind::ExpDecay => "expdecay",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded reservoir of observed values.
#[derive(Debug)]
pub enum Sample {
    Uniform(UniformSample),
    ExpDecay(ExpDecaySample),
}

impl Sample {
    pub fn uniform(reservoir_size: usize) -> Self {
        Sample::Uniform(UniformSample::new(reservoir_size))
    }

    pub fn exp_decay(reservoir_size: usize, alpha: f64) -> Self {
        Sample::ExpDecay(ExpDecaySample::new(reservoir_size, alpha))
    }

    pub fn kind(&self) -> SampleKind {
        match self {
            Sample::Uniform(_) => SampleKind::Uniform,
            Sample::ExpDecay(_) => SampleKind::ExpDecay,
        }
    }

    pub fn update(&mut self, v: i64) {
        match self {
            Sample::Uniform(s) => s.update(v),
            Sample::ExpDecay(s) => s.update_at(Instant::now(), v),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Sample::Uniform(s) => s.clear(),
            Sample::ExpDecay(s) => s.clear(),
        }
    }

    /// The number of updates since the last clear, not the number of values kept.
    pub fn count(&self) -> i64 {
        match self {
            Sample::Uniform(s) => s.count(),
            Sample::ExpDecay(s) => s.count(),
        }
    }

    pub fn snapshot(&self) -> SampleSnapshot {
        match self {
            Sample::Uniform(s) => SampleSnapshot::new(s.count(), s.values().to_vec()),
            Sample::ExpDecay(s) => SampleSnapshot::new(s.count(), s.values()),
        }
    }
}
