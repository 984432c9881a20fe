/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Sample, SampleKind, SampleSnapshot};

pub type HistogramSnapshot = SampleSnapshot;

/// A distribution of i64 values kept in a reservoir sample.
#[derive(Clone, Debug)]
pub struct Histogram {
    sample: Arc<Mutex<Sample>>,
}

impl Histogram {
    pub fn new(sample: Sample) -> Self {
        Histogram {
            sample: Arc::new(Mutex::new(sample)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sample> {
        self.sample.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update(&self, v: i64) {
        self.lock().update(v);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn count(&self) -> i64 {
        self.lock().count()
    }

    pub fn sample_kind(&self) -> SampleKind {
        self.lock().kind()
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        self.lock().snapshot()
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sample, &other.sample)
    }
}
