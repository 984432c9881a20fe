/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Clone, Debug, Default)]
pub struct Counter {
    inner: Arc<AtomicI64>,
}

impl Counter {
    pub fn new() -> Self {
        Counter::default()
    }

    pub fn inc(&self, n: i64) {
        self.inner.fetch_add(n, Ordering::Relaxed);
    }

    pub fn dec(&self, n: i64) {
        self.inner.fetch_sub(n, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.inner.store(0, Ordering::Relaxed);
    }

    pub fn count(&self) -> i64 {
        self.inner.load(Ordering::Relaxed)
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inc_dec() {
        let c = Counter::new();
        c.inc(5);
        c.inc(1);
        c.inc(2);
        assert_eq!(c.count(), 8);
        c.dec(3);
        assert_eq!(c.count(), 5);
        c.clear();
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn shared() {
        let c = Counter::new();
        let c2 = c.clone();
        c2.inc(7);
        assert_eq!(c.count(), 7);
        assert!(c.same_as(&c2));
        assert!(!c.same_as(&Counter::new()));
    }
}
