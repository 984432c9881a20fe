/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use portable_atomic::AtomicF64;

#[derive(Clone, Debug, Default)]
pub struct Gauge {
    inner: Arc<AtomicI64>,
}

impl Gauge {
    pub fn new() -> Self {
        Gauge::default()
    }

    pub fn update(&self, v: i64) {
        self.inner.store(v, Ordering::Relaxed);
    }

    pub fn inc(&self, n: i64) {
        self.inner.fetch_add(n, Ordering::Relaxed);
    }

    pub fn dec(&self, n: i64) {
        self.inner.fetch_sub(n, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.inner.load(Ordering::Relaxed)
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Clone, Debug, Default)]
pub struct GaugeFloat64 {
    inner: Arc<AtomicF64>,
}

impl GaugeFloat64 {
    pub fn new() -> Self {
        GaugeFloat64::default()
    }

    pub fn update(&self, v: f64) {
        self.inner.store(v, Ordering::Relaxed);
    }

    pub fn value(&self) -> f64 {
        self.inner.load(Ordering::Relaxed)
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

type ComputeI64 = dyn Fn() -> i64 + Send + Sync;
type ComputeF64 = dyn Fn() -> f64 + Send + Sync;

/// A gauge whose value is computed by a callback on every read.
#[derive(Clone)]
pub struct FunctionalGauge {
    f: Arc<ComputeI64>,
}

impl FunctionalGauge {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        FunctionalGauge { f: Arc::new(f) }
    }

    pub fn value(&self) -> i64 {
        (self.f)()
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl fmt::Debug for FunctionalGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionalGauge")
    }
}

/// The float version of [FunctionalGauge].
#[derive(Clone)]
pub struct FunctionalGaugeFloat64 {
    f: Arc<ComputeF64>,
}

impl FunctionalGaugeFloat64 {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        FunctionalGaugeFloat64 { f: Arc::new(f) }
    }

    pub fn value(&self) -> f64 {
        (self.f)()
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl fmt::Debug for FunctionalGaugeFloat64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionalGaugeFloat64")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI64;

    #[test]
    fn gauge() {
        let g = Gauge::new();
        g.update(47);
        assert_eq!(g.value(), 47);
        g.inc(3);
        g.dec(10);
        assert_eq!(g.value(), 40);
    }

    #[test]
    fn gauge_float() {
        let g = GaugeFloat64::new();
        assert_eq!(g.value(), 0.0);
        g.update(47.5);
        assert_eq!(g.value(), 47.5);
    }

    #[test]
    fn functional() {
        let source = Arc::new(AtomicI64::new(1));
        let s = source.clone();
        let g = FunctionalGauge::new(move || s.load(Ordering::Relaxed));
        assert_eq!(g.value(), 1);
        source.store(42, Ordering::Relaxed);
        assert_eq!(g.value(), 42);

        let g = FunctionalGaugeFloat64::new(|| 2.5);
        assert_eq!(g.value(), 2.5);
    }
}
