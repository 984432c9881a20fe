/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

type BoxedCompute<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A replaceable compute accessor backing a functional gauge field.
///
/// The gauge reads the current function on every collection. The default
/// value of `T` is returned while no function is set.
pub struct ComputeFn<T> {
    inner: ArcSwapOption<BoxedCompute<T>>,
}

impl<T> Default for ComputeFn<T> {
    fn default() -> Self {
        ComputeFn {
            inner: ArcSwapOption::empty(),
        }
    }
}

impl<T> fmt::Debug for ComputeFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputeFn")
            .field("set", &self.is_set())
            .finish()
    }
}

impl<T> ComputeFn<T> {
    pub fn set<F>(&self, f: F)
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let f: BoxedCompute<T> = Box::new(f);
        self.inner.store(Some(Arc::new(f)));
    }

    pub fn clear(&self) {
        self.inner.store(None);
    }

    pub fn is_set(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl<T: Default> ComputeFn<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let c = ComputeFn::default();
        c.set(f);
        c
    }

    pub fn call(&self) -> T {
        match &*self.inner.load() {
            Some(f) => f(),
            None => T::default(),
        }
    }
}

/// A named compute accessor for runtime declared functional gauges.
#[derive(Clone)]
pub enum ComputeAccessor {
    Int(Arc<dyn Fn() -> i64 + Send + Sync>),
    Float(Arc<dyn Fn() -> f64 + Send + Sync>),
}

impl ComputeAccessor {
    pub fn return_type(&self) -> &'static str {
        match self {
            ComputeAccessor::Int(_) => "i64",
            ComputeAccessor::Float(_) => "f64",
        }
    }
}

impl fmt::Debug for ComputeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComputeAccessor({})", self.return_type())
    }
}

/// Compute accessors keyed by name, e.g. `compute_queue_size`.
#[derive(Clone, Debug, Default)]
pub struct ComputeAccessors {
    inner: HashMap<String, ComputeAccessor>,
}

impl ComputeAccessors {
    pub fn new() -> Self {
        ComputeAccessors::default()
    }

    pub fn insert_int<F>(&mut self, name: &str, f: F)
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        self.inner
            .insert(name.to_string(), ComputeAccessor::Int(Arc::new(f)));
    }

    pub fn insert_float<F>(&mut self, name: &str, f: F)
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.inner
            .insert(name.to_string(), ComputeAccessor::Float(Arc::new(f)));
    }

    pub fn with_int<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        self.insert_int(name, f);
        self
    }

    pub fn with_float<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.insert_float(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ComputeAccessor> {
        self.inner.get(name)
    }
}
