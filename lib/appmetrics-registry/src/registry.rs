/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use foldhash::fast::FixedState;
use thiserror::Error;

use crate::Metric;

type MetricMap = HashMap<String, Metric, FixedState>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
}

/// A name to metric map shared between metric holders and exporters.
///
/// Cloning a registry returns a new handle to the same map.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RwLock<MetricMap>>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            inner: Arc::new(RwLock::new(HashMap::with_hasher(FixedState::with_seed(0)))),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MetricMap> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MetricMap> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, name: &str) -> Option<Metric> {
        self.read().get(name).cloned()
    }

    /// Returns the metric registered under `name`, registering the one made by
    /// `factory` if there is none. The factory runs with the write lock held,
    /// so concurrent callers always get the same instance.
    pub fn get_or_register<F>(&self, name: &str, factory: F) -> Metric
    where
        F: FnOnce() -> Metric,
    {
        if let Some(m) = self.read().get(name) {
            return m.clone();
        }
        let mut map = self.write();
        map.entry(name.to_string()).or_insert_with(factory).clone()
    }

    pub fn register(&self, name: &str, metric: Metric) -> Result<(), RegistryError> {
        let mut map = self.write();
        if map.contains_key(name) {
            return Err(RegistryError::DuplicateMetric(name.to_string()));
        }
        map.insert(name.to_string(), metric);
        Ok(())
    }

    /// Removes the metric and stops it if it is a meter or a timer.
    pub fn unregister(&self, name: &str) {
        let removed = self.write().remove(name);
        if let Some(m) = removed {
            m.stop();
        }
    }

    pub fn unregister_all(&self) {
        let map = std::mem::replace(
            &mut *self.write(),
            HashMap::with_hasher(FixedState::with_seed(0)),
        );
        for m in map.values() {
            m.stop();
        }
    }

    /// Visits a copy of all entries, so the registry may be changed meanwhile.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Metric),
    {
        let entries = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        for (name, metric) in &entries {
            f(name, metric);
        }
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.read().keys().cloned().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
