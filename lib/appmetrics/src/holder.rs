/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::debug;

use appmetrics_registry::{
    Counter, FunctionalGauge, FunctionalGaugeFloat64, Gauge, GaugeFloat64, Histogram, Meter,
    Metric, Registry, Timer,
};

use crate::{DefinitionError, MetricDecl, TaggableMetric, Tagged};

/// A metric field value that can be bound to a registry.
pub trait BindMetric {
    fn bind(&self, registry: &Registry, name: &str);

    fn unbind(&self, registry: &Registry, name: &str) {
        registry.unregister(name);
    }
}

macro_rules! impl_bind_plain {
    ($t:ident) => {
        impl BindMetric for $t {
            fn bind(&self, registry: &Registry, name: &str) {
                if let Err(e) = registry.register(name, Metric::$t(self.clone())) {
                    debug!("skip registration of metric {name}: {e}");
                }
            }
        }
    };
}

impl_bind_plain!(Counter);
impl_bind_plain!(Gauge);
impl_bind_plain!(GaugeFloat64);
impl_bind_plain!(FunctionalGauge);
impl_bind_plain!(FunctionalGaugeFloat64);
impl_bind_plain!(Histogram);
impl_bind_plain!(Meter);
impl_bind_plain!(Timer);

impl<M: TaggableMetric> BindMetric for Tagged<M> {
    fn bind(&self, registry: &Registry, _name: &str) {
        Tagged::bind(self, registry);
    }
}

/// A value holding metric fields.
pub trait MetricsHolder {
    /// Calls `f` with the name and value of every metric field, in declaration
    /// order.
    fn visit_metrics(&self, f: &mut dyn FnMut(&str, &dyn BindMetric));
}

impl<T: MetricsHolder + ?Sized> MetricsHolder for Arc<T> {
    fn visit_metrics(&self, f: &mut dyn FnMut(&str, &dyn BindMetric)) {
        (**self).visit_metrics(f)
    }
}

/// A metrics holder type with a static list of declarations.
///
/// Usually implemented with `#[derive(AppMetrics)]`.
pub trait PopulateMetrics: MetricsHolder + Sized {
    fn declarations() -> Vec<MetricDecl>;

    /// Creates a value with every metric field set to a new metric.
    fn populate() -> Result<Arc<Self>, DefinitionError>;
}

/// Creates a new metrics holder. No registry is involved.
pub fn populate<M: PopulateMetrics>() -> Result<Arc<M>, DefinitionError> {
    M::populate()
}

/// Registers every metric field of `m`.
///
/// Names that are already in use are skipped, even if the existing metric is
/// of a different kind.
pub fn register<M: MetricsHolder + ?Sized>(registry: &Registry, m: &M) {
    m.visit_metrics(&mut |name, metric| metric.bind(registry, name));
}

/// Removes every declared name of `m` from the registry.
///
/// Meters and timers are stopped. Entries created with tags are kept.
pub fn unregister<M: MetricsHolder + ?Sized>(registry: &Registry, m: &M) {
    m.visit_metrics(&mut |name, metric| metric.unbind(registry, name));
}

/// The declared metric names of `m`, in declaration order.
pub fn metric_names<M: MetricsHolder + ?Sized>(m: &M) -> Vec<String> {
    let mut names = Vec::new();
    m.visit_metrics(&mut |name, _| names.push(name.to_string()));
    names
}

/// The declared metric names of `M`, in declaration order.
pub fn declared_names<M: PopulateMetrics>() -> Vec<String> {
    M::declarations()
        .into_iter()
        .map(|d| d.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use appmetrics_registry::MetricKind;

    struct Manual {
        requests: Counter,
        errors: Tagged<Counter>,
        rate: Meter,
    }

    impl MetricsHolder for Manual {
        fn visit_metrics(&self, f: &mut dyn FnMut(&str, &dyn BindMetric)) {
            f("requests", &self.requests);
            f("errors", &self.errors);
            f("rate", &self.rate);
        }
    }

    fn manual() -> Manual {
        Manual {
            requests: Counter::new(),
            errors: Tagged::new("errors", Counter::new),
            rate: Meter::new(),
        }
    }

    #[test]
    fn names() {
        let m = manual();
        assert_eq!(metric_names(&m), vec!["requests", "errors", "rate"]);
        assert_eq!(metric_names(&Arc::new(manual())), metric_names(&m));
    }

    #[test]
    fn register_unregister() {
        let r = Registry::new();
        let m = manual();
        register(&r, &m);
        assert_eq!(r.names(), vec!["errors", "rate", "requests"]);
        assert!(m.errors.is_bound());

        m.requests.inc(1);
        let Some(Metric::Counter(c)) = r.get("requests") else {
            panic!("not a counter");
        };
        assert_eq!(c.count(), 1);

        m.errors.tag(["code:500"]).inc(1);
        unregister(&r, &m);
        assert_eq!(r.names(), vec!["errors[code:500]"]);
        assert!(m.rate.is_stopped());
    }

    #[test]
    fn first_registrant_wins() {
        let r = Registry::new();
        r.register("rate", Gauge::new().into()).unwrap();
        let m = manual();
        register(&r, &m);
        assert_eq!(r.get("rate").unwrap().kind(), MetricKind::Gauge);
    }
}
