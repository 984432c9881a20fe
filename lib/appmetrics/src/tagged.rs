/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use log::warn;

use appmetrics_registry::name::{clean_tags, join_tagged_name};
use appmetrics_registry::{
    Counter, Gauge, GaugeFloat64, Histogram, Meter, Metric, MetricKind, Registry, Timer,
};

use crate::SampleSpec;

/// Metric kinds that can be used with [Tagged].
pub trait TaggableMetric: Clone + Send + Sync + Sized + 'static {
    const KIND: MetricKind;

    /// Creates a new metric. The sample spec is only used by sampled kinds.
    fn create(sample: &SampleSpec) -> Self;

    fn into_metric(self) -> Metric;

    fn from_metric(m: Metric) -> Option<Self>;
}

macro_rules! impl_taggable {
    ($t:ident, $sample:ident => $create:expr) => {
        impl TaggableMetric for $t {
            const KIND: MetricKind = MetricKind::$t;

            fn create($sample: &SampleSpec) -> Self {
                $create
            }

            fn into_metric(self) -> Metric {
                Metric::$t(self)
            }

            fn from_metric(m: Metric) -> Option<Self> {
                match m {
                    Metric::$t(m) => Some(m),
                    _ => None,
                }
            }
        }
    };
}

impl_taggable!(Counter, _sample => Counter::new());
impl_taggable!(Gauge, _sample => Gauge::new());
impl_taggable!(GaugeFloat64, _sample => GaugeFloat64::new());
impl_taggable!(Histogram, sample => Histogram::new(sample.build()));
impl_taggable!(Meter, _sample => Meter::new());
impl_taggable!(Timer, sample => Timer::new(sample.build()));

type Factory<M> = Arc<dyn Fn() -> M + Send + Sync>;

/// A metric with dynamic tags.
///
/// Tags are plain values or `key:value` pairs. Every distinct set of tags is
/// a separate registry entry named `base[tag1,tag2:value]`, so avoid tags
/// with unbounded values, like IDs.
///
/// It is usually wrapped in a method taking typed tag values:
///
/// ```ignore
/// impl ServerMetrics {
///     fn responses(&self, kind: &str, status: u16) -> Counter {
///         self.responses.tag([format!("type:{kind}"), format!("status:{status}")])
///     }
/// }
/// ```
pub struct Tagged<M: TaggableMetric> {
    name: String,
    factory: Factory<M>,
    registry: ArcSwapOption<Registry>,
}

impl<M: TaggableMetric> fmt::Debug for Tagged<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tagged")
            .field("name", &self.name)
            .field("kind", &M::KIND)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl<M: TaggableMetric> Tagged<M> {
    pub fn new<F>(name: &str, factory: F) -> Self
    where
        F: Fn() -> M + Send + Sync + 'static,
    {
        Tagged {
            name: name.to_string(),
            factory: Arc::new(factory),
            registry: ArcSwapOption::empty(),
        }
    }

    pub fn with_sample(name: &str, sample: SampleSpec) -> Self {
        Tagged::new(name, move || M::create(&sample))
    }

    /// The base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bound(&self) -> bool {
        self.registry.load().is_some()
    }

    /// Returns the metric reporting with the given tags.
    ///
    /// Tags are trimmed, and empty or duplicated ones are ignored. Before the
    /// holder is registered, a new unregistered metric is returned on every
    /// call.
    pub fn tag<I, S>(&self, tags: I) -> M
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(registry) = self.registry.load_full() else {
            return (self.factory)();
        };
        let tags = clean_tags(tags);
        let name = join_tagged_name(&self.name, &tags);
        self.get_or_register(&registry, &name)
    }

    fn get_or_register(&self, registry: &Registry, name: &str) -> M {
        let metric = registry.get_or_register(name, || (self.factory)().into_metric());
        let kind = metric.kind();
        match M::from_metric(metric) {
            Some(m) => m,
            None => {
                warn!(
                    "metric {name} is registered as {kind} rather than {}, the value will be lost",
                    M::KIND
                );
                (self.factory)()
            }
        }
    }

    /// Binds to the registry and registers the bare name, so exporters can
    /// find the metric before any tags are used.
    pub fn bind(&self, registry: &Registry) {
        self.registry.store(Some(Arc::new(registry.clone())));
        self.get_or_register(registry, &self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound() {
        let t = Tagged::<Counter>::with_sample("requests", SampleSpec::default());
        assert!(!t.is_bound());
        let c = t.tag(["a:1"]);
        c.inc(1);
        assert_eq!(t.tag(["a:1"]).count(), 0);
    }

    #[test]
    fn bound() {
        let r = Registry::new();
        let t = Tagged::<Counter>::new("requests", Counter::new);
        t.bind(&r);
        assert!(t.is_bound());
        assert!(r.contains("requests"));

        t.tag(["b:2", "a:1"]).inc(1);
        t.tag(["a:1", "b:2", " "]).inc(2);
        t.tag(["a:1", "b:2", "a:1"]).inc(3);
        assert_eq!(t.tag(["b:2", "a:1"]).count(), 6);
        assert_eq!(r.names(), vec!["requests", "requests[a:1,b:2]"]);

        t.tag(Vec::<String>::new()).inc(1);
        t.tag(["", "  "]).inc(1);
        let Some(Metric::Counter(c)) = r.get("requests") else {
            panic!("not a counter");
        };
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn kind_conflict() {
        let r = Registry::new();
        r.register("requests[a:1]", Gauge::new().into()).unwrap();
        let t = Tagged::<Counter>::new("requests", Counter::new);
        t.bind(&r);
        let c = t.tag(["a:1"]);
        c.inc(1);
        assert_eq!(r.get("requests[a:1]").unwrap().kind(), MetricKind::Gauge);
    }

    #[test]
    fn sampled() {
        let r = Registry::new();
        let t = Tagged::<Histogram>::with_sample(
            "latency",
            SampleSpec::Uniform {
                reservoir_size: 10,
            },
        );
        t.bind(&r);
        let h = t.tag(["route:/"]);
        assert_eq!(h.sample_kind(), appmetrics_registry::SampleKind::Uniform);
        for v in 0..100 {
            h.update(v);
        }
        assert_eq!(h.snapshot().size(), 10);
    }
}
