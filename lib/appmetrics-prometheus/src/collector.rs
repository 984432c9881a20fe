/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::{debug, warn};

use appmetrics_registry::{Metric, Registry, SampleSnapshot, name};

use crate::{CollectorConfig, MetricFamily, MetricType, Series, SeriesValue, TextEncoder, sanitize};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

const QUANTILE_LABEL: &str = "quantile";
const EXPORTED_QUANTILE_LABEL: &str = "exported_quantile";

/// Builds Prometheus metric families from a registry on demand.
#[derive(Clone, Debug)]
pub struct Collector {
    registry: Registry,
    config: CollectorConfig,
}

impl Collector {
    pub fn new(registry: Registry, config: CollectorConfig) -> Self {
        Collector { registry, config }
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Families sorted by name, each with its series sorted by label set.
    pub fn collect(&self) -> Vec<MetricFamily> {
        let mut entries = Vec::with_capacity(self.registry.len());
        self.registry
            .each(|name, metric| entries.push((name.to_string(), metric.clone())));
        // sort for a stable winner on conflicts
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut families = FamilySet::default();
        for (full_name, metric) in &entries {
            let (base, tags) = name::split_tagged_name(full_name);
            let base = sanitize::metric_name(base);
            if base.is_empty() {
                debug!("skip metric {full_name}: no valid char in name");
                continue;
            }
            let labels = self.labels(&tags, metric.kind().is_sampled());
            self.collect_metric(&mut families, base, labels, metric);
        }
        families.finish()
    }

    /// Collects and encodes in one step.
    pub fn render(&self) -> String {
        let mut s = String::new();
        if TextEncoder::encode(&self.collect(), &mut s).is_err() {
            warn!("failed to encode prometheus metrics");
        }
        s
    }

    /// The quantile label is reserved in summary families, so a user label with
    /// that name is renamed for metrics exported as summaries.
    fn labels(&self, tags: &[&str], summary: bool) -> Vec<(String, String)> {
        let mut labels = BTreeMap::new();
        for (k, v) in self.config.labels() {
            let k = sanitize::label_name(k);
            if !k.is_empty() {
                labels.insert(k, v.to_string());
            }
        }
        for tag in tags {
            // bare tags have no label form
            let Some((k, v)) = name::split_tag_pair(tag) else {
                continue;
            };
            let k = sanitize::label_name(k);
            if !k.is_empty() {
                labels.insert(k, v.to_string());
            }
        }
        if summary {
            if let Some(v) = labels.remove(QUANTILE_LABEL) {
                labels
                    .entry(EXPORTED_QUANTILE_LABEL.to_string())
                    .or_insert(v);
            }
        }
        labels.into_iter().collect()
    }

    fn collect_metric(
        &self,
        families: &mut FamilySet,
        base: String,
        labels: Vec<(String, String)>,
        metric: &Metric,
    ) {
        let help = metric.kind().as_str();
        match metric {
            Metric::Counter(c) => {
                let v = SeriesValue::Single(c.count() as f64);
                families.add(base, help, MetricType::Untyped, labels, v);
            }
            Metric::Gauge(g) => {
                let v = SeriesValue::Single(g.value() as f64);
                families.add(base, help, MetricType::Gauge, labels, v);
            }
            Metric::GaugeFloat64(g) => {
                let v = SeriesValue::Single(g.value());
                families.add(base, help, MetricType::Gauge, labels, v);
            }
            Metric::FunctionalGauge(g) => {
                let v = SeriesValue::Single(g.value() as f64);
                families.add(base, help, MetricType::Gauge, labels, v);
            }
            Metric::FunctionalGaugeFloat64(g) => {
                let v = SeriesValue::Single(g.value());
                families.add(base, help, MetricType::Gauge, labels, v);
            }
            Metric::Histogram(h) => {
                let s = h.snapshot();
                let summary = summary(&s, self.config.histogram_quantiles(), 1.0);
                let max = SeriesValue::Single(s.max() as f64);
                let min = SeriesValue::Single(s.min() as f64);
                families.add(
                    format!("{base}_max"),
                    help,
                    MetricType::Untyped,
                    labels.clone(),
                    max,
                );
                families.add(
                    format!("{base}_min"),
                    help,
                    MetricType::Untyped,
                    labels.clone(),
                    min,
                );
                families.add(base, help, MetricType::Summary, labels, summary);
            }
            Metric::Meter(m) => {
                let v = SeriesValue::Single(m.count() as f64);
                families.add(
                    format!("{base}_count"),
                    help,
                    MetricType::Untyped,
                    labels,
                    v,
                );
            }
            Metric::Timer(t) => {
                let snapshot = t.snapshot();
                let s = snapshot.histogram();
                let summary = summary(s, self.config.timer_quantiles(), NANOS_PER_SEC);
                let max = SeriesValue::Single(s.max() as f64 / NANOS_PER_SEC);
                let min = SeriesValue::Single(s.min() as f64 / NANOS_PER_SEC);
                families.add(
                    format!("{base}_max_seconds"),
                    help,
                    MetricType::Untyped,
                    labels.clone(),
                    max,
                );
                families.add(
                    format!("{base}_min_seconds"),
                    help,
                    MetricType::Untyped,
                    labels.clone(),
                    min,
                );
                families.add(
                    format!("{base}_seconds"),
                    help,
                    MetricType::Summary,
                    labels,
                    summary,
                );
            }
        }
    }
}

fn summary(s: &SampleSnapshot, quantiles: &[f64], scale: f64) -> SeriesValue {
    SeriesValue::Summary {
        quantiles: quantiles
            .iter()
            .map(|q| (*q, s.percentile(*q) / scale))
            .collect(),
        sum: s.sum() as f64 / scale,
        count: s.count().max(0) as u64,
    }
}

#[derive(Default)]
struct FamilySet {
    inner: BTreeMap<String, MetricFamily>,
}

impl FamilySet {
    fn add(
        &mut self,
        name: String,
        help: &'static str,
        metric_type: MetricType,
        labels: Vec<(String, String)>,
        value: SeriesValue,
    ) {
        let family = match self.inner.entry(name) {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let name = v.key().clone();
                v.insert(MetricFamily::new(name, help, metric_type))
            }
        };
        if family.metric_type() != metric_type {
            warn!(
                "metric family {} already has type {}, drop {metric_type} series from {help}",
                family.name(),
                family.metric_type()
            );
            return;
        }
        if family.has_labels(&labels) {
            warn!(
                "metric family {} already has a series with labels {labels:?}",
                family.name()
            );
            return;
        }
        family.push(Series::new(labels, value));
    }

    fn finish(self) -> Vec<MetricFamily> {
        self.inner
            .into_values()
            .map(|mut f| {
                f.sort();
                f
            })
            .collect()
    }
}
