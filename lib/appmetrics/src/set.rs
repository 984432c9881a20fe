/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use appmetrics_registry::{
    Counter, FunctionalGauge, FunctionalGaugeFloat64, Gauge, GaugeFloat64, Histogram, Meter,
    MetricKind, Timer,
};

use crate::{
    BindMetric, ComputeAccessor, ComputeAccessors, DefinitionError, FieldKind, MetricDecl,
    MetricsHolder, SampleSpec, Tagged,
};

/// The value of a runtime declared metric field.
#[derive(Debug)]
pub enum MetricField {
    Counter(Counter),
    Gauge(Gauge),
    GaugeFloat64(GaugeFloat64),
    FunctionalGauge(FunctionalGauge),
    FunctionalGaugeFloat64(FunctionalGaugeFloat64),
    Histogram(Histogram),
    Meter(Meter),
    Timer(Timer),
    TaggedCounter(Tagged<Counter>),
    TaggedGauge(Tagged<Gauge>),
    TaggedGaugeFloat64(Tagged<GaugeFloat64>),
    TaggedHistogram(Tagged<Histogram>),
    TaggedMeter(Tagged<Meter>),
    TaggedTimer(Tagged<Timer>),
}

impl MetricField {
    pub fn kind(&self) -> FieldKind {
        match self {
            MetricField::Counter(_) => FieldKind::Plain(MetricKind::Counter),
            MetricField::Gauge(_) => FieldKind::Plain(MetricKind::Gauge),
            MetricField::GaugeFloat64(_) => FieldKind::Plain(MetricKind::GaugeFloat64),
            MetricField::FunctionalGauge(_) => FieldKind::Plain(MetricKind::FunctionalGauge),
            MetricField::FunctionalGaugeFloat64(_) => {
                FieldKind::Plain(MetricKind::FunctionalGaugeFloat64)
            }
            MetricField::Histogram(_) => FieldKind::Plain(MetricKind::Histogram),
            MetricField::Meter(_) => FieldKind::Plain(MetricKind::Meter),
            MetricField::Timer(_) => FieldKind::Plain(MetricKind::Timer),
            MetricField::TaggedCounter(_) => FieldKind::Tagged(MetricKind::Counter),
            MetricField::TaggedGauge(_) => FieldKind::Tagged(MetricKind::Gauge),
            MetricField::TaggedGaugeFloat64(_) => FieldKind::Tagged(MetricKind::GaugeFloat64),
            MetricField::TaggedHistogram(_) => FieldKind::Tagged(MetricKind::Histogram),
            MetricField::TaggedMeter(_) => FieldKind::Tagged(MetricKind::Meter),
            MetricField::TaggedTimer(_) => FieldKind::Tagged(MetricKind::Timer),
        }
    }

    fn as_bind(&self) -> &dyn BindMetric {
        match self {
            MetricField::Counter(m) => m,
            MetricField::Gauge(m) => m,
            MetricField::GaugeFloat64(m) => m,
            MetricField::FunctionalGauge(m) => m,
            MetricField::FunctionalGaugeFloat64(m) => m,
            MetricField::Histogram(m) => m,
            MetricField::Meter(m) => m,
            MetricField::Timer(m) => m,
            MetricField::TaggedCounter(m) => m,
            MetricField::TaggedGauge(m) => m,
            MetricField::TaggedGaugeFloat64(m) => m,
            MetricField::TaggedHistogram(m) => m,
            MetricField::TaggedMeter(m) => m,
            MetricField::TaggedTimer(m) => m,
        }
    }

    fn build(
        decl: &MetricDecl,
        accessors: &ComputeAccessors,
    ) -> Result<MetricField, DefinitionError> {
        let kind = decl.kind()?;
        let sample = decl.sample_spec()?;
        let name = decl.name();

        let field = match kind {
            FieldKind::Plain(kind) => match kind {
                MetricKind::Counter => MetricField::Counter(Counter::new()),
                MetricKind::Gauge => MetricField::Gauge(Gauge::new()),
                MetricKind::GaugeFloat64 => MetricField::GaugeFloat64(GaugeFloat64::new()),
                MetricKind::FunctionalGauge => match compute_accessor(decl, accessors)? {
                    ComputeAccessor::Int(f) => {
                        MetricField::FunctionalGauge(FunctionalGauge::new(move || f()))
                    }
                    ComputeAccessor::Float(_) => return Err(wrong_signature(decl, "i64")),
                },
                MetricKind::FunctionalGaugeFloat64 => {
                    match compute_accessor(decl, accessors)? {
                        ComputeAccessor::Float(f) => MetricField::FunctionalGaugeFloat64(
                            FunctionalGaugeFloat64::new(move || f()),
                        ),
                        ComputeAccessor::Int(_) => return Err(wrong_signature(decl, "f64")),
                    }
                }
                MetricKind::Histogram => MetricField::Histogram(Histogram::new(sample.build())),
                MetricKind::Meter => MetricField::Meter(Meter::new()),
                MetricKind::Timer => MetricField::Timer(Timer::new(sample.build())),
            },
            FieldKind::Tagged(kind) => tagged_field(decl, kind, name, sample)?,
        };
        Ok(field)
    }
}

fn accessor_name(decl: &MetricDecl) -> String {
    format!("compute_{}", decl.field())
}

fn wrong_signature(decl: &MetricDecl, expected: &'static str) -> DefinitionError {
    DefinitionError::ComputeFunctionWrongSignature {
        field: decl.field().to_string(),
        accessor: accessor_name(decl),
        expected,
    }
}

fn compute_accessor(
    decl: &MetricDecl,
    accessors: &ComputeAccessors,
) -> Result<ComputeAccessor, DefinitionError> {
    let accessor = accessor_name(decl);
    match accessors.get(&accessor) {
        Some(f) => Ok(f.clone()),
        None => Err(DefinitionError::MissingComputeFunction {
            field: decl.field().to_string(),
            accessor,
        }),
    }
}

fn tagged_field(
    decl: &MetricDecl,
    kind: MetricKind,
    name: &str,
    sample: SampleSpec,
) -> Result<MetricField, DefinitionError> {
    let field = match kind {
        MetricKind::Counter => MetricField::TaggedCounter(Tagged::with_sample(name, sample)),
        MetricKind::Gauge => MetricField::TaggedGauge(Tagged::with_sample(name, sample)),
        MetricKind::GaugeFloat64 => {
            MetricField::TaggedGaugeFloat64(Tagged::with_sample(name, sample))
        }
        MetricKind::Histogram => MetricField::TaggedHistogram(Tagged::with_sample(name, sample)),
        MetricKind::Meter => MetricField::TaggedMeter(Tagged::with_sample(name, sample)),
        MetricKind::Timer => MetricField::TaggedTimer(Tagged::with_sample(name, sample)),
        MetricKind::FunctionalGauge | MetricKind::FunctionalGaugeFloat64 => {
            return Err(DefinitionError::TaggedFunctionalGaugeUnsupported {
                field: decl.field().to_string(),
                kind,
            });
        }
    };
    Ok(field)
}

macro_rules! impl_getter {
    ($f:ident, $v:ident, $t:ty) => {
        pub fn $f(&self, field: &str) -> Option<&$t> {
            match self.get(field)? {
                MetricField::$v(m) => Some(m),
                _ => None,
            }
        }
    };
}

#[derive(Debug)]
struct SetEntry {
    decl: MetricDecl,
    value: MetricField,
}

/// A metrics holder built at runtime from a list of declarations.
#[derive(Debug)]
pub struct MetricSet {
    entries: Vec<SetEntry>,
}

impl MetricSet {
    /// Creates every declared metric. Functional gauges take their compute
    /// accessor named `compute_<field>` from `accessors`.
    pub fn populate(
        decls: Vec<MetricDecl>,
        accessors: &ComputeAccessors,
    ) -> Result<Self, DefinitionError> {
        let mut entries = Vec::with_capacity(decls.len());
        for decl in decls {
            let value = MetricField::build(&decl, accessors)?;
            entries.push(SetEntry { decl, value });
        }
        Ok(MetricSet { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &MetricDecl> {
        self.entries.iter().map(|e| &e.decl)
    }

    pub fn get(&self, field: &str) -> Option<&MetricField> {
        self.entries
            .iter()
            .find(|e| e.decl.field() == field)
            .map(|e| &e.value)
    }

    impl_getter!(counter, Counter, Counter);
    impl_getter!(gauge, Gauge, Gauge);
    impl_getter!(gauge_float64, GaugeFloat64, GaugeFloat64);
    impl_getter!(functional_gauge, FunctionalGauge, FunctionalGauge);
    impl_getter!(
        functional_gauge_float64,
        FunctionalGaugeFloat64,
        FunctionalGaugeFloat64
    );
    impl_getter!(histogram, Histogram, Histogram);
    impl_getter!(meter, Meter, Meter);
    impl_getter!(timer, Timer, Timer);
    impl_getter!(tagged_counter, TaggedCounter, Tagged<Counter>);
    impl_getter!(tagged_gauge, TaggedGauge, Tagged<Gauge>);
    impl_getter!(tagged_gauge_float64, TaggedGaugeFloat64, Tagged<GaugeFloat64>);
    impl_getter!(tagged_histogram, TaggedHistogram, Tagged<Histogram>);
    impl_getter!(tagged_meter, TaggedMeter, Tagged<Meter>);
    impl_getter!(tagged_timer, TaggedTimer, Tagged<Timer>);
}

impl MetricsHolder for MetricSet {
    fn visit_metrics(&self, f: &mut dyn FnMut(&str, &dyn BindMetric)) {
        for e in &self.entries {
            f(e.decl.name(), e.value.as_bind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SampleSpecError, metric_names, register};
    use appmetrics_registry::{Registry, SampleKind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn decls() -> Vec<MetricDecl> {
        vec![
            MetricDecl::new("requests", "server.requests", "Counter"),
            MetricDecl::new("latency", "server.latency", "Timer").with_sample("uniform,100"),
            MetricDecl::new("responses", "server.responses", "Tagged<Counter>"),
            MetricDecl::new("queue", "server.queue", "FunctionalGauge"),
            MetricDecl::new("load", "server.load", "FunctionalGaugeFloat64"),
        ]
    }

    fn accessors(queue: Arc<AtomicI64>) -> ComputeAccessors {
        ComputeAccessors::new()
            .with_int("compute_queue", move || queue.load(Ordering::Relaxed))
            .with_float("compute_load", || 0.5)
    }

    #[test]
    fn populate() {
        let queue = Arc::new(AtomicI64::new(1));
        let set = MetricSet::populate(decls(), &accessors(queue.clone())).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(
            metric_names(&set),
            vec![
                "server.requests",
                "server.latency",
                "server.responses",
                "server.queue",
                "server.load"
            ]
        );

        assert_eq!(
            set.timer("latency").unwrap().sample_kind(),
            SampleKind::Uniform
        );
        assert!(set.counter("latency").is_none());
        assert!(set.counter("missing").is_none());
        assert_eq!(
            set.get("responses").unwrap().kind(),
            FieldKind::Tagged(MetricKind::Counter)
        );

        let gauge = set.functional_gauge("queue").unwrap();
        assert_eq!(gauge.value(), 1);
        queue.store(9, Ordering::Relaxed);
        assert_eq!(gauge.value(), 9);
        assert_eq!(set.functional_gauge_float64("load").unwrap().value(), 0.5);
    }

    #[test]
    fn register_set() {
        let queue = Arc::new(AtomicI64::new(1));
        let set = MetricSet::populate(decls(), &accessors(queue)).unwrap();
        let r = Registry::new();
        register(&r, &set);
        assert_eq!(r.len(), 5);
        set.tagged_counter("responses")
            .unwrap()
            .tag(["status:200"])
            .inc(1);
        assert!(r.contains("server.responses[status:200]"));
    }

    #[test]
    fn missing_accessor() {
        let e = MetricSet::populate(decls(), &ComputeAccessors::new()).unwrap_err();
        assert!(matches!(
            e,
            DefinitionError::MissingComputeFunction { ref accessor, .. } if accessor == "compute_queue"
        ));
    }

    #[test]
    fn wrong_accessor_type() {
        let a = ComputeAccessors::new()
            .with_float("compute_queue", || 1.0)
            .with_float("compute_load", || 0.5);
        let e = MetricSet::populate(decls(), &a).unwrap_err();
        assert!(matches!(
            e,
            DefinitionError::ComputeFunctionWrongSignature { expected: "i64", .. }
        ));
    }

    #[test]
    fn invalid_decls() {
        let a = ComputeAccessors::new();
        let e = MetricSet::populate(vec![MetricDecl::new("name", "name", "String")], &a)
            .unwrap_err();
        assert!(matches!(e, DefinitionError::InvalidFieldKind { .. }));

        let e = MetricSet::populate(
            vec![MetricDecl::new("queue", "queue", "Tagged<FunctionalGauge>")],
            &a,
        )
        .unwrap_err();
        assert!(matches!(
            e,
            DefinitionError::TaggedFunctionalGaugeUnsupported { .. }
        ));

        let e = MetricSet::populate(
            vec![MetricDecl::new("latency", "latency", "Histogram").with_sample("expdecay,10")],
            &a,
        )
        .unwrap_err();
        assert!(matches!(
            e,
            DefinitionError::InvalidSampleSpec {
                source: SampleSpecError::InvalidArguments(SampleKind::ExpDecay),
                ..
            }
        ));
    }
}
