/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Application metrics declared as struct fields.
//!
//! A metrics holder is a struct whose fields are metrics:
//!
//! ```ignore
//! #[derive(AppMetrics)]
//! struct ServerMetrics {
//!     #[metric(name = "server.requests")]
//!     requests: Counter,
//!     #[metric(name = "server.latency", sample = "uniform,100")]
//!     latency: Timer,
//!     #[metric(name = "server.responses")]
//!     responses: Tagged<Counter>,
//!     #[metric(name = "server.queue.size")]
//!     queue_size: FunctionalGauge,
//!     compute_queue_size: ComputeFn<i64>,
//! }
//!
//! let m = appmetrics::populate::<ServerMetrics>()?;
//! appmetrics::register(&registry, &*m);
//! m.responses.tag(["status:200"]).inc(1);
//! ```
//!
//! The optional `sample` attribute selects the reservoir of histograms and
//! timers, either `uniform[,<size>]` or `expdecay[,<size>,<alpha>]`.
//! Functional gauges read their value from a `compute_<field>` sibling field
//! of type [ComputeFn], or from a method `fn compute_<field>(&self)`.
//!
//! Holders can also be built at runtime from a list of [MetricDecl], see
//! [MetricSet].

extern crate self as appmetrics;

pub use appmetrics_macros::AppMetrics;
pub use appmetrics_registry::{
    Counter, FunctionalGauge, FunctionalGaugeFloat64, Gauge, GaugeFloat64, Histogram,
    HistogramSnapshot, Meter, MeterSnapshot, Metric, MetricKind, Registry, RegistryError, Sample,
    SampleKind, SampleSnapshot, Timer, TimerSnapshot, name,
};

mod error;
pub use error::{DefinitionError, SampleSpecError};

mod sample;
pub use sample::{DEFAULT_EXP_DECAY_ALPHA, DEFAULT_RESERVOIR_SIZE, SampleSpec};

mod decl;
pub use decl::{FieldKind, FieldKindError, MetricDecl};

mod compute;
pub use compute::{ComputeAccessor, ComputeAccessors, ComputeFn};

mod tagged;
pub use tagged::{TaggableMetric, Tagged};

mod holder;
pub use holder::{
    BindMetric, MetricsHolder, PopulateMetrics, declared_names, metric_names, populate, register,
    unregister,
};

mod set;
pub use set::{MetricField, MetricSet};
