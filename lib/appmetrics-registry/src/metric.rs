/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use crate::{
    Counter, FunctionalGauge, FunctionalGaugeFloat64, Gauge, GaugeFloat64, Histogram, Meter, Timer,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    GaugeFloat64,
    FunctionalGauge,
    FunctionalGaugeFloat64,
    Histogram,
    Meter,
    Timer,
}

impl MetricKind {
    pub const ALL: [MetricKind; 8] = [
        MetricKind::Counter,
        MetricKind::Gauge,
        MetricKind::GaugeFloat64,
        MetricKind::FunctionalGauge,
        MetricKind::FunctionalGaugeFloat64,
        MetricKind::Histogram,
        MetricKind::Meter,
        MetricKind::Timer,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "Counter",
            MetricKind::Gauge => "Gauge",
            MetricKind::GaugeFloat64 => "GaugeFloat64",
            MetricKind::FunctionalGauge => "FunctionalGauge",
            MetricKind::FunctionalGaugeFloat64 => "FunctionalGaugeFloat64",
            MetricKind::Histogram => "Histogram",
            MetricKind::Meter => "Meter",
            MetricKind::Timer => "Timer",
        }
    }

    /// Looks up a kind by its type name, e.g. `GaugeFloat64`.
    pub fn from_type_name(s: &str) -> Option<Self> {
        MetricKind::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub const fn is_functional(&self) -> bool {
        matches!(
            self,
            MetricKind::FunctionalGauge | MetricKind::FunctionalGaugeFloat64
        )
    }

    /// Whether the kind keeps a reservoir sample.
    pub const fn is_sampled(&self) -> bool {
        matches!(self, MetricKind::Histogram | MetricKind::Timer)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registry value. Every variant is a handle to shared state.
#[derive(Clone, Debug)]
pub enum Metric {
    Counter(Counter),
    Gauge(Gauge),
    GaugeFloat64(GaugeFloat64),
    FunctionalGauge(FunctionalGauge),
    FunctionalGaugeFloat64(FunctionalGaugeFloat64),
    Histogram(Histogram),
    Meter(Meter),
    Timer(Timer),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::GaugeFloat64(_) => MetricKind::GaugeFloat64,
            Metric::FunctionalGauge(_) => MetricKind::FunctionalGauge,
            Metric::FunctionalGaugeFloat64(_) => MetricKind::FunctionalGaugeFloat64,
            Metric::Histogram(_) => MetricKind::Histogram,
            Metric::Meter(_) => MetricKind::Meter,
            Metric::Timer(_) => MetricKind::Timer,
        }
    }

    /// Whether both handles point to the same metric state.
    pub fn ptr_eq(&self, other: &Metric) -> bool {
        match (self, other) {
            (Metric::Counter(a), Metric::Counter(b)) => a.same_as(b),
            (Metric::Gauge(a), Metric::Gauge(b)) => a.same_as(b),
            (Metric::GaugeFloat64(a), Metric::GaugeFloat64(b)) => a.same_as(b),
            (Metric::FunctionalGauge(a), Metric::FunctionalGauge(b)) => a.same_as(b),
            (Metric::FunctionalGaugeFloat64(a), Metric::FunctionalGaugeFloat64(b)) => a.same_as(b),
            (Metric::Histogram(a), Metric::Histogram(b)) => a.same_as(b),
            (Metric::Meter(a), Metric::Meter(b)) => a.same_as(b),
            (Metric::Timer(a), Metric::Timer(b)) => a.same_as(b),
            _ => false,
        }
    }

    /// Stops the background accounting of meters and timers.
    pub fn stop(&self) {
        match self {
            Metric::Meter(m) => m.stop(),
            Metric::Timer(t) => t.stop(),
            _ => {}
        }
    }
}

macro_rules! impl_from {
    ($t:ident) => {
        impl From<$t> for Metric {
            fn from(m: $t) -> Self {
                Metric::$t(m)
            }
        }
    };
}

impl_from!(Counter);
impl_from!(Gauge);
impl_from!(GaugeFloat64);
impl_from!(FunctionalGauge);
impl_from!(FunctionalGaugeFloat64);
impl_from!(Histogram);
impl_from!(Meter);
impl_from!(Timer);
