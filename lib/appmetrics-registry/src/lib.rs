/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod counter;
pub use counter::Counter;

mod gauge;
pub use gauge::{FunctionalGauge, FunctionalGaugeFloat64, Gauge, GaugeFloat64};

mod sample;
pub use sample::{ExpDecaySample, Sample, SampleKind, SampleSnapshot, UniformSample};

mod histogram;
pub use histogram::{Histogram, HistogramSnapshot};

mod meter;
pub use meter::{Meter, MeterSnapshot};

mod timer;
pub use timer::{Timer, TimerSnapshot};

mod metric;
pub use metric::{Metric, MetricKind};

mod registry;
pub use registry::{Registry, RegistryError};

pub mod name;
