/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Prometheus text exposition of an appmetrics [`Registry`].
//!
//! ```
//! use appmetrics_prometheus::{Collector, CollectorConfig};
//! use appmetrics_registry::{Counter, Registry};
//!
//! let registry = Registry::new();
//! let requests = Counter::new();
//! registry.register("requests[route:/]", requests.clone().into()).unwrap();
//! requests.inc(2);
//!
//! let collector = Collector::new(registry, CollectorConfig::default());
//! assert!(collector.render().contains("requests{route=\"/\"} 2\n"));
//! ```
//!
//! [`Registry`]: appmetrics_registry::Registry

mod config;
pub use config::{CollectorConfig, DEFAULT_QUANTILES};

mod family;
pub use family::{MetricFamily, MetricType, Series, SeriesValue};

mod encoder;
pub use encoder::TextEncoder;

mod collector;
pub use collector::Collector;

pub mod sanitize;
