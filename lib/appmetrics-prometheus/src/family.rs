/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricType {
    Gauge,
    Summary,
    Untyped,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Summary => "summary",
            MetricType::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SeriesValue {
    Single(f64),
    Summary {
        quantiles: Vec<(f64, f64)>,
        sum: f64,
        count: u64,
    },
}

/// A labelled series. Labels are sorted by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    labels: Vec<(String, String)>,
    value: SeriesValue,
}

impl Series {
    pub fn new(labels: Vec<(String, String)>, value: SeriesValue) -> Self {
        Series { labels, value }
    }

    #[inline]
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }

    #[inline]
    pub fn value(&self) -> &SeriesValue {
        &self.value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricFamily {
    name: String,
    help: &'static str,
    metric_type: MetricType,
    series: Vec<Series>,
}

impl MetricFamily {
    pub fn new(name: String, help: &'static str, metric_type: MetricType) -> Self {
        MetricFamily {
            name,
            help,
            metric_type,
            series: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn help(&self) -> &str {
        self.help
    }

    #[inline]
    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    #[inline]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub(crate) fn has_labels(&self, labels: &[(String, String)]) -> bool {
        self.series.iter().any(|s| s.labels == labels)
    }

    pub(crate) fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    pub(crate) fn sort(&mut self) {
        self.series.sort_by(|a, b| a.labels.cmp(&b.labels));
    }
}
